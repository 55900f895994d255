// Test module organization
mod support;

mod test_arithmetic;
mod test_debug;
mod test_metamethods;
mod test_register_file;
mod test_values;
