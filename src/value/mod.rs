pub mod table;
pub mod value;

pub use table::{LuaTable, TableKey};
pub use value::{is_numeric, number_to_smolstr, to_display_string, to_number, truthy, Value};
