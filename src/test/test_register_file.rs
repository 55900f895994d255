use crate::value::Value;
use crate::vm::register_file::RegisterFile;

#[test]
fn reading_past_the_end_yields_nil() {
    let file = RegisterFile::new();
    assert!(matches!(file.get(5), Value::Nil));
}

#[test]
fn writing_extends_with_nil_holes() {
    let mut file = RegisterFile::new();
    file.set(3, Value::Number(1.0));
    assert_eq!(file.len(), 4);
    assert!(matches!(file.get(0), Value::Nil));
    assert!(matches!(file.get(1), Value::Nil));
    match file.get(3) {
        Value::Number(n) => assert_eq!(n, 1.0),
        _ => panic!("expected number"),
    }
}

#[test]
fn truncate_drops_trailing_registers() {
    let mut file = RegisterFile::new();
    file.set(0, Value::Number(1.0));
    file.set(1, Value::Number(2.0));
    file.set(2, Value::Number(3.0));
    file.truncate(1);
    assert_eq!(file.len(), 1);
    assert!(matches!(file.get(5), Value::Nil));
}

#[test]
fn delete_at_resets_without_shrinking() {
    let mut file = RegisterFile::new();
    file.set(0, Value::Number(1.0));
    file.set(1, Value::Number(2.0));
    file.delete_at(0);
    assert_eq!(file.len(), 2);
    assert!(matches!(file.get(0), Value::Nil));
}
