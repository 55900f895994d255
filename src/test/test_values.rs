use crate::value::{is_numeric, number_to_smolstr, to_number, truthy, Value};

#[test]
fn truthy_is_false_only_for_nil_and_false() {
    assert!(!truthy(&Value::Nil));
    assert!(!truthy(&Value::Boolean(false)));
    assert!(truthy(&Value::Boolean(true)));
    assert!(truthy(&Value::Number(0.0)));
    assert!(truthy(&Value::str("")));
}

#[test]
fn numeric_strings_match_the_float_grammar() {
    assert!(is_numeric(&Value::str("42")));
    assert!(is_numeric(&Value::str("-3.5")));
    assert!(is_numeric(&Value::str("+.5")));
    assert!(is_numeric(&Value::str("1e10")));
    assert!(is_numeric(&Value::str("1.5e-3")));
    assert!(!is_numeric(&Value::str("")));
    assert!(!is_numeric(&Value::str("+")));
    assert!(!is_numeric(&Value::str(".")));
    assert!(!is_numeric(&Value::str("abc")));
    assert!(!is_numeric(&Value::str("1e")));
    assert!(!is_numeric(&Value::str("1.2.3")));
}

#[test]
fn to_number_parses_matching_strings_only() {
    assert_eq!(to_number(&Value::str("10")), Some(10.0));
    assert_eq!(to_number(&Value::str("1e2")), Some(100.0));
    assert_eq!(to_number(&Value::str("nope")), None);
    assert_eq!(to_number(&Value::Boolean(true)), None);
}

#[test]
fn integral_numbers_render_without_a_decimal_point() {
    assert_eq!(number_to_smolstr(3.0).as_str(), "3");
    assert_eq!(number_to_smolstr(-12.0).as_str(), "-12");
    assert_eq!(number_to_smolstr(3.5).as_str(), "3.5");
}

#[test]
fn table_identity_distinguishes_distinct_tables() {
    let a = Value::table(crate::value::LuaTable::new());
    let b = Value::table(crate::value::LuaTable::new());
    assert_ne!(a.identity(), b.identity());
    assert_eq!(a.identity(), a.clone().identity());
}
