mod common;

use common::{assert_int, assert_null, assert_str};

#[test]
fn an_empty_program_evaluates_to_null() {
    assert_null("");
}

#[test]
fn a_program_evaluates_to_its_last_statements_value() {
    assert_int("1; 2; 3;", 3);
}

#[test]
fn type_builtin_names_every_kind() {
    assert_str("type(1);", "INTEGER");
    assert_str("type(1.5);", "FLOAT");
    assert_str("type(\"x\");", "STRING");
    assert_str("type(true);", "BOOLEAN");
    assert_str("type(null);", "NULL");
    assert_str("type([1]);", "ARRAY");
    assert_str("type({\"a\": 1});", "HASH");
    assert_str("type(fn() {});", "FUNCTION");
    assert_str("type(error(\"x\"));", "ERROR");
}

#[test]
fn assert_builtin_passes_through_truthy_conditions() {
    assert_null("assert(true);");
}

#[test]
fn assert_builtin_produces_an_error_on_falsy_conditions() {
    use common::assert_error;
    assert_error("assert(false, \"boom\");");
}

#[test]
fn error_value_is_falsy() {
    use common::assert_bool;
    assert_bool("bool(error(\"oops\"));", false);
}

#[test]
fn deeply_nested_expressions_evaluate_correctly() {
    assert_int("((((1 + 2) * 3) - 4) / 5);", 1);
}
