mod common;

use common::{assert_error, assert_int, assert_null, assert_parse_error};

#[test]
fn let_binds_a_value() {
    assert_int("let x = 5; x;", 5);
}

#[test]
fn uninitialized_identifier_is_an_error() {
    assert_error("y;");
}

#[test]
fn redeclaring_in_the_same_scope_is_an_error() {
    assert_error("let x = 1; let x = 2; x;");
}

#[test]
fn shadowing_in_a_nested_scope_is_allowed() {
    assert_int("let x = 1; { let x = 2; } x;", 1);
}

#[test]
fn reassigning_a_let_binding_works() {
    assert_int("let x = 1; x = 2; x;", 2);
}

#[test]
fn assigning_to_an_undeclared_name_is_an_error() {
    assert_error("x = 1;");
}

#[test]
fn const_binds_a_value() {
    assert_int("const x = 5; x;", 5);
}

#[test]
fn const_reassignment_is_an_error() {
    assert_error("const PI = 3; PI = 4;");
}

#[test]
fn const_reassignment_through_a_nested_scope_is_still_an_error() {
    assert_error("const PI = 3; { PI = 4; }");
}

#[test]
fn bare_statement_evaluates_to_null() {
    assert_null("let x = 1;");
}

#[test]
fn assigning_to_a_grouping_is_a_parse_error() {
    assert_parse_error("let a = 1; (a) = 1;");
}

#[test]
fn assigning_to_an_infix_expression_is_a_parse_error() {
    assert_parse_error("let a = 1; let b = 2; a + b = 1;");
}

#[test]
fn chained_assignment_is_right_associative() {
    assert_int("let a = 0; let b = 0; let c = 0; a = b = c = 3; a + b + c;", 9);
}
