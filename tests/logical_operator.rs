mod common;

use common::{assert_bool, assert_int};

#[test]
fn or_returns_the_left_operand_when_truthy() {
    assert_int("5 || 10;", 5);
}

#[test]
fn or_returns_the_right_operand_when_left_is_falsy() {
    assert_int("0 || 10;", 10);
}

#[test]
fn and_returns_the_right_operand_when_left_is_truthy() {
    assert_int("5 && 10;", 10);
}

#[test]
fn and_returns_the_left_operand_when_falsy() {
    assert_int("0 && 10;", 0);
}

#[test]
fn or_short_circuits_and_never_evaluates_the_right_side() {
    // if `||` evaluated its right side here, this would error (undefined `y`)
    assert_bool("true || y;", true);
}

#[test]
fn and_short_circuits_and_never_evaluates_the_right_side() {
    assert_bool("false && y;", false);
}

#[test]
fn logical_operators_combine_with_comparisons() {
    assert_bool("1 < 2 && 3 < 4;", true);
    assert_bool("1 < 2 && 3 > 4;", false);
    assert_bool("1 > 2 || 3 < 4;", true);
}
