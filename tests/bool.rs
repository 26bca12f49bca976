mod common;

use common::{assert_bool, assert_int};

#[test]
fn true_and_false_literals() {
    assert_bool("true;", true);
    assert_bool("false;", false);
}

#[test]
fn bang_negates_truthiness() {
    assert_bool("!true;", false);
    assert_bool("!false;", true);
    assert_bool("!0;", true);
    assert_bool("!1;", false);
    assert_bool("!\"\";", true);
    assert_bool("!\"x\";", false);
    assert_bool("![];", true);
    assert_bool("![1];", false);
}

#[test]
fn double_bang_round_trips_truthiness() {
    assert_bool("!!5;", true);
    assert_bool("!!null;", false);
}

#[test]
fn bool_builtin_reflects_truthiness() {
    assert_bool("bool(0);", false);
    assert_bool("bool(1);", true);
    assert_bool("bool(\"\");", false);
    assert_bool("bool(null);", false);
}

#[test]
fn nan_and_infinite_floats_are_falsy() {
    assert_bool("bool(1.0 / 0.0 - 1.0 / 0.0);", false); // NaN
    assert_bool("bool(1.0 / 0.0);", false); // +Infinity
}

#[test]
fn equality_is_value_based_for_primitives() {
    assert_int("if (1 == 1) { 1; } else { 0; }", 1);
    assert_int("if (1 == 1.0) { 1; } else { 0; }", 1);
}
