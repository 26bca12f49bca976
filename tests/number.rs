mod common;

use common::{assert_error, assert_float, assert_int};

#[test]
fn integer_addition() {
    assert_int("2 + 3;", 5);
}

#[test]
fn integer_subtraction_can_go_negative() {
    assert_int("2 - 3;", -1);
}

#[test]
fn integer_multiplication() {
    assert_int("4 * 5;", 20);
}

#[test]
fn integer_division_truncates_toward_zero() {
    assert_int("7 / 2;", 3);
    assert_int("-7 / 2;", -3);
    assert_int("7 / -2;", -3);
}

#[test]
fn integer_division_by_zero_is_an_error() {
    assert_error("1 / 0;");
}

#[test]
fn floor_division_rounds_toward_negative_infinity() {
    assert_int("7 // 2;", 3);
    assert_int("-7 // 2;", -4);
    assert_int("7 // -2;", -4);
    assert_int("-7 // -2;", 3);
}

#[test]
fn floor_division_by_zero_is_an_error() {
    assert_error("1 // 0;");
}

#[test]
fn floor_division_on_floats_floors_the_quotient() {
    assert_float("7.5 // 2;", 3.0);
    assert_float("-7.5 // 2;", -4.0);
}

#[test]
fn modulo_follows_the_sign_of_the_dividend() {
    assert_int("7 % 3;", 1);
    assert_int("-7 % 3;", -1);
}

#[test]
fn modulo_by_zero_is_an_error() {
    assert_error("1 % 0;");
}

#[test]
fn any_float_operand_promotes_the_result_to_float() {
    assert_float("1 + 2.5;", 3.5);
    assert_float("5 / 2.0;", 2.5);
    assert_float("2.0 * 3;", 6.0);
}

#[test]
fn float_arithmetic() {
    assert_float("1.5 + 2.5;", 4.0);
    assert_float("3.0 - 1.5;", 1.5);
}

#[test]
fn prefix_minus_negates_numbers() {
    assert_int("-5;", -5);
    assert_float("-2.5;", -2.5);
}

#[test]
fn comparisons_between_integers_and_floats() {
    use common::assert_bool;
    assert_bool("1 < 1.5;", true);
    assert_bool("2 >= 2.0;", true);
}

#[test]
fn math_builtins() {
    assert_int("abs(-5);", 5);
    assert_int("max(1, 5, 3);", 5);
    assert_int("min(1, 5, 3);", 1);
    assert_int("round(2.5);", 3);
    assert_int("floor(2.9);", 2);
    assert_int("ceil(2.1);", 3);
    assert_int("pow(2, 10);", 1024);
    assert_float("sqrt(16.0);", 4.0);
}

#[test]
fn sqrt_of_a_negative_number_is_an_error() {
    assert_error("sqrt(-1);");
}

#[test]
fn pow_requires_a_non_negative_integer_exponent() {
    assert_error("pow(2, -1);");
}
