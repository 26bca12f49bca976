mod common;

use common::{assert_int, assert_null};

#[test]
fn if_true_runs_the_consequence() {
    assert_int("if (true) { 1; } else { 2; }", 1);
}

#[test]
fn if_false_runs_the_else() {
    assert_int("if (false) { 1; } else { 2; }", 2);
}

#[test]
fn if_with_no_else_and_a_false_condition_is_null() {
    assert_null("if (false) { 1; }");
}

#[test]
fn elif_chain_picks_the_first_truthy_branch() {
    let source = "let x = 2; if (x == 1) { 10; } elif (x == 2) { 20; } elif (x == 3) { 30; } else { 0; }";
    assert_int(source, 20);
}

#[test]
fn elif_chain_falls_through_to_else() {
    let source = "let x = 99; if (x == 1) { 10; } elif (x == 2) { 20; } else { 0; }";
    assert_int(source, 0);
}

#[test]
fn if_is_an_expression() {
    assert_int("let x = if (true) { 1; } else { 2; }; x + 1;", 2);
}

#[test]
fn if_condition_uses_truthiness_not_just_booleans() {
    assert_int("if (5) { 1; } else { 0; }", 1);
    assert_int("if (0) { 1; } else { 0; }", 0);
    assert_int("if (\"\") { 1; } else { 0; }", 0);
}
