mod common;

use common::{assert_int, assert_null};

#[test]
fn while_loop_accumulates() {
    let source = "
        let i = 0;
        let sum = 0;
        while (i < 5) {
            sum = sum + i;
            i = i + 1;
        }
        sum;
    ";
    assert_int(source, 10);
}

#[test]
fn while_with_a_false_condition_never_runs_the_body() {
    assert_int("let x = 1; while (false) { x = 2; } x;", 1);
}

#[test]
fn while_loop_as_a_statement_evaluates_the_overall_program_to_the_last_statement() {
    assert_null("while (false) {}");
}

#[test]
fn break_stops_the_loop_immediately() {
    let source = "
        let i = 0;
        while (true) {
            if (i == 3) { break; }
            i = i + 1;
        }
        i;
    ";
    assert_int(source, 3);
}

#[test]
fn continue_skips_to_the_next_condition_check() {
    let source = "
        let i = 0;
        let sum = 0;
        while (i < 5) {
            i = i + 1;
            if (i % 2 == 0) { continue; }
            sum = sum + i;
        }
        sum;
    ";
    assert_int(source, 9);
}

#[test]
fn nested_while_loops_break_only_the_innermost() {
    let source = "
        let outer = 0;
        let inner_total = 0;
        while (outer < 3) {
            let inner = 0;
            while (true) {
                if (inner == 2) { break; }
                inner_total = inner_total + 1;
                inner = inner + 1;
            }
            outer = outer + 1;
        }
        inner_total;
    ";
    assert_int(source, 6);
}

#[test]
fn a_non_boolean_falsy_condition_also_stops_the_loop() {
    assert_int("let x = 0; while (x) { x = 1; } x;", 0);
}

#[test]
fn condition_must_be_parenthesized() {
    use common::assert_parse_error;
    assert_parse_error("while true { 1; }");
}
