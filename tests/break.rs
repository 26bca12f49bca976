mod common;

use common::{assert_int, assert_parse_error};

#[test]
fn break_exits_a_while_loop() {
    assert_int("let i = 0; while (true) { if (i == 3) { break; } i = i + 1; } i;", 3);
}

#[test]
fn break_exits_a_for_loop() {
    let source = "let sum = 0; for (let i = 0; i < 10; i = i + 1) { if (i == 5) { break; } sum = sum + i; } sum;";
    assert_int(source, 0 + 1 + 2 + 3 + 4);
}

#[test]
fn break_only_unwinds_the_innermost_loop() {
    let source = "
        let count = 0;
        for (let i = 0; i < 3; i = i + 1) {
            while (true) {
                break;
            }
            count = count + 1;
        }
        count;
    ";
    assert_int(source, 3);
}

#[test]
fn break_outside_a_loop_is_a_parse_error() {
    assert_parse_error("break;");
}

#[test]
fn break_inside_a_function_body_still_requires_an_enclosing_loop() {
    assert_parse_error("let f = fn() { break; }; f();");
}
