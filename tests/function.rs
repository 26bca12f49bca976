mod common;

use common::{assert_int, assert_null};

#[test]
fn fibonacci() {
    let source = "let fib = fn(n) { if (n <= 1) { return n; } return fib(n-1) + fib(n-2); }; fib(10);";
    assert_int(source, 55);
}

#[test]
fn function_with_no_return_statement_evaluates_to_null() {
    assert_null("let f = fn(x) { x; }; let y = f(1); null;");
}

#[test]
fn function_literal_is_a_first_class_value() {
    let source = "let ops = [fn(a, b) { a + b; }, fn(a, b) { a - b; }]; ops[0](5, 2) + ops[1](5, 2);";
    assert_int(source, 7 + 3);
}

#[test]
fn higher_order_function_takes_a_function_argument() {
    let source = "let apply_twice = fn(f, x) { f(f(x)); }; apply_twice(fn(n) { n * 2; }, 3);";
    assert_int(source, 12);
}

#[test]
fn immediately_invoked_function_literal() {
    assert_int("fn(x) { x * x; }(6);", 36);
}

#[test]
fn mutual_recursion_through_shared_outer_bindings() {
    let source = "
        let is_even = null;
        let is_odd = null;
        is_even = fn(n) { if (n == 0) { return true; } return is_odd(n - 1); };
        is_odd = fn(n) { if (n == 0) { return false; } return is_even(n - 1); };
        if (is_even(10)) { 1; } else { 0; }
    ";
    assert_int(source, 1);
}
