mod common;

use common::assert_int;

#[test]
fn closures_capture_the_defining_environment() {
    let source = "let x = 10; let f = fn() { x; }; f();";
    assert_int(source, 10);
}

#[test]
fn mutating_a_captured_variable_is_observable_across_calls() {
    let source = "let c = fn() { let n = 0; fn() { n = n + 1; n; }; }; let k = c(); k(); k(); k();";
    assert_int(source, 3);
}

#[test]
fn independent_closures_do_not_share_state() {
    let source = "
        let c = fn() { let n = 0; fn() { n = n + 1; n; }; };
        let a = c();
        let b = c();
        a();
        a();
        b();
        a() + b();
    ";
    assert_int(source, 3 + 2);
}

#[test]
fn nested_closures_see_every_enclosing_scope() {
    let source = "
        let outer = fn() {
            let a = 1;
            let middle = fn() {
                let b = 2;
                fn() { a + b; };
            };
            middle();
        };
        outer()();
    ";
    assert_int(source, 3);
}

#[test]
fn closures_can_be_returned_and_called_later() {
    let source = "
        let adders = [];
        let make = fn(n) { fn(x) { x + n; }; };
        let add5 = make(5);
        let add10 = make(10);
        add5(1) + add10(1);
    ";
    assert_int(source, 6 + 11);
}

#[test]
fn recursive_functions_close_over_their_own_binding() {
    let source = "let fact = fn(n) { if (n <= 1) { return 1; } return n * fact(n - 1); }; fact(5);";
    assert_int(source, 120);
}
