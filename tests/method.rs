mod common;

use common::{assert_error, assert_int, assert_str};

#[test]
fn calling_a_method_through_property_access() {
    let source = "class A { double(x) { return x * 2; } } new A().double(21);";
    assert_int(source, 42);
}

#[test]
fn a_method_accessed_without_a_call_is_a_bound_method_value() {
    let source = "class A { double(x) { return x * 2; } } let a = new A(); let m = a.double; m(21);";
    assert_int(source, 42);
}

#[test]
fn method_arity_mismatch_is_an_error() {
    assert_error("class A { f(x) { return x; } } new A().f();");
}

#[test]
fn method_can_return_this_for_chaining() {
    let source = "
        class Builder {
            constructor() { this.parts = \"\"; }
            add(part) { this.parts = this.parts + part; return this; }
        }
        new Builder().add(\"a\").add(\"b\").add(\"c\").parts;
    ";
    assert_str(source, "abc");
}

#[test]
fn bound_method_keeps_its_own_receiver_even_once_detached() {
    let source = "
        class Counter {
            constructor() { this.n = 0; }
            bump() { this.n = this.n + 1; return this.n; }
        }
        let a = new Counter();
        let b = new Counter();
        let bump_a = a.bump;
        bump_a();
        bump_a();
        b.bump();
        a.n + b.n;
    ";
    assert_int(source, 2 + 1);
}
