mod common;

use common::{assert_error, assert_int};

#[test]
fn this_refers_to_the_receiving_instance() {
    let source = "
        class Counter {
            constructor() { this.n = 0; }
            bump() { this.n = this.n + 1; }
        }
        let c = new Counter();
        c.bump();
        c.bump();
        c.n;
    ";
    assert_int(source, 2);
}

#[test]
fn this_used_outside_a_method_is_an_error() {
    assert_error("this;");
}

#[test]
fn a_closure_created_inside_a_method_still_sees_this() {
    // a function literal closes over its defining environment, so `this`
    // stays reachable through the closure chain even once called outside
    // of any direct method-dispatch call
    let source = "
        class Box {
            constructor(v) { this.v = v; }
            getter() {
                let f = fn() { return this.v; };
                return f;
            }
        }
        let get_v = new Box(42).getter();
        get_v();
    ";
    assert_int(source, 42);
}

#[test]
fn this_is_per_call_and_does_not_leak_between_instances() {
    let source = "
        class Box {
            constructor(v) { this.v = v; }
            get() { return this.v; }
        }
        let a = new Box(1);
        let b = new Box(2);
        a.get() + b.get();
    ";
    assert_int(source, 3);
}
