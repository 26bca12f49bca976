mod common;

use common::{assert_error, assert_int};

#[test]
fn constructor_initializes_instance_properties() {
    let source = "class Point { constructor(x, y) { this.x = x; this.y = y; } } let p = new Point(1, 2); p.x + p.y;";
    assert_int(source, 3);
}

#[test]
fn constructor_arity_mismatch_is_an_error() {
    let source = "class Point { constructor(x, y) { this.x = x; this.y = y; } } new Point(1);";
    assert_error(source);
}

#[test]
fn subclass_without_its_own_constructor_uses_the_nearest_ancestor() {
    let source = "
        class A { constructor(x) { this.x = x; } }
        class B extends A {}
        new B(7).x;
    ";
    assert_int(source, 7);
}

#[test]
fn constructor_can_call_other_methods_via_this() {
    let source = "
        class Box {
            constructor(v) { this.set(v); }
            set(v) { this.value = v; }
        }
        new Box(9).value;
    ";
    assert_int(source, 9);
}

#[test]
fn new_evaluates_to_the_constructed_instance_not_null() {
    let source = "class A { constructor(x) { this.x = x; } } let a = new A(42); a.x;";
    assert_int(source, 42);
}
