mod common;

use common::{assert_error, assert_int, assert_str};

#[test]
fn reading_an_undefined_property_falls_back_to_a_method() {
    let source = "class A { greet() { return \"hi\"; } } new A().greet();";
    assert_str(source, "hi");
}

#[test]
fn reading_a_missing_property_is_an_error() {
    assert_error("class A {} new A().missing;");
}

#[test]
fn setting_a_property_creates_it() {
    let source = "class A {} let a = new A(); a.x = 5; a.x;";
    assert_int(source, 5);
}

#[test]
fn setting_a_property_on_a_non_instance_is_an_error() {
    assert_error("let x = 5; x.y = 1;");
}

#[test]
fn properties_are_instance_local() {
    let source = "
        class A { constructor(x) { this.x = x; } }
        let a = new A(1);
        let b = new A(2);
        a.x = 100;
        a.x + b.x;
    ";
    assert_int(source, 102);
}

#[test]
fn a_property_shadows_a_method_of_the_same_name() {
    let source = "
        class A {
            value() { return 1; }
        }
        let a = new A();
        a.value = 2;
        a.value;
    ";
    assert_int(source, 2);
}

#[test]
fn writes_are_visible_on_the_next_read() {
    let source = "class A {} let a = new A(); a.n = 1; a.n = a.n + 1; a.n;";
    assert_int(source, 2);
}
