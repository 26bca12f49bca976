mod common;

use common::assert_int;

#[test]
fn subclass_inherits_methods_from_its_parent() {
    let source = "
        class Animal { speak() { return 1; } }
        class Dog extends Animal {}
        new Dog().speak();
    ";
    assert_int(source, 1);
}

#[test]
fn subclass_can_override_a_method() {
    let source = "
        class Animal { speak() { return 1; } }
        class Dog extends Animal { speak() { return 2; } }
        new Dog().speak();
    ";
    assert_int(source, 2);
}

#[test]
fn method_resolution_walks_the_full_parent_chain() {
    let source = "
        class A { greet() { return 1; } }
        class B extends A {}
        class C extends B {}
        new C().greet();
    ";
    assert_int(source, 1);
}

#[test]
fn constructor_chains_through_super() {
    let source = "
        class A { constructor(x) { this.x = x; } get() { return this.x; } }
        class B extends A {
            constructor(x, y) { super(x); this.y = y; }
            get() { return super.get() + this.y; }
        }
        let b = new B(10, 5);
        b.get();
    ";
    assert_int(source, 15);
}

#[test]
fn every_instance_of_a_class_resolves_the_same_method() {
    let source = "
        class A { value() { return 7; } }
        let a1 = new A();
        let a2 = new A();
        a1.value() + a2.value();
    ";
    assert_int(source, 14);
}

#[test]
fn three_level_inheritance_chain_resolves_through_the_middle_class() {
    let source = "
        class A { tag() { return \"A\"; } }
        class B extends A { tag() { return \"B\"; } }
        class C extends B {}
        if (new C().tag() == \"B\") { 1; } else { 0; }
    ";
    assert_int(source, 1);
}
