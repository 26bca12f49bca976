mod common;

use common::{assert_bool, assert_error, assert_error_contains, assert_int, assert_str};

#[test]
fn string_concatenation() {
    assert_str("\"foo\" + \"bar\";", "foobar");
}

#[test]
fn string_repetition_with_an_integer() {
    assert_str("\"ab\" * 3;", "ababab");
}

#[test]
fn negative_string_repetition_is_an_error() {
    assert_error("\"ab\" * -1;");
}

#[test]
fn string_equality() {
    assert_bool("\"a\" == \"a\";", true);
    assert_bool("\"a\" == \"b\";", false);
}

#[test]
fn string_ordering_is_lexicographic_by_byte() {
    assert_bool("\"a\" < \"b\";", true);
    assert_bool("\"abc\" < \"abd\";", true);
    assert_bool("\"b\" > \"a\";", true);
}

#[test]
fn mismatched_operand_types_produce_a_type_mismatch_error() {
    assert_error_contains(
        "\"hello\" + 5;",
        "Invalid operator '+' for types STRING and INTEGER. This operation is not supported.",
    );
}

#[test]
fn instance_operator_overload_via_add_dunder() {
    let source = "
        class Vec2 {
            constructor(x, y) { this.x = x; this.y = y; }
            __add__(other) { return new Vec2(this.x + other.x, this.y + other.y); }
        }
        let a = new Vec2(1, 2);
        let b = new Vec2(3, 4);
        let c = a + b;
        c.x + c.y;
    ";
    assert_int(source, 10);
}

#[test]
fn instance_without_the_relevant_dunder_is_a_type_mismatch() {
    assert_error("class A {} new A() + 1;");
}

#[test]
fn instance_operator_overload_via_floordiv_dunder() {
    let source = "
        class Box {
            constructor(v) { this.v = v; }
            __floordiv__(other) { return new Box(this.v - other); }
        }
        let b = new Box(10) // 3;
        b.v;
    ";
    assert_int(source, 10);
}

#[test]
fn instance_eq_dunder_drives_equality() {
    let source = "
        class Money {
            constructor(cents) { this.cents = cents; }
            __eq__(other) { return this.cents == other.cents; }
        }
        if (new Money(100) == new Money(100)) { 1; } else { 0; }
    ";
    assert_int(source, 1);
}

#[test]
fn instance_without_eq_dunder_uses_identity() {
    let source = "
        class A { constructor(x) { this.x = x; } }
        if (new A(1) == new A(1)) { 1; } else { 0; }
    ";
    assert_int(source, 0);
}

#[test]
fn instance_lt_dunder_drives_comparison() {
    let source = "
        class Box {
            constructor(v) { this.v = v; }
            __lt__(other) { return this.v < other.v; }
        }
        if (new Box(1) < new Box(2)) { 1; } else { 0; }
    ";
    assert_int(source, 1);
}

#[test]
fn instance_getitem_and_setitem_dunders() {
    let source = "
        class Wrapper {
            constructor() { this.inner = [0, 0, 0]; }
            __getitem__(i) { return this.inner[i]; }
            __setitem__(i, v) { this.inner[i] = v; }
        }
        let w = new Wrapper();
        w[1] = 42;
        w[1];
    ";
    assert_int(source, 42);
}

#[test]
fn instance_and_or_dunders_receive_both_operands_eagerly() {
    let source = "
        class AlwaysTrue {
            __and__(other) { return other; }
        }
        new AlwaysTrue() && 99;
    ";
    assert_int(source, 99);
}

#[test]
fn array_index_out_of_bounds_is_an_error() {
    assert_error("let a = [1, 2, 3]; a[5];");
}

#[test]
fn negative_array_index_is_an_error_not_a_wraparound() {
    assert_error("let a = [1, 2, 3]; a[-1];");
}

#[test]
fn hash_missing_key_is_null_not_an_error() {
    use common::assert_null;
    assert_null("let h = {\"a\": 1}; h[\"b\"];");
}
