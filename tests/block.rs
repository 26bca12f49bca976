mod common;

use common::{assert_error, assert_int};

#[test]
fn block_introduces_a_new_scope() {
    assert_int("let x = 1; { let x = 2; x; } x;", 1);
}

#[test]
fn bindings_do_not_escape_their_block() {
    assert_error("{ let x = 1; } x;");
}

#[test]
fn nested_blocks_see_outer_bindings() {
    assert_int("let x = 1; { { x = x + 1; } } x;", 2);
}

#[test]
fn block_value_is_its_last_statement() {
    assert_int("{ 1; 2; 3; }", 3);
}
