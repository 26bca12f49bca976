mod common;

use common::assert_int;

#[test]
fn line_comment_is_ignored() {
    assert_int("// this is a comment\nlet x = 1;\nx;", 1);
}

#[test]
fn line_comment_at_end_of_code_line() {
    assert_int("let x = 1; // trailing comment\nx;", 1);
}

#[test]
fn block_comment_is_ignored() {
    assert_int("/* a block comment */ let x = 1; x;", 1);
}

#[test]
fn block_comment_can_span_multiple_lines() {
    assert_int("let x = /* \n spans \n lines \n */ 1; x;", 1);
}

#[test]
fn nested_block_comments_are_supported() {
    assert_int("let x = /* outer /* inner */ still outer */ 1; x;", 1);
}
