use super::*;

#[test]
fn word_count_splits_on_any_whitespace() {
    assert_eq!(word_count("Hello world"), 2);
    assert_eq!(word_count("  spaced   out\twords\nhere  "), 4);
    assert_eq!(word_count("one"), 1);
}

#[test]
fn word_count_of_blank_text_is_zero() {
    assert_eq!(word_count(""), 0);
    assert_eq!(word_count("   \n\t  "), 0);
}

#[test]
fn char_count_counts_scalar_values() {
    assert_eq!(char_count("Hello world"), 11);
    assert_eq!(char_count(""), 0);
    assert_eq!(char_count("héllo"), 5);
}

#[test]
fn char_to_byte_idx_handles_multibyte_runs() {
    let text = "héllo";
    assert_eq!(content::char_to_byte_idx(text, 0), 0);
    assert_eq!(content::char_to_byte_idx(text, 1), 1);
    assert_eq!(content::char_to_byte_idx(text, 2), 3);
    assert_eq!(content::char_to_byte_idx(text, 5), text.len());
    assert_eq!(content::char_to_byte_idx(text, 99), text.len());
}

#[test]
fn plain_text_excludes_placeholder_runs() {
    let tree = parse_markup(&format!("a<b>{PLACEHOLDER}</b>b"));
    assert_eq!(tree.plain_text(), "ab");
    assert_eq!(char_count(&tree.plain_text()), 2);
}

#[test]
fn block_elements_contribute_a_newline() {
    let tree = parse_markup("<h2>Title</h2>Body");
    assert_eq!(tree.plain_text(), "Title\nBody");
    assert_eq!(word_count(&tree.plain_text()), 2);
}
