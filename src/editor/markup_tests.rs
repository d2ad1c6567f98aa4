use super::*;

fn round_trip(markup: &str) {
    assert_eq!(to_markup(&parse_markup(markup)), markup);
}

#[test]
fn plain_text_round_trips() {
    round_trip("Hello world");
}

#[test]
fn inline_wrappers_round_trip() {
    round_trip("Hello <b>bold</b> and <i>italic</i> and <u>underlined</u>");
}

#[test]
fn nested_wrappers_round_trip() {
    round_trip("<b>a<i>b</i>c</b>");
}

#[test]
fn headings_and_line_breaks_round_trip() {
    round_trip("<h2>Title</h2>intro<br>next");
}

#[test]
fn special_characters_are_escaped() {
    let tree = DocumentTree::from_nodes(vec![Node::text("a < b & c > d")]);
    assert_eq!(to_markup(&tree), "a &lt; b &amp; c &gt; d");
    assert_eq!(parse_markup("a &lt; b &amp; c &gt; d").plain_text(), "a < b & c > d");
}

#[test]
fn entities_are_decoded() {
    let tree = parse_markup("&quot;x&apos;y&#39;z&nbsp;w&amp;");
    assert_eq!(tree.plain_text(), "\"x'y'z w&");
}

#[test]
fn unknown_entity_stays_literal() {
    assert_eq!(parse_markup("a &bogus; b").plain_text(), "a &bogus; b");
}

#[test]
fn tag_aliases_normalize_on_reserialization() {
    assert_eq!(
        to_markup(&parse_markup("<strong>a</strong><em>b</em><h1>c</h1>")),
        "<b>a</b><i>b</i><h2>c</h2>"
    );
}

#[test]
fn unknown_tags_are_skipped() {
    let tree = parse_markup("<div class=\"x\">hi</div>");
    assert_eq!(tree.plain_text(), "hi");
    assert_eq!(to_markup(&tree), "hi");
}

#[test]
fn stray_closing_tag_is_ignored() {
    assert_eq!(to_markup(&parse_markup("</b>hi")), "hi");
}

#[test]
fn unterminated_tag_is_kept_as_text() {
    let tree = parse_markup("a <b");
    assert_eq!(tree.plain_text(), "a <b");
    assert_eq!(to_markup(&tree), "a &lt;b");
}

#[test]
fn unclosed_wrapper_is_closed_at_end_of_input() {
    assert_eq!(to_markup(&parse_markup("<b>hi")), "<b>hi</b>");
}

#[test]
fn mismatched_closer_closes_the_inner_frame_too() {
    assert_eq!(to_markup(&parse_markup("<b><i>x</b>")), "<b><i>x</i></b>");
}

#[test]
fn self_closing_and_attributed_breaks_parse() {
    let tree = parse_markup("a<br/>b<br >c");
    assert_eq!(tree.plain_text(), "a\nb\nc");
    assert_eq!(to_markup(&tree), "a<br>b<br>c");
}

#[test]
fn empty_wrappers_are_pruned() {
    assert_eq!(to_markup(&parse_markup("a<b></b>c")), "ac");
}

#[test]
fn adjacent_runs_merge_after_parsing() {
    // Skipping the unknown tag leaves two text runs side by side.
    let tree = parse_markup("ab<span>cd</span>ef");
    assert_eq!(tree.children, vec![Node::text("abcdef")]);
}

#[test]
fn garbage_input_never_panics() {
    for input in ["<", "<>", "<<<>>>", "&", "&amp", "</", "<b><u>", "<br"] {
        let _ = to_markup(&parse_markup(input));
    }
}
