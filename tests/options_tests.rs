use marktree::{parse, render_html, to_html, to_html_with_options, Options};
use pretty_assertions::assert_eq;

fn smart(input: &str) -> String {
    let options = Options {
        smart_punctuation: true,
        ..Options::default()
    };
    to_html_with_options(input, &options)
}

fn unsafe_html(input: &str) -> String {
    let options = Options {
        unsafe_raw_html: true,
        ..Options::default()
    };
    to_html_with_options(input, &options)
}

// Raw HTML

#[test]
fn script_block_is_omitted_by_default() {
    assert_eq!(to_html("<script>alert(1)</script>"), "<!-- raw HTML omitted -->\n");
}

#[test]
fn script_block_passes_when_unsafe() {
    assert_eq!(unsafe_html("<script>alert(1)</script>"), "<script>alert(1)</script>\n");
}

#[test]
fn inline_html_is_omitted_by_default() {
    let expected = "<p>click <!-- raw HTML omitted -->here<!-- raw HTML omitted --></p>\n";
    assert_eq!(to_html("click <a onclick=\"x()\">here</a>"), expected);
}

#[test]
fn dangerous_urls_are_blanked() {
    assert_eq!(to_html("[a](javascript:alert(1))"), "<p><a href=\"\">a</a></p>\n");
    assert_eq!(to_html("[a](VBScript:x)"), "<p><a href=\"\">a</a></p>\n");
    assert_eq!(to_html("![a](data:text/html,x)"), "<p><img src=\"\" alt=\"a\" /></p>\n");
    assert_eq!(to_html("<javascript:alert(1)>"), "<p><a href=\"\">javascript:alert(1)</a></p>\n");
}

#[test]
fn safe_image_data_urls_pass() {
    let expected = "<p><img src=\"data:image/gif;base64,R0\" alt=\"a\" /></p>\n";
    assert_eq!(to_html("![a](data:image/gif;base64,R0)"), expected);
}

#[test]
fn dangerous_urls_pass_when_unsafe() {
    assert_eq!(unsafe_html("[a](javascript:x)"), "<p><a href=\"javascript:x\">a</a></p>\n");
}

#[test]
fn code_is_escaped_in_either_mode() {
    assert_eq!(unsafe_html("`<b>`"), "<p><code>&lt;b&gt;</code></p>\n");
    assert_eq!(to_html("    <b>"), "<pre><code>&lt;b&gt;\n</code></pre>\n");
}

// Smart punctuation

#[test]
fn smart_quotes() {
    let expected = "<p>“Hello,” said the spider. “‘Shelob’ is my name.”</p>\n";
    assert_eq!(smart("\"Hello,\" said the spider. \"'Shelob' is my name.\""), expected);
}

#[test]
fn smart_apostrophe() {
    assert_eq!(smart("it's"), "<p>it’s</p>\n");
}

#[test]
fn smart_dashes_and_ellipsis() {
    assert_eq!(smart("a -- b --- c..."), "<p>a – b — c…</p>\n");
    assert_eq!(smart("----"), "<hr />\n");
    assert_eq!(smart("x----"), "<p>x––</p>\n");
    assert_eq!(smart("x-----"), "<p>x—–</p>\n");
}

#[test]
fn smart_punctuation_skips_code() {
    assert_eq!(smart("`\"a\" -- b`"), "<p><code>&quot;a&quot; -- b</code></p>\n");
}

#[test]
fn escaped_quotes_stay_straight() {
    assert_eq!(smart("\\\"a\\\""), "<p>&quot;a&quot;</p>\n");
}

// Line breaks

#[test]
fn hard_breaks_option() {
    let options = Options {
        hard_breaks: true,
        ..Options::default()
    };
    assert_eq!(to_html_with_options("a\nb\nc", &options), "<p>a<br />\nb<br />\nc</p>\n");
}

// Source positions

#[test]
fn source_positions_on_blocks() {
    let options = Options {
        source_positions: true,
        ..Options::default()
    };
    let expected = "<p data-sourcepos=\"1:1-2:3\">one\ntwo</p>\n<blockquote data-sourcepos=\"4:1-4:5\">\n\
                    <p data-sourcepos=\"4:3-4:5\">abc</p>\n</blockquote>\n";
    assert_eq!(to_html_with_options("one\ntwo\n\n> abc\n", &options), expected);
}

#[test]
fn source_positions_on_code_and_break() {
    let options = Options {
        source_positions: true,
        ..Options::default()
    };
    let expected = "<pre data-sourcepos=\"1:1-3:3\"><code>x\n</code></pre>\n<hr data-sourcepos=\"4:1-4:3\" />\n";
    assert_eq!(to_html_with_options("```\nx\n```\n***\n", &options), expected);
}

// Unicode validation

#[test]
fn invalid_utf8_is_replaced_and_reported() {
    let options = Options::default();
    let doc = parse(b"a\xFFb\n\n\xE2\x82", &options);
    let reports = doc.malformed_unicode();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].offset, 1);
    assert!(doc.check_unicode().is_err());
    let html = String::from_utf8(render_html(&doc, &options)).unwrap();
    assert_eq!(html, "<p>a\u{FFFD}b</p>\n<p>\u{FFFD}</p>\n");
}

#[test]
fn valid_input_reports_nothing() {
    let doc = parse("héllo wörld".as_bytes(), &Options::default());
    assert!(doc.malformed_unicode().is_empty());
    assert!(doc.check_unicode().is_ok());
}

#[test]
fn nul_bytes_become_replacement_characters() {
    assert_eq!(to_html("a\0b"), "<p>a\u{FFFD}b</p>\n");
}
