use marktree::{parse, render_html, NodeKind, Options};
use proptest::prelude::*;

/// Markdown-heavy alphabet so generated inputs hit the interesting paths.
fn markdown_fragment() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            Just("*"), Just("_"), Just("**"), Just("["), Just("]"), Just("("), Just(")"),
            Just("!"), Just("`"), Just("```"), Just("~~~"), Just("<"), Just(">"), Just("> "),
            Just("- "), Just("1. "), Just("# "), Just("---"), Just("    "), Just("\t"),
            Just("\n"), Just("\n\n"), Just("\\"), Just("&amp;"), Just("&#"), Just("\""),
            Just("'"), Just("<div>"), Just("<!--"), Just("[x]: /u"), Just("a"), Just("foo"),
            Just(" "),
        ],
        0..64,
    )
    .prop_map(|parts| parts.concat())
}

fn all_options() -> Options {
    Options {
        smart_punctuation: true,
        unsafe_raw_html: true,
        ..Options::default()
    }
}

proptest! {
    #[test]
    fn parse_is_deterministic(input in markdown_fragment()) {
        let options = Options::default();
        prop_assert_eq!(parse(input.as_bytes(), &options), parse(input.as_bytes(), &options));
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
        let doc = parse(&bytes, &all_options());
        let _ = render_html(&doc, &all_options());
    }

    #[test]
    fn output_is_utf8_when_validating(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let options = Options::default();
        let html = render_html(&parse(&bytes, &options), &options);
        prop_assert!(std::str::from_utf8(&html).is_ok());
    }

    #[test]
    fn emphasis_tags_are_balanced(input in markdown_fragment()) {
        let html = String::from_utf8(render_html(&parse(input.as_bytes(), &all_options()), &all_options())).unwrap();
        prop_assert_eq!(html.matches("<em>").count(), html.matches("</em>").count());
        prop_assert_eq!(html.matches("<strong>").count(), html.matches("</strong>").count());
    }

    #[test]
    fn single_line_items_make_tight_lists(items in proptest::collection::vec("[a-z]{1,8}", 1..8)) {
        let input: String = items.iter().map(|item| format!("- {item}\n")).collect();
        let doc = parse(input.as_bytes(), &Options::default());
        let list = doc.first_child(doc.root()).unwrap();
        prop_assert_eq!(doc.kind(list), NodeKind::List);
        prop_assert!(doc.list_data(list).unwrap().tight);
        prop_assert_eq!(doc.children(list).count(), items.len());
        for item in doc.children(list) {
            prop_assert!(doc.list_data(item).unwrap().tight);
        }
    }

    #[test]
    fn text_without_markup_round_trips(text in "[a-zA-Z][a-zA-Z0-9 ,.]{0,39}") {
        let trimmed = text.trim_end();
        let html = marktree::to_html(&text);
        prop_assert_eq!(html, format!("<p>{trimmed}</p>\n"));
    }
}

#[test]
fn deep_nesting_stays_fast() {
    let options = Options::default();
    for input in [
        ">".repeat(20_000),
        "[".repeat(20_000),
        "*a".repeat(20_000),
        "- ".repeat(5_000),
        format!("{}{}", "*".repeat(10_000), "a*".repeat(10_000)),
        "`".repeat(20_000),
        "[a](b) [".repeat(20_000),
    ] {
        let start = std::time::Instant::now();
        let doc = parse(input.as_bytes(), &options);
        let _ = render_html(&doc, &options);
        assert!(start.elapsed().as_secs() < 5, "slow on input starting {:?}", &input[..10]);
    }
}

#[test]
fn links_after_open_brackets_scale_linearly() {
    let options = Options::default();
    let time = |n: usize| {
        let input = "[a](b) [".repeat(n);
        let start = std::time::Instant::now();
        let doc = parse(input.as_bytes(), &options);
        let _ = render_html(&doc, &options);
        start.elapsed().as_secs_f64()
    };
    // Warm up allocations before measuring.
    time(1_000);
    let small = time(20_000);
    let large = time(80_000);
    // Four times the input: linear work grows about 4x, quadratic about 16x.
    assert!(large < small * 10.0 + 0.05, "{small:.3}s at 20k, {large:.3}s at 80k");
}
