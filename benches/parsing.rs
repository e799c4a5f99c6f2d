//! Performance benchmarks for marktree
//!
//! Run with: cargo bench

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use marktree::{Options, parse, render_html};

/// Sample Markdown documents of various sizes
mod samples {
    pub const TINY: &str = "Hello, **world**!";

    pub const SMALL: &str = r#"# Heading

This is a paragraph with *emphasis* and **strong** text.

- Item 1
- Item 2
- Item 3

`inline code` and [a link](https://example.com).
"#;

    pub const MEDIUM: &str = r#"# Project README

This is a sample README file that demonstrates various Markdown features.

## Features

- Arena tree
- Reference links, like [the docs][docs]
- Safe HTML output

### Code Example

```rust
fn main() {
    println!("Hello, world!");
}
```

## Performance

The parser achieves **high throughput** on typical documents.

> This is a blockquote with some *emphasized* text.

### Links

1. [GitHub](https://github.com)
2. [Documentation](https://docs.rs "docs.rs")

[docs]: https://docs.rs/marktree

## Conclusion

Thank you for reading!
"#;

    /// Generate a large document by repeating sections
    pub fn large() -> String {
        let section = r#"
## Section Title

This paragraph contains various inline elements like *emphasis*, **strong**,
`code`, and [links](https://example.com).

- First bullet point with **bold** text
- Second bullet point with *italic* text
- Third point with `code`

> A blockquote that spans
> multiple lines.

```rust
fn example() {
    let x = 42;
    println!("{}", x);
}
```

Another paragraph to add some content. This helps test the parser's ability
to handle longer documents efficiently.

"#;
        section.repeat(50)
    }

    /// Pathological document with many potential delimiters
    pub fn pathological_emphasis() -> String {
        "*a ".repeat(1000) + &"b* ".repeat(1000)
    }

    /// Unclosed brackets, each a potential link opener
    pub fn pathological_brackets() -> String {
        "[a ".repeat(2000) + &"](b) ".repeat(10)
    }

    /// Document with deeply nested structures
    pub fn pathological_nested() -> String {
        "> ".repeat(100) + "deep\n"
    }
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    group.throughput(Throughput::Bytes(samples::TINY.len() as u64));
    group.bench_function("tiny", |b| b.iter(|| marktree::to_html(black_box(samples::TINY))));

    group.throughput(Throughput::Bytes(samples::SMALL.len() as u64));
    group.bench_function("small", |b| b.iter(|| marktree::to_html(black_box(samples::SMALL))));

    group.throughput(Throughput::Bytes(samples::MEDIUM.len() as u64));
    group.bench_function("medium", |b| b.iter(|| marktree::to_html(black_box(samples::MEDIUM))));

    let large = samples::large();
    group.throughput(Throughput::Bytes(large.len() as u64));
    group.bench_function("large", |b| b.iter(|| marktree::to_html(black_box(&large))));

    group.finish();
}

fn bench_phases(c: &mut Criterion) {
    let mut group = c.benchmark_group("phases");
    let options = Options::default();
    let large = samples::large();
    group.throughput(Throughput::Bytes(large.len() as u64));

    group.bench_function("parse_only", |b| {
        b.iter(|| parse(black_box(large.as_bytes()), &options))
    });

    let doc = parse(large.as_bytes(), &options);
    group.bench_function("render_only", |b| b.iter(|| render_html(black_box(&doc), &options)));

    let smart = Options {
        smart_punctuation: true,
        ..Options::default()
    };
    group.bench_function("smart_punctuation", |b| {
        b.iter(|| marktree::to_html_with_options(black_box(&large), &smart))
    });

    group.finish();
}

fn bench_escaping(c: &mut Criterion) {
    let mut group = c.benchmark_group("escaping");

    // Plain text (no escaping needed)
    let plain = "Hello, this is plain text without any special characters. ".repeat(100);
    group.throughput(Throughput::Bytes(plain.len() as u64));
    group.bench_function("plain_text", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(plain.len());
            marktree::escape::escape_text_into(&mut out, black_box(plain.as_bytes()));
            out
        })
    });

    let html_heavy = "<script>alert('xss')</script> & more <tags> here! ".repeat(100);
    group.throughput(Throughput::Bytes(html_heavy.len() as u64));
    group.bench_function("html_heavy", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(html_heavy.len() * 2);
            marktree::escape::escape_text_into(&mut out, black_box(html_heavy.as_bytes()));
            out
        })
    });

    group.finish();
}

fn bench_pathological(c: &mut Criterion) {
    let mut group = c.benchmark_group("pathological");
    group.sample_size(20);

    let emphasis = samples::pathological_emphasis();
    group.throughput(Throughput::Bytes(emphasis.len() as u64));
    group.bench_function("emphasis_explosion", |b| b.iter(|| marktree::to_html(black_box(&emphasis))));

    let brackets = samples::pathological_brackets();
    group.throughput(Throughput::Bytes(brackets.len() as u64));
    group.bench_function("unclosed_brackets", |b| b.iter(|| marktree::to_html(black_box(&brackets))));

    let nested = samples::pathological_nested();
    group.throughput(Throughput::Bytes(nested.len() as u64));
    group.bench_function("deep_nesting", |b| b.iter(|| marktree::to_html(black_box(&nested))));

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_phases, bench_escaping, bench_pathological);
criterion_main!(benches);
