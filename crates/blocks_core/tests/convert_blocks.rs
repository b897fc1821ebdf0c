use std::sync::Once;

use blocks_core::{
    convert_html, Block, BlockKind, ConvertError, ConvertOptions, DiagnosticKind, HeadingLevel,
    TextRun,
};
use pretty_assertions::assert_eq;

const BASE: &str = "https://example.com/a/";

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn convert(html: &str) -> Vec<Block> {
    init_logging();
    convert_html(html, BASE, &ConvertOptions::default())
        .expect("conversion succeeds")
        .blocks
}

fn plain(text: &str) -> TextRun {
    TextRun::plain(text).unwrap()
}

fn linked(text: &str, url: &str) -> TextRun {
    TextRun::new(text, Some(url.to_string())).unwrap()
}

fn paragraph(rich_text: Vec<TextRun>) -> Block {
    Block::Paragraph { rich_text }
}

#[test]
fn one_paragraph_per_non_empty_p_in_document_order() {
    let html = r#"
    <html><body>
        <p>One</p>
        <div><p>Two</p><p>   </p></div>
        <section><article><p>Three</p></article></section>
    </body></html>
    "#;

    assert_eq!(
        convert(html),
        vec![
            paragraph(vec![plain("One")]),
            paragraph(vec![plain("Two")]),
            paragraph(vec![plain("Three")]),
        ]
    );
}

#[test]
fn blank_headings_and_paragraphs_are_dropped() {
    let html = "<h1> </h1><h2>\n\t</h2><h3></h3><p>&nbsp;</p><p></p>";
    assert_eq!(convert(html), Vec::<Block>::new());
}

#[test]
fn headings_keep_level_and_inline_links() {
    let html = r#"<h1>Top</h1><h2>Intro <a href="/x">x</a></h2><h3>Small</h3><h4>Not a heading</h4>"#;
    let blocks = convert(html);

    assert_eq!(
        blocks,
        vec![
            Block::Heading {
                level: HeadingLevel::One,
                rich_text: vec![plain("Top")],
            },
            Block::Heading {
                level: HeadingLevel::Two,
                rich_text: vec![plain("Intro"), linked("x", "https://example.com/x")],
            },
            Block::Heading {
                level: HeadingLevel::Three,
                rich_text: vec![plain("Small")],
            },
        ]
    );
}

#[test]
fn title_in_body_becomes_first_level_heading() {
    let html = "<html><head></head><body><title> Page  title </title><p>x</p></body></html>";
    let blocks = convert(html);

    assert_eq!(blocks[0].kind(), BlockKind::Heading1);
    assert_eq!(blocks[0].plain_text(), "Page title");
    assert_eq!(blocks.len(), 2);
}

#[test]
fn image_sources_resolve_and_data_uris_are_suppressed() {
    init_logging();
    let html = r#"
        <img src="x/y.png">
        <img src="https://cdn.com/z.png">
        <img src="data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAAB">
        <img alt="no source">
    "#;
    let conversion = convert_html(html, BASE, &ConvertOptions::default()).unwrap();

    assert_eq!(
        conversion.blocks,
        vec![
            Block::Image {
                url: "https://example.com/a/x/y.png".to_string()
            },
            Block::Image {
                url: "https://cdn.com/z.png".to_string()
            },
        ]
    );
    assert_eq!(conversion.diagnostics.len(), 1);
    assert_eq!(conversion.diagnostics[0].kind, DiagnosticKind::DataUriImage);
    assert!(!conversion.diagnostics[0].detail.contains("AAAAEAAAAB"));
}

#[test]
fn images_outside_http_schemes_are_dropped_with_diagnostics() {
    init_logging();
    let html = r#"
        <img src="javascript:alert(1)">
        <img src="about:blank">
        <img src="blob:https://x.test/123">
        <img src="ok.png">
    "#;
    let conversion = convert_html(html, BASE, &ConvertOptions::default()).unwrap();

    assert_eq!(
        conversion.blocks,
        vec![Block::Image {
            url: "https://example.com/a/ok.png".to_string()
        }]
    );
    let schemes: Vec<DiagnosticKind> = conversion
        .diagnostics
        .into_iter()
        .map(|diagnostic| diagnostic.kind)
        .collect();
    assert_eq!(
        schemes,
        ["javascript", "about", "blob"]
            .into_iter()
            .map(|scheme| DiagnosticKind::UnsupportedImageScheme {
                scheme: scheme.to_string()
            })
            .collect::<Vec<_>>()
    );
}

#[test]
fn embedded_svg_and_math_produce_no_blocks() {
    let html = r#"
        <div>
            <svg viewBox="0 0 10 10"><title>Menu icon</title><path d="M0"/></svg>
            <math><mi>x</mi></math>
            <p>Body</p>
        </div>
    "#;
    assert_eq!(convert(html), vec![paragraph(vec![plain("Body")])]);
}

#[test]
fn non_content_and_custom_elements_are_pruned_with_descendants() {
    let html = r#"
        <script>document.write("<p>no</p>")</script>
        <style>p { color: red }</style>
        <link rel="stylesheet" href="x.css">
        <meta name="x" content="y">
        <my-widget><p>hidden</p></my-widget>
        <p>shown</p>
    "#;
    assert_eq!(convert(html), vec![paragraph(vec![plain("shown")])]);
}

#[test]
fn classified_elements_do_not_recurse() {
    let html = r#"<p>text <img src="a.png"></p><h2>Head <img src="b.png"></h2>"#;
    let blocks = convert(html);

    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(|block| block.kind() != BlockKind::Image));
}

#[test]
fn standalone_links_become_linked_paragraphs() {
    let html = r#"
        <a href="page">Page</a>
        <div><a href="https://other.test/x">Other</a></div>
        <span><a href="/under-span">Span link</a></span>
        <a href="/empty"></a>
    "#;

    assert_eq!(
        convert(html),
        vec![
            paragraph(vec![linked("Page", "https://example.com/a/page")]),
            paragraph(vec![linked("Other", "https://other.test/x")]),
            paragraph(vec![linked("Span link", "https://example.com/under-span")]),
            paragraph(vec![linked("/empty", "https://example.com/empty")]),
        ]
    );
}

#[test]
fn links_inside_paragraphs_are_not_duplicated() {
    let html = r#"<p>Read <a href="more">more</a> here</p>"#;

    assert_eq!(
        convert(html),
        vec![paragraph(vec![
            plain("Read"),
            linked("more", "https://example.com/a/more"),
            plain("here"),
        ])]
    );
}

#[test]
fn script_links_keep_their_text_without_a_target() {
    let html = r#"<a href="javascript:void(0)">Menu</a><a>Anchor only</a><a></a>"#;

    assert_eq!(
        convert(html),
        vec![
            paragraph(vec![plain("Menu")]),
            paragraph(vec![plain("Anchor only")]),
        ]
    );
}

#[test]
fn selects_become_toggles_of_options() {
    let html = r#"
        <select id="color"><option>Red</option><optgroup><option>Blue</option></optgroup></select>
        <select><option value="x">X</option></select>
        <select></select>
    "#;
    let blocks = convert(html);

    assert_eq!(
        blocks,
        vec![
            Block::Toggle {
                rich_text: vec![plain("color")],
                children: vec![
                    Block::BulletedListItem {
                        rich_text: vec![plain("Red")],
                        children: Vec::new(),
                    },
                    Block::BulletedListItem {
                        rich_text: vec![plain("Blue")],
                        children: Vec::new(),
                    },
                ],
            },
            Block::Toggle {
                rich_text: vec![plain("Select options:")],
                children: vec![Block::BulletedListItem {
                    rich_text: vec![plain("X")],
                    children: Vec::new(),
                }],
            },
        ]
    );
}

#[test]
fn unresolvable_link_skips_only_its_element() {
    init_logging();
    let html = r#"<p>ok</p><p><a href="http://[bad">bad</a></p><img src="http://[bad.png"><p>after</p>"#;
    let conversion = convert_html(html, BASE, &ConvertOptions::default()).unwrap();

    assert_eq!(
        conversion.blocks,
        vec![
            paragraph(vec![plain("ok")]),
            paragraph(vec![plain("after")]),
        ]
    );
    let skipped: Vec<_> = conversion
        .diagnostics
        .iter()
        .map(|diagnostic| diagnostic.kind.clone())
        .collect();
    assert_eq!(
        skipped,
        vec![
            DiagnosticKind::SkippedElement {
                tag: "p".to_string()
            },
            DiagnosticKind::SkippedElement {
                tag: "img".to_string()
            },
        ]
    );
}

#[test]
fn strict_mode_fails_the_whole_conversion() {
    init_logging();
    let html = r#"<p>ok</p><p><a href="http://[bad">bad</a></p>"#;
    let options = ConvertOptions {
        strict_urls: true,
        ..ConvertOptions::default()
    };

    let err = convert_html(html, BASE, &options).unwrap_err();
    assert!(matches!(err, ConvertError::Resolution { ref reference, .. } if reference == "http://[bad"));
}

#[test]
fn invalid_base_url_is_rejected_up_front() {
    let err = convert_html("<p>x</p>", "not a url", &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::BaseUrl { .. }));
}

#[test]
fn document_base_element_overrides_supplied_base() {
    let html = r#"<html><head><base href="/docs/"></head><body><img src="i.png"></body></html>"#;
    assert_eq!(
        convert(html),
        vec![Block::Image {
            url: "https://example.com/docs/i.png".to_string()
        }]
    );

    let ignoring = ConvertOptions {
        honor_base_element: false,
        ..ConvertOptions::default()
    };
    let blocks = convert_html(html, BASE, &ignoring).unwrap().blocks;
    assert_eq!(
        blocks,
        vec![Block::Image {
            url: "https://example.com/a/i.png".to_string()
        }]
    );
}

#[test]
fn conversion_is_deterministic() {
    let html = r#"
        <h1>T</h1><p>Hello <a href="x">x</a></p>
        <ul><li>a<ol><li>b</li></ol></li></ul>
        <table><tr><th>A</th></tr><tr><td>1</td></tr></table>
        <select><option>o</option></select><img src="i.png">
    "#;
    let options = ConvertOptions::default();

    let first = convert_html(html, BASE, &options).unwrap();
    let second = convert_html(html, BASE, &options).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.blocks.len(), 6);
}
