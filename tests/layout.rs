mod common;

use common::{long_post, post};
use post_pdf::layout::{wrap_for, wrap_text};
use post_pdf::markup::{strip_markup, word_count};
use post_pdf::{Engine, Error, GlyphRun, RenderConfig, RenderedDocument, Weight};

/// Title lines plus the four metadata lines.
fn header_len(doc: &RenderedDocument) -> usize {
    let title = doc.pages[0]
        .runs
        .iter()
        .take_while(|r| r.weight == Weight::Bold)
        .count();
    title + 4
}

fn body_runs(doc: &RenderedDocument) -> Vec<&GlyphRun> {
    let skip = header_len(doc);
    doc.pages
        .iter()
        .enumerate()
        .flat_map(|(i, page)| page.runs.iter().skip(if i == 0 { skip } else { 0 }))
        .collect()
}

#[test]
fn wrapped_lines_fit_unless_a_single_word_overflows() {
    let measure = |s: &str| s.chars().count() as f32;
    let samples = [
        "the quick brown fox jumps over the lazy dog",
        "a bb ccc dddd eeeee ffffff ggggggg hhhhhhhh",
        "supercalifragilisticexpialidocious is long",
        "one\ntwo three four five six\n\nseven",
        "",
    ];
    for text in samples {
        for line in wrap_text(text, 10.0, measure) {
            assert!(
                measure(&line) <= 10.0 || !line.contains(' '),
                "line {line:?} from {text:?} is too wide"
            );
        }
    }
}

#[test]
fn overlong_word_sits_alone() {
    let lines = wrap_text("ab supercalifragilistic cd", 10.0, |s| s.chars().count() as f32);
    assert_eq!(lines, vec!["ab", "supercalifragilistic", "cd"]);
}

#[test]
fn newlines_are_hard_breaks() {
    let lines = wrap_text("first\r\n\nsecond line", 100.0, |s| s.len() as f32);
    assert_eq!(lines, vec!["first", "", "second line"]);
}

#[test]
fn tabs_separate_words() {
    let lines = wrap_text("alpha\tbeta\u{2003}gamma", 100.0, |s| s.len() as f32);
    assert_eq!(lines, vec!["alpha beta gamma"]);

    let lines = wrap_text("alpha\tbeta", 6.0, |s| s.len() as f32);
    assert_eq!(lines, vec!["alpha", "beta"]);

    let engine = Engine::builtin();
    let doc = engine
        .render(&post("Tabs", "alpha\tbeta"), &RenderConfig::default())
        .unwrap();
    let body: Vec<&str> = body_runs(&doc).iter().map(|r| r.text.as_str()).collect();
    assert_eq!(body, vec!["alpha beta"]);
}

#[test]
fn engine_wrap_respects_content_width() {
    let engine = Engine::builtin();
    let config = RenderConfig::default();
    let face = engine.face(Weight::Normal);
    let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(40);
    let lines = wrap_for(&engine, &config, &text, 11.0, Weight::Normal);
    assert!(lines.len() > 10);
    for line in &lines {
        let width = face.text_width(line, 11.0) / config.points_per_unit;
        assert!(width <= config.content_width(), "{line:?} is {width} wide");
    }
}

#[test]
fn body_lines_stay_inside_the_margins() {
    let engine = Engine::builtin();
    let config = RenderConfig::default();
    let doc = engine.render(&long_post(), &config).unwrap();

    for (i, page) in doc.pages.iter().enumerate() {
        for run in &page.runs {
            assert!(run.y >= config.margin, "page {i}: {run:?} above top margin");
            assert!(run.y <= config.bottom_bound(), "page {i}: {run:?} below bottom margin");
            assert_eq!(run.x, config.margin);
        }
        if i > 0 {
            assert_eq!(page.runs[0].y, config.margin, "page {i} does not start at the margin");
        }
    }
}

#[test]
fn body_keeps_reading_order_across_pages() {
    let engine = Engine::builtin();
    let config = RenderConfig::default();
    let post = post(
        "Ordering",
        &(1..=2000).map(|n| n.to_string()).collect::<Vec<_>>().join(" "),
    );
    let doc = engine.render(&post, &config).unwrap();
    assert!(doc.page_count() > 1);

    let expected = wrap_for(
        &engine,
        &config,
        &strip_markup(&post.content),
        config.font_sizes.body,
        Weight::Normal,
    );
    let placed: Vec<&str> = body_runs(&doc).iter().map(|r| r.text.as_str()).collect();
    assert_eq!(placed, expected);

    for page in &doc.pages {
        assert!(page.runs.windows(2).all(|w| w[0].y < w[1].y));
    }
}

#[test]
fn long_post_spans_pages_with_title_on_first_only() {
    let engine = Engine::builtin();
    let doc = engine.render(&long_post(), &RenderConfig::default()).unwrap();
    assert!(doc.page_count() > 1);

    let first = &doc.pages[0];
    let titles: Vec<&GlyphRun> = first.runs.iter().filter(|r| r.weight == Weight::Bold).collect();
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0].text, "Hi");
    assert_eq!(titles[0].font_size, 20.0);

    for page in &doc.pages[1..] {
        assert!(page.runs.iter().all(|r| r.weight == Weight::Normal));
        assert!(page.runs.iter().all(|r| r.text != "Hi"));
        assert!(page.runs.iter().all(|r| !r.text.starts_with("By ")));
    }
}

#[test]
fn empty_content_after_stripping_is_rejected() {
    let engine = Engine::builtin();
    let config = RenderConfig::default();
    for content in ["", "   ", "<p></p>", "<div><br/></div>\n"] {
        let result = engine.render(&post("Title", content), &config);
        assert!(
            matches!(result, Err(Error::InvalidInput(_))),
            "{content:?} gave {result:?}"
        );
    }
}

#[test]
fn empty_title_is_rejected() {
    let engine = Engine::builtin();
    let result = engine.render(&post("  ", "Some text"), &RenderConfig::default());
    assert!(matches!(result, Err(Error::InvalidInput(_))));
}

#[test]
fn watermark_on_every_page_when_enabled() {
    let engine = Engine::builtin();
    let doc = engine.render(&long_post(), &RenderConfig::default()).unwrap();
    assert!(doc.page_count() > 1);
    for page in &doc.pages {
        let mark = page.watermark.as_ref().expect("watermark missing");
        assert_eq!(mark.text, "DEMO");
        assert_eq!(mark.rotation_degrees, 45.0);
        assert!(mark.centered);
    }
}

#[test]
fn no_watermark_when_disabled() {
    let engine = Engine::builtin();
    let config = RenderConfig {
        watermark_enabled: false,
        ..RenderConfig::default()
    };
    let doc = engine.render(&long_post(), &config).unwrap();
    assert!(doc.page_count() > 1);
    assert!(doc.pages.iter().all(|p| p.watermark.is_none()));
}

#[test]
fn metadata_lines() {
    let engine = Engine::builtin();
    let doc = engine
        .render(&post("Metadata", "<p>Body text.</p>"), &RenderConfig::default())
        .unwrap();
    let texts: Vec<&str> = doc.pages[0].runs.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Metadata",
            "By John Doe",
            "Published: 1/15/2024",
            "Category: React",
            "Tags: React, TypeScript, Architecture",
            "Body text.",
        ]
    );

    let ys: Vec<f32> = doc.pages[0].runs.iter().map(|r| r.y).collect();
    assert_eq!(ys, vec![20.0, 40.0, 48.0, 63.0, 71.0, 91.0]);
}

#[test]
fn footer_only_on_first_page() {
    let engine = Engine::builtin();
    let config = RenderConfig::default();
    let doc = engine.render(&long_post(), &config).unwrap();

    let footer = doc.pages[0].footer.as_ref().expect("footer missing");
    assert_eq!(footer.text, "Generated from Personal Blog Site");
    assert_eq!(footer.y, config.page_height - config.footer_offset);
    assert_eq!(footer.font_size, 8.0);
    assert!(doc.pages[1..].iter().all(|p| p.footer.is_none()));
}

#[test]
fn rendering_is_deterministic() {
    let engine = Engine::builtin();
    let config = RenderConfig::default();
    let first = engine.render(&long_post(), &config).unwrap();
    let second = engine.render(&long_post(), &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rejects_margins_that_swallow_the_page() {
    let engine = Engine::builtin();
    let config = RenderConfig {
        margin: 105.0,
        ..RenderConfig::default()
    };
    let result = engine.render(&long_post(), &config);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn rejects_spacing_that_moves_the_cursor_up() {
    let engine = Engine::builtin();
    let base = RenderConfig::default();
    let cases: Vec<(&str, RenderConfig)> = vec![
        ("title_line_advance", RenderConfig { title_line_advance: -1.0, ..base.clone() }),
        ("title_gap", RenderConfig { title_gap: -60.0, ..base.clone() }),
        ("meta_line_height", RenderConfig { meta_line_height: -8.0, ..base.clone() }),
        ("meta_gap", RenderConfig { meta_gap: -15.0, ..base.clone() }),
        ("body_gap", RenderConfig { body_gap: -40.0, ..base.clone() }),
        ("footer_offset", RenderConfig { footer_offset: -10.0, ..base.clone() }),
        ("line_height_body", RenderConfig { line_height_body: 0.0, ..base.clone() }),
    ];
    for (field, config) in cases {
        match engine.render(&long_post(), &config) {
            Err(Error::InvalidConfig(message)) => assert!(message.contains(field), "{message}"),
            other => panic!("{field}: expected InvalidConfig, got {other:?}"),
        }
    }
    // Zero spacing is allowed.
    let tight = RenderConfig {
        title_gap: 0.0,
        meta_gap: 0.0,
        body_gap: 0.0,
        ..base
    };
    assert!(engine.render(&long_post(), &tight).is_ok());
}

#[test]
fn rejects_non_finite_lengths() {
    let base = RenderConfig::default();
    let cases = [
        RenderConfig { page_height: f32::INFINITY, ..base.clone() },
        RenderConfig { page_width: f32::NAN, ..base.clone() },
        RenderConfig { margin: f32::INFINITY, ..base.clone() },
        RenderConfig { body_gap: f32::INFINITY, ..base.clone() },
        RenderConfig { title_gap: f32::NAN, ..base.clone() },
        RenderConfig { line_height_body: f32::INFINITY, ..base.clone() },
        RenderConfig { points_per_unit: f32::INFINITY, ..base.clone() },
    ];
    for config in cases {
        assert!(
            matches!(config.validate(), Err(Error::InvalidConfig(_))),
            "{config:?}"
        );
    }
    assert!(base.validate().is_ok());
}

#[test]
fn long_title_wraps_and_pushes_the_header_down() {
    let engine = Engine::builtin();
    let config = RenderConfig::default();
    let title = "A considerably longer headline that cannot possibly fit on one line of an A4 page";
    let doc = engine.render(&post(title, "Body"), &config).unwrap();

    let titles: Vec<&GlyphRun> = doc.pages[0]
        .runs
        .iter()
        .filter(|r| r.weight == Weight::Bold)
        .collect();
    assert!(titles.len() > 1);
    for (i, run) in titles.iter().enumerate() {
        assert_eq!(run.y, config.margin + i as f32 * config.title_line_advance);
    }
    let byline = &doc.pages[0].runs[titles.len()];
    assert_eq!(
        byline.y,
        config.margin + titles.len() as f32 * config.title_line_advance + config.title_gap
    );
}

#[test]
fn markup_is_not_rendered() {
    let engine = Engine::builtin();
    let doc = engine
        .render(
            &post("Tags", "<h2>Intro</h2><p>Plain <em>words</em> only.</p>"),
            &RenderConfig::default(),
        )
        .unwrap();
    let body: Vec<&str> = body_runs(&doc).iter().map(|r| r.text.as_str()).collect();
    assert_eq!(body, vec!["IntroPlain words only."]);
    assert_eq!(word_count("<h2>Intro</h2><p>Plain <em>words</em> only.</p>"), 3);
}
