use crate::engine::Engine;
use crate::error::Error;
use crate::markup::strip_markup;
use crate::model::{GlyphRun, Page, PostRecord, RenderConfig, RenderedDocument, Watermark, Weight};

const TEXT_COLOR: [u8; 3] = [0, 0, 0];
const FOOTER_COLOR: [u8; 3] = [128, 128, 128];
const FOOTER_TEXT: &str = "Generated from Personal Blog Site";

/// Break `text` into lines no wider than `max_width` according to `measure`.
///
/// Newlines are hard breaks; within a paragraph any other whitespace
/// separates words, which are packed greedily and joined by single spaces. A word wider than `max_width` gets a line of its
/// own and is not split. An empty paragraph produces an empty line.
pub fn wrap_text(text: &str, max_width: f32, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if measure(&candidate) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            }
        }
        lines.push(line);
    }
    lines
}

/// Wrap at the given weight and size, measuring in layout units.
pub fn wrap_for(
    engine: &Engine,
    config: &RenderConfig,
    text: &str,
    font_size: f32,
    weight: Weight,
) -> Vec<String> {
    let face = engine.face(weight);
    wrap_text(text, config.content_width(), |s| {
        face.text_width(s, font_size) / config.points_per_unit
    })
}

/// Publish date as month/day/year without padding, in the timestamp's own offset.
pub fn format_publish_date(post: &PostRecord) -> String {
    post.created_at.format("%-m/%-d/%Y").to_string()
}

struct PageFlow<'a> {
    config: &'a RenderConfig,
    done: Vec<Page>,
    current: Page,
    y: f32,
}

impl<'a> PageFlow<'a> {
    fn new(config: &'a RenderConfig) -> Self {
        PageFlow {
            config,
            done: Vec::new(),
            current: fresh_page(config),
            y: config.margin,
        }
    }

    fn run(&self, text: &str, y: f32, font_size: f32, weight: Weight) -> GlyphRun {
        GlyphRun {
            text: text.to_string(),
            x: self.config.margin,
            y,
            font_size,
            weight,
            color: TEXT_COLOR,
        }
    }

    fn place_at(&mut self, text: &str, y: f32, font_size: f32, weight: Weight) {
        let run = self.run(text, y, font_size, weight);
        self.current.runs.push(run);
    }

    /// Place a header line at the cursor and move down by `advance`.
    fn header_line(&mut self, text: &str, advance: f32) {
        self.place_at(text, self.y, self.config.font_sizes.meta, Weight::Normal);
        self.y += advance;
    }

    fn body_line(&mut self, text: &str) {
        if self.y > self.config.bottom_bound() {
            let finished = std::mem::replace(&mut self.current, fresh_page(self.config));
            self.done.push(finished);
            self.y = self.config.margin;
            log::debug!("Page break before line {text:?}, starting page {}", self.done.len() + 1);
        }
        self.place_at(text, self.y, self.config.font_sizes.body, Weight::Normal);
        self.y += self.config.line_height_body;
    }

    fn finish(mut self) -> Vec<Page> {
        self.done.push(self.current);
        self.done
    }
}

fn fresh_page(config: &RenderConfig) -> Page {
    Page {
        watermark: config.watermark_enabled.then(Watermark::demo),
        runs: Vec::new(),
        footer: None,
    }
}

/// Lay out a post into pages. Pure: identical inputs give identical output.
pub fn render(
    engine: &Engine,
    post: &PostRecord,
    config: &RenderConfig,
) -> Result<RenderedDocument, Error> {
    config.validate()?;
    if post.title.trim().is_empty() {
        return Err(Error::InvalidInput("title is empty".to_string()));
    }
    let body = strip_markup(&post.content);
    if body.trim().is_empty() {
        return Err(Error::InvalidInput(
            "content is empty after markup stripping".to_string(),
        ));
    }

    let sizes = config.font_sizes;
    let mut flow = PageFlow::new(config);

    let title_lines = wrap_for(engine, config, &post.title, sizes.title, Weight::Bold);
    for (i, line) in title_lines.iter().enumerate() {
        let y = flow.y + i as f32 * config.title_line_advance;
        flow.place_at(line, y, sizes.title, Weight::Bold);
    }
    flow.y += title_lines.len() as f32 * config.title_line_advance + config.title_gap;

    flow.header_line(&format!("By {}", post.author.name), config.meta_line_height);
    flow.header_line(
        &format!("Published: {}", format_publish_date(post)),
        config.meta_gap,
    );
    flow.header_line(&format!("Category: {}", post.category), config.meta_line_height);
    flow.header_line(&format!("Tags: {}", post.tags.join(", ")), config.body_gap);

    let body_lines = wrap_for(engine, config, &body, sizes.body, Weight::Normal);
    for line in &body_lines {
        flow.body_line(line);
    }

    let mut pages = flow.finish();
    if let Some(first) = pages.first_mut() {
        first.footer = Some(GlyphRun {
            text: FOOTER_TEXT.to_string(),
            x: config.margin,
            y: config.page_height - config.footer_offset,
            font_size: sizes.footer,
            weight: Weight::Normal,
            color: FOOTER_COLOR,
        });
    }

    log::debug!(
        "Laid out {:?}: {} title lines, {} body lines, {} pages",
        post.slug,
        title_lines.len(),
        body_lines.len(),
        pages.len()
    );

    Ok(RenderedDocument {
        page_width: config.page_width,
        page_height: config.page_height,
        points_per_unit: config.points_per_unit,
        pages,
    })
}
