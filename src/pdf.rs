use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};

use crate::engine::Engine;
use crate::error::Error;
use crate::fonts::to_winansi_bytes;
use crate::model::{GlyphRun, Page, RenderedDocument, Watermark, Weight};

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";

fn font_resource(weight: Weight) -> Name<'static> {
    match weight {
        Weight::Normal => Name(REGULAR_FONT),
        Weight::Bold => Name(BOLD_FONT),
    }
}

fn fill(content: &mut Content, [r, g, b]: [u8; 3]) {
    content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
}

/// Layout coordinates run top-down in layout units; PDF user space runs
/// bottom-up in points.
struct Space {
    scale: f32,
    height: f32,
}

impl Space {
    fn x(&self, x: f32) -> f32 {
        x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        (self.height - y) * self.scale
    }
}

fn draw_run(content: &mut Content, space: &Space, run: &GlyphRun) {
    fill(content, run.color);
    content
        .begin_text()
        .set_font(font_resource(run.weight), run.font_size)
        .next_line(space.x(run.x), space.y(run.y))
        .show(Str(&to_winansi_bytes(&run.text)))
        .end_text();
}

fn draw_watermark(content: &mut Content, doc: &RenderedDocument, engine: &Engine, mark: &Watermark) {
    let width = engine.face(Weight::Normal).text_width(&mark.text, mark.font_size);
    let (sin, cos) = mark.rotation_degrees.to_radians().sin_cos();
    let cx = doc.page_width * doc.points_per_unit / 2.0;
    let cy = doc.page_height * doc.points_per_unit / 2.0;
    // Shift back along the rotated baseline so the label's midpoint lands on the center.
    let (tx, ty) = if mark.centered {
        (cx - cos * width / 2.0, cy - sin * width / 2.0)
    } else {
        (cx, cy)
    };

    content.save_state();
    fill(content, mark.color);
    content
        .begin_text()
        .set_font(Name(REGULAR_FONT), mark.font_size)
        .set_text_matrix([cos, sin, -sin, cos, tx, ty])
        .show(Str(&to_winansi_bytes(&mark.text)))
        .end_text();
    content.restore_state();
}

fn page_content(page: &Page, doc: &RenderedDocument, engine: &Engine) -> Vec<u8> {
    let space = Space {
        scale: doc.points_per_unit,
        height: doc.page_height,
    };
    let mut content = Content::new();
    if let Some(mark) = &page.watermark {
        draw_watermark(&mut content, doc, engine, mark);
    }
    for run in page.runs.iter().chain(page.footer.as_ref()) {
        draw_run(&mut content, &space, run);
    }
    content.finish().to_vec()
}

pub fn encode(doc: &RenderedDocument, engine: &Engine) -> Result<Vec<u8>, Error> {
    let mut pdf = Pdf::new();
    let mut next_id = 1;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let regular_id = alloc();
    let bold_id = alloc();
    let page_ids: Vec<(Ref, Ref)> = doc.pages.iter().map(|_| (alloc(), alloc())).collect();

    let page_count = i32::try_from(doc.pages.len())
        .map_err(|_| Error::Pdf(format!("too many pages: {}", doc.pages.len())))?;
    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().map(|&(page_id, _)| page_id))
        .count(page_count);

    let media_box = Rect::new(
        0.0,
        0.0,
        doc.page_width * doc.points_per_unit,
        doc.page_height * doc.points_per_unit,
    );

    for (page, &(page_id, content_id)) in doc.pages.iter().zip(&page_ids) {
        pdf.stream(content_id, &page_content(page, doc, engine));

        let mut pdf_page = pdf.page(page_id);
        pdf_page
            .media_box(media_box)
            .parent(pages_id)
            .contents(content_id);
        pdf_page
            .resources()
            .fonts()
            .pair(Name(REGULAR_FONT), regular_id)
            .pair(Name(BOLD_FONT), bold_id);
    }

    engine.face(Weight::Normal).write(&mut pdf, regular_id, &mut alloc)?;
    engine.face(Weight::Bold).write(&mut pdf, bold_id, &mut alloc)?;

    Ok(pdf.finish())
}
