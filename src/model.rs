use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub content: String, // may carry HTML tags
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub is_featured: bool,
    pub status: PostStatus,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
    pub author: Author,
}

impl PostRecord {
    pub fn pdf_filename(&self) -> String {
        format!("{}.pdf", self.slug)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSizes {
    pub title: f32,
    pub body: f32,
    pub meta: f32,
    pub footer: f32,
}

/// Page geometry and vertical metrics. Lengths are layout units, font sizes
/// are points; `points_per_unit` converts between the two.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub watermark_enabled: bool,
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub font_sizes: FontSizes,
    pub line_height_body: f32,
    pub title_line_advance: f32,
    pub title_gap: f32,
    pub meta_line_height: f32,
    pub meta_gap: f32, // after the publish date
    pub body_gap: f32, // after the tags line
    pub footer_offset: f32,
    pub points_per_unit: f32,
}

impl Default for RenderConfig {
    /// A4 portrait in millimetres.
    fn default() -> Self {
        RenderConfig {
            watermark_enabled: true,
            page_width: 210.0,
            page_height: 297.0,
            margin: 20.0,
            font_sizes: FontSizes {
                title: 20.0,
                body: 11.0,
                meta: 12.0,
                footer: 8.0,
            },
            line_height_body: 6.0,
            title_line_advance: 10.0,
            title_gap: 10.0,
            meta_line_height: 8.0,
            meta_gap: 15.0,
            body_gap: 20.0,
            footer_offset: 10.0,
            points_per_unit: 72.0 / 25.4,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("page_width", self.page_width),
            ("page_height", self.page_height),
            ("font_sizes.title", self.font_sizes.title),
            ("font_sizes.body", self.font_sizes.body),
            ("font_sizes.meta", self.font_sizes.meta),
            ("font_sizes.footer", self.font_sizes.footer),
            ("line_height_body", self.line_height_body),
            ("points_per_unit", self.points_per_unit),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }
        // Spacing may be zero but never pulls the cursor back up the page.
        let non_negative = [
            ("margin", self.margin),
            ("title_line_advance", self.title_line_advance),
            ("title_gap", self.title_gap),
            ("meta_line_height", self.meta_line_height),
            ("meta_gap", self.meta_gap),
            ("body_gap", self.body_gap),
            ("footer_offset", self.footer_offset),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }
        if self.margin >= self.page_width / 2.0 || self.margin >= self.page_height / 2.0 {
            return Err(Error::InvalidConfig(format!(
                "margin {} leaves no room on a {}x{} page",
                self.margin, self.page_width, self.page_height
            )));
        }
        Ok(())
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Lowest baseline a flowed line may sit on.
    pub fn bottom_bound(&self) -> f32 {
        self.page_height - self.margin
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weight {
    Normal,
    Bold,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlyphRun {
    pub text: String,
    pub x: f32,
    pub y: f32, // baseline, measured down from the page top
    pub font_size: f32,
    pub weight: Weight,
    pub color: [u8; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct Watermark {
    pub text: String,
    pub rotation_degrees: f32,
    pub centered: bool,
    pub font_size: f32,
    pub color: [u8; 3],
}

impl Watermark {
    pub fn demo() -> Self {
        Watermark {
            text: "DEMO".to_string(),
            rotation_degrees: 45.0,
            centered: true,
            font_size: 50.0,
            color: [200, 200, 200],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub watermark: Option<Watermark>,
    pub runs: Vec<GlyphRun>,
    pub footer: Option<GlyphRun>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderedDocument {
    pub page_width: f32,
    pub page_height: f32,
    pub points_per_unit: f32,
    pub pages: Vec<Page>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}
