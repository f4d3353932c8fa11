use std::path::Path;

use pdf_writer::{Name, Pdf, Rect, Ref};
use ttf_parser::Face;

use crate::error::Error;

/// Where a face's glyphs come from when the PDF is written.
#[derive(Debug)]
enum FaceSource {
    /// One of the PDF base-14 fonts; nothing is embedded.
    Builtin(&'static str),
    TrueType {
        ps_name: String,
        data: Vec<u8>,
        face_index: u32,
    },
}

/// A font face with WinAnsi advance widths at 1000 units/em for bytes 32..=255.
#[derive(Debug)]
pub struct FontFace {
    source: FaceSource,
    widths_1000: Vec<f32>,
}

impl FontFace {
    pub fn helvetica() -> Self {
        FontFace {
            source: FaceSource::Builtin("Helvetica"),
            widths_1000: helvetica_widths(),
        }
    }

    pub fn helvetica_bold() -> Self {
        FontFace {
            source: FaceSource::Builtin("Helvetica-Bold"),
            widths_1000: helvetica_bold_widths(),
        }
    }

    /// Load a TrueType/OpenType file (first face of a collection).
    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = std::fs::read(path).map_err(|e| {
            Error::EngineUnavailable(format!("cannot read font {}: {e}", path.display()))
        })?;
        let face = Face::parse(&data, 0).map_err(|e| {
            Error::EngineUnavailable(format!("cannot parse font {}: {e}", path.display()))
        })?;
        let widths_1000 = truetype_widths(&face);
        let ps_name = postscript_name(&face).unwrap_or_else(|| {
            path.file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("EmbeddedFont")
                .to_string()
        });
        log::debug!("Loaded font {ps_name} from {}", path.display());
        Ok(FontFace {
            source: FaceSource::TrueType {
                ps_name,
                data,
                face_index: 0,
            },
            widths_1000,
        })
    }

    pub fn name(&self) -> &str {
        match &self.source {
            FaceSource::Builtin(name) => name,
            FaceSource::TrueType { ps_name, .. } => ps_name,
        }
    }

    /// Advance width of `text` in points at `font_size`.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let units: f32 = to_winansi_bytes(text)
            .into_iter()
            .map(|b| self.widths_1000[(b - 32) as usize])
            .sum();
        units * font_size / 1000.0
    }

    /// Write the font objects for this face under `font_ref`.
    pub(crate) fn write(
        &self,
        pdf: &mut Pdf,
        font_ref: Ref,
        alloc: &mut impl FnMut() -> Ref,
    ) -> Result<(), Error> {
        match &self.source {
            FaceSource::Builtin(base) => {
                pdf.type1_font(font_ref)
                    .base_font(Name(base.as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
                Ok(())
            }
            FaceSource::TrueType {
                ps_name,
                data,
                face_index,
            } => embed_truetype(
                pdf,
                font_ref,
                alloc(),
                alloc(),
                ps_name,
                data,
                *face_index,
                &self.widths_1000,
            ),
        }
    }
}

fn postscript_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .find(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME && name.is_unicode())
        .and_then(|name| name.to_string())
        .map(|s| s.replace(' ', ""))
}

/// Windows-1252 (WinAnsi) byte to Unicode char mapping.
/// Bytes 0x80-0x9F are remapped; all others map directly to their Unicode codepoint.
fn winansi_to_char(byte: u8) -> char {
    match byte {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => byte as char,
    }
}

/// Encode text as WinAnsi bytes. Whitespace becomes a plain space; other
/// control characters and anything outside Windows-1252 are dropped, so
/// measurement and drawing agree.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars()
        .filter_map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => Some(c as u8),
            _ if c.is_whitespace() => Some(b' '),
            _ => (0x80u8..=0x9F).find(|&b| winansi_to_char(b) == c && b as u32 != c as u32),
        })
        .collect()
}

/// Approximate Helvetica widths at 1000 units/em for WinAnsi bytes 32..=255.
fn helvetica_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,                          // space
            33..=47 => 333.0,                     // punctuation
            48..=57 => 556.0,                     // digits
            58..=64 => 333.0,
            73 | 74 => 278.0,                     // I J
            77 => 833.0,                          // M
            65..=90 => 667.0,
            91..=96 => 333.0,
            102 | 105 | 106 | 108 | 116 => 278.0, // f i j l t
            109 | 119 => 833.0,                   // m w
            97..=122 => 556.0,
            _ => 556.0,
        })
        .collect()
}

/// Approximate Helvetica-Bold widths, same layout as [`helvetica_widths`].
fn helvetica_bold_widths() -> Vec<f32> {
    (32u8..=255u8)
        .map(|b| match b {
            32 => 278.0,
            33..=47 => 333.0,
            48..=57 => 556.0,
            58..=64 => 333.0,
            73 => 278.0,
            74 => 556.0,
            77 => 833.0,
            87 => 944.0,                     // W
            65..=90 => 722.0,
            91..=96 => 333.0,
            105 | 106 | 108 => 278.0,        // i j l
            102 | 116 => 333.0,              // f t
            109 => 889.0,                    // m
            119 => 778.0,                    // w
            97..=122 => 611.0,
            _ => 611.0,
        })
        .collect()
}

fn truetype_widths(face: &Face) -> Vec<f32> {
    let units = face.units_per_em() as f32;
    (32u8..=255u8)
        .map(|byte| {
            face.glyph_index(winansi_to_char(byte))
                .and_then(|gid| face.glyph_hor_advance(gid))
                .map(|adv| adv as f32 / units * 1000.0)
                .unwrap_or(0.0)
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn embed_truetype(
    pdf: &mut Pdf,
    font_ref: Ref,
    descriptor_ref: Ref,
    data_ref: Ref,
    ps_name: &str,
    font_data: &[u8],
    face_index: u32,
    widths: &[f32],
) -> Result<(), Error> {
    let face = Face::parse(font_data, face_index)
        .map_err(|e| Error::Pdf(format!("font {ps_name} no longer parses: {e}")))?;

    let units = face.units_per_em() as f32;
    let ascent = face.ascender() as f32 / units * 1000.0;
    let descent = face.descender() as f32 / units * 1000.0;
    let cap_height = face
        .capital_height()
        .map(|h| h as f32 / units * 1000.0)
        .unwrap_or(700.0);

    let bb = face.global_bounding_box();
    let bbox = Rect::new(
        bb.x_min as f32 / units * 1000.0,
        bb.y_min as f32 / units * 1000.0,
        bb.x_max as f32 / units * 1000.0,
        bb.y_max as f32 / units * 1000.0,
    );

    let data_len = i32::try_from(font_data.len())
        .map_err(|_| Error::Pdf(format!("font {ps_name} is too large to embed")))?;
    pdf.stream(data_ref, font_data)
        .pair(Name(b"Length1"), data_len);

    pdf.font_descriptor(descriptor_ref)
        .name(Name(ps_name.as_bytes()))
        .flags(pdf_writer::types::FontFlags::NON_SYMBOLIC)
        .bbox(bbox)
        .italic_angle(0.0)
        .ascent(ascent)
        .descent(descent)
        .cap_height(cap_height)
        .stem_v(80.0)
        .font_file2(data_ref);

    let mut d = pdf.indirect(font_ref).dict();
    d.pair(Name(b"Type"), Name(b"Font"));
    d.pair(Name(b"Subtype"), Name(b"TrueType"));
    d.pair(Name(b"BaseFont"), Name(ps_name.as_bytes()));
    d.pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));
    d.pair(Name(b"FirstChar"), 32i32);
    d.pair(Name(b"LastChar"), 255i32);
    d.pair(Name(b"FontDescriptor"), descriptor_ref);
    d.insert(Name(b"Widths"))
        .array()
        .items(widths.iter().copied());
    Ok(())
}
