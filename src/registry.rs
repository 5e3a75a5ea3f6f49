//! The fixed glyph set of the face, in glyph order.

use crate::{drawers, OutlinePen};

/// Name of the fallback glyph, which must be glyph 0
pub const NOTDEF: &str = ".notdef";

/// A drawer issues one glyph's outline on a pen
pub type DrawFn = fn(&mut dyn OutlinePen);

/// One registry entry: a glyph name bound to its drawer and advance.
#[derive(Clone, Copy)]
pub struct GlyphSpec {
    pub name: &'static str,
    pub codepoint: Option<char>,
    /// Tightened on purpose below the natural width of the outline, so
    /// letters sit closer together.
    pub advance_width: u16,
    pub draw: DrawFn,
}

impl std::fmt::Debug for GlyphSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphSpec")
            .field("name", &self.name)
            .field("codepoint", &self.codepoint)
            .field("advance_width", &self.advance_width)
            .finish_non_exhaustive()
    }
}

pub static GLYPHS: [GlyphSpec; 8] = [
    GlyphSpec {
        name: NOTDEF,
        codepoint: None,
        advance_width: 500,
        draw: drawers::draw_nothing,
    },
    GlyphSpec {
        name: "space",
        codepoint: Some(' '),
        advance_width: 250,
        draw: drawers::draw_nothing,
    },
    GlyphSpec {
        name: "F",
        codepoint: Some('F'),
        advance_width: 550,
        draw: drawers::draw_f,
    },
    GlyphSpec {
        name: "U",
        codepoint: Some('U'),
        advance_width: 650,
        draw: drawers::draw_u,
    },
    GlyphSpec {
        name: "N",
        codepoint: Some('N'),
        advance_width: 650,
        draw: drawers::draw_n,
    },
    GlyphSpec {
        name: "D",
        codepoint: Some('D'),
        advance_width: 650,
        draw: drawers::draw_d,
    },
    GlyphSpec {
        name: "A",
        codepoint: Some('A'),
        advance_width: 650,
        draw: drawers::draw_a,
    },
    GlyphSpec {
        name: "I",
        codepoint: Some('I'),
        advance_width: 280,
        draw: drawers::draw_i,
    },
];

/// Glyph names in glyph order
pub fn glyph_order() -> Vec<&'static str> {
    GLYPHS.iter().map(|spec| spec.name).collect()
}

/// Code point to glyph name, for every encoded glyph
pub fn character_map() -> Vec<(char, &'static str)> {
    GLYPHS
        .iter()
        .filter_map(|spec| spec.codepoint.map(|cp| (cp, spec.name)))
        .collect()
}

pub fn get(name: &str) -> Option<&'static GlyphSpec> {
    GLYPHS.iter().find(|spec| spec.name == name)
}
