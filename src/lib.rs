#![deny(clippy::unwrap_used, clippy::expect_used)]
//! Procedural generator for the FundAid Display typeface.
//!
//! Each glyph is drawn by a small function issuing pen commands in design
//! units. [`build_font`] runs the drawers, assembles an OpenType font with
//! CFF outlines, and [`generate`] writes it out as `.otf` and, when Brotli
//! support is compiled in, `.woff2`.
//!
//! ```
//! let font = fundaid_font::build_font()?;
//! assert_eq!(&font.otf()[..4], b"OTTO");
//! assert_eq!(font.glyphs.for_char('F').map(|g| g.contour_count()), Some(3));
//! # Ok::<(), fundaid_font::FundaidError>(())
//! ```

mod common;
pub mod convertors;
pub mod drawers;
mod error;
mod font;
mod glyph;
pub mod metrics;
pub mod names;
pub mod output;
pub mod registry;
mod shape;

pub use crate::{
    common::{Node, NodeType},
    error::FundaidError,
    font::{Font, FontAssembler},
    glyph::{Glyph, GlyphList},
    metrics::MetricType,
    names::Names,
    output::{OutputOptions, OutputReport},
    shape::{check_contours, CommandRecorder, OutlinePen, Path, PathBuilder, PathCommand},
};

/// Build the font with the given naming metadata, running every assembly
/// step in order.
pub fn build_font_with_names(names: &Names) -> Result<Font, FundaidError> {
    FontAssembler::new()
        .setup_glyph_order(&registry::glyph_order())?
        .setup_character_map(&registry::character_map())?
        .setup_head()?
        .setup_post()?
        .setup_name_table(names)?
        .draw_glyphs()?
        .setup_cff()?
        .setup_horizontal_metrics()?
        .setup_horizontal_header()?
        .setup_os2()?
        .build()
}

/// Build FundAid Display with its standard names.
pub fn build_font() -> Result<Font, FundaidError> {
    build_font_with_names(&Names::default())
}

/// Build the font and write its files.
pub fn generate(options: &OutputOptions) -> Result<OutputReport, FundaidError> {
    let font = build_font()?;
    output::write(&font, options)
}
