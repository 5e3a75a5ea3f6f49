use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FundaidError {
    #[error("Cannot run {step} before {requires}")]
    OutOfOrder {
        step: &'static str,
        requires: &'static str,
    },

    #[error("Glyph order must start with .notdef")]
    NotdefNotFirst,

    #[error("Glyph {glyph} appears twice in the glyph order")]
    DuplicateGlyph { glyph: String },

    #[error("Glyph {glyph} not found")]
    GlyphNotFound { glyph: String },

    #[error("Ill-constructed path in glyph {glyph}: {reason}")]
    BadPath { glyph: String, reason: String },

    #[error("Error building character map: {0}")]
    CmapConflict(#[from] write_fonts::tables::cmap::CmapConflict),

    #[error("Error compiling font: {0}")]
    Build(#[from] write_fonts::BuilderError),

    #[error("Error reading back compiled font: {0}")]
    Read(String),

    #[error("Brotli compression is not available in this build")]
    CompressionUnavailable,

    #[error("Error: {0}")]
    General(String),

    #[error("IO Error: {0}")]
    IO(#[from] io::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

