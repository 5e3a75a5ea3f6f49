//! Design constants of the FundAid Display face.
//!
//! Everything is expressed in font design units on a 1000 unit em.

/// Coordinate grid resolution
pub const UNITS_PER_EM: u16 = 1000;
/// Ascender, written to `hhea` and mirrored in `OS/2`
pub const ASCENT: i16 = 800;
/// Descender (negative), written to `hhea` and mirrored in `OS/2`
pub const DESCENT: i16 = -200;
/// Height of the flat tops of capitals
pub const CAP_HEIGHT: f64 = 700.0;
/// Height of the middle bar of F
pub const X_HEIGHT: f64 = 500.0;
/// Typographic line gap for `OS/2`
pub const TYPO_LINE_GAP: i16 = 200;

/// Thick monoline stroke used by every letter
pub const STROKE_WIDTH: f64 = 120.0;
/// Radius of the rounded terminals of the logo lettering
pub const TERMINAL_RADIUS: f64 = 60.0;
/// Nominal spacing between letters; the registry widths are tightened from it
pub const LETTER_SPACING: f64 = 50.0;

/// Type of font metric
#[derive(Debug, Clone, Copy, PartialEq, Hash, Eq)]
pub enum MetricType {
    /// X height
    XHeight,
    /// Cap height
    CapHeight,
    /// Ascender (to be placed in the `hhea` table)
    HheaAscender,
    /// Descender (to be placed in the `hhea` table)
    HheaDescender,
    /// Line gap (to be placed in the `hhea` table)
    HheaLineGap,
    /// Windows Ascender (to be placed in the `OS/2` table)
    WinAscent,
    /// Windows Descender (to be placed in the `OS/2` table)
    WinDescent,
    /// Typographic Ascender (to be placed in the `OS/2` table)
    TypoAscender,
    /// Typographic Descender (to be placed in the `OS/2` table)
    TypoDescender,
    /// Typographic Line Gap (to be placed in the `OS/2` table)
    TypoLineGap,
    /// Underline position (to be placed in the `post` table)
    UnderlinePosition,
    /// Underline thickness (to be placed in the `post` table)
    UnderlineThickness,
}

impl MetricType {
    /// The value this face uses for the metric.
    pub fn value(&self) -> i16 {
        match self {
            MetricType::XHeight => X_HEIGHT as i16,
            MetricType::CapHeight => CAP_HEIGHT as i16,
            MetricType::HheaAscender | MetricType::TypoAscender | MetricType::WinAscent => ASCENT,
            MetricType::HheaDescender | MetricType::TypoDescender => DESCENT,
            // usWinDescent is a positive distance below the baseline
            MetricType::WinDescent => DESCENT.saturating_abs(),
            MetricType::HheaLineGap => 0,
            MetricType::TypoLineGap => TYPO_LINE_GAP,
            MetricType::UnderlinePosition => -100,
            MetricType::UnderlineThickness => 50,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os2_mirrors_hhea() {
        assert_eq!(MetricType::TypoAscender.value(), MetricType::HheaAscender.value());
        assert_eq!(MetricType::TypoDescender.value(), MetricType::HheaDescender.value());
        assert_eq!(MetricType::WinAscent.value(), 800);
        assert_eq!(MetricType::WinDescent.value(), 200);
        assert_eq!(MetricType::TypoLineGap.value(), 200);
    }

    #[test]
    fn logo_constants() {
        assert_eq!(TERMINAL_RADIUS, STROKE_WIDTH / 2.0);
        assert_eq!(LETTER_SPACING, 50.0);
    }
}
