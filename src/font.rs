use crate::{
    common::{ot_round, tag_from_string},
    convertors::{cff, sfnt, woff2},
    glyph::{Glyph, GlyphList},
    metrics::{MetricType, UNITS_PER_EM},
    names::Names,
    registry::{self, NOTDEF},
    FundaidError,
};
use smol_str::SmolStr;
use std::collections::{BTreeMap, HashSet};
use write_fonts::{
    tables::{
        cmap::Cmap,
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        maxp::Maxp,
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::{FWord, Fixed, GlyphId, LongDateTime, Tag, UfWord, Version16Dot16},
};

const CFF_TAG: Tag = Tag::new(b"CFF ");
/// Bit 0 of the Unicode ranges: Basic Latin
const BASIC_LATIN_RANGE: u32 = 1;
/// Bit 0 of the code page ranges: Latin 1
const LATIN_1_CODE_PAGE: u32 = 1;

/// A compiled face: the OpenType binary and the data that went into it.
///
/// Fonts are only made by [`FontAssembler::build`] and never change
/// afterwards.
#[derive(Debug, Clone)]
pub struct Font {
    pub upm: u16,
    pub names: Names,
    pub glyphs: GlyphList,
    otf: Vec<u8>,
}

impl Font {
    /// The OpenType (CFF flavoured) binary
    pub fn otf(&self) -> &[u8] {
        &self.otf
    }

    /// The same tables in a WOFF2 container
    pub fn woff2(&self) -> Result<Vec<u8>, FundaidError> {
        woff2::compile(&self.otf)
    }

    pub fn glyph_order(&self) -> Vec<&str> {
        self.glyphs.iter().map(|g| g.name.as_str()).collect()
    }
}

/// Advance and bearing of one glyph, with its rounded ink extent
#[derive(Debug, Clone, Copy)]
struct HorizontalMetric {
    advance: u16,
    lsb: i16,
    ink_width: Option<i32>,
}

/// Builds a [`Font`] one table at a time.
///
/// Each step checks that the steps it depends on have already run and
/// fails with [`FundaidError::OutOfOrder`] otherwise. The intended order is
/// glyph order, character map, `head`, `post`, `name`, drawing, `CFF `,
/// `hmtx`, `hhea`, `OS/2`, and finally [`build`](Self::build).
#[derive(Debug, Default)]
pub struct FontAssembler {
    names: Names,
    glyph_order: Option<Vec<SmolStr>>,
    character_map: Option<BTreeMap<char, GlyphId>>,
    head: Option<Head>,
    glyphs: Option<GlyphList>,
    metrics: Option<Vec<HorizontalMetric>>,
    tables: write_fonts::FontBuilder<'static>,
}

impl FontAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    fn require<'a, T>(
        value: &'a Option<T>,
        step: &'static str,
        requires: &'static str,
    ) -> Result<&'a T, FundaidError> {
        value
            .as_ref()
            .ok_or(FundaidError::OutOfOrder { step, requires })
    }

    fn require_table(&self, tag: Tag, step: &'static str) -> Result<(), FundaidError> {
        if self.tables.contains(tag) {
            return Ok(());
        }
        let requires = match &tag.to_be_bytes() {
            b"cmap" => "setup_character_map",
            b"post" => "setup_post",
            b"name" => "setup_name_table",
            b"CFF " => "setup_cff",
            b"hmtx" => "setup_horizontal_metrics",
            b"hhea" => "setup_horizontal_header",
            b"OS/2" => "setup_os2",
            _ => "an earlier step",
        };
        Err(FundaidError::OutOfOrder { step, requires })
    }

    /// Fix the glyph order. `.notdef` must come first and names must be
    /// unique.
    pub fn setup_glyph_order(&mut self, order: &[&str]) -> Result<&mut Self, FundaidError> {
        if order.first() != Some(&NOTDEF) {
            return Err(FundaidError::NotdefNotFirst);
        }
        let mut seen = HashSet::new();
        for name in order {
            if !seen.insert(*name) {
                return Err(FundaidError::DuplicateGlyph {
                    glyph: name.to_string(),
                });
            }
        }
        self.glyph_order = Some(order.iter().map(|n| SmolStr::new(n)).collect());
        Ok(self)
    }

    /// Map code points to glyph names, which must all be in the glyph order.
    pub fn setup_character_map(
        &mut self,
        mapping: &[(char, &str)],
    ) -> Result<&mut Self, FundaidError> {
        let order = Self::require(&self.glyph_order, "setup_character_map", "setup_glyph_order")?;
        let mut resolved = Vec::with_capacity(mapping.len());
        for (codepoint, name) in mapping {
            let gid = order
                .iter()
                .position(|g| g == name)
                .ok_or_else(|| FundaidError::GlyphNotFound {
                    glyph: name.to_string(),
                })?;
            resolved.push((*codepoint, GlyphId::new(gid as u32)));
        }
        let cmap = Cmap::from_mappings(resolved.iter().copied())?;
        self.tables.add_table(&cmap)?;
        self.character_map = Some(resolved.into_iter().collect());
        Ok(self)
    }

    /// Font header. The bounding box is filled in at build time.
    pub fn setup_head(&mut self) -> Result<&mut Self, FundaidError> {
        Self::require(&self.glyph_order, "setup_head", "setup_glyph_order")?;
        self.head = Some(Head {
            font_revision: Fixed::from_f64(1.0),
            // baseline at y=0, left sidebearing point at x=0
            flags: Flags::from_bits_truncate(0b11),
            units_per_em: UNITS_PER_EM,
            // Zero timestamps keep the output reproducible
            created: LongDateTime::new(0),
            modified: LongDateTime::new(0),
            mac_style: MacStyle::empty(),
            lowest_rec_ppem: 3,
            ..Default::default()
        });
        Ok(self)
    }

    /// `post` version 3.0: no glyph names, as CFF carries them.
    pub fn setup_post(&mut self) -> Result<&mut Self, FundaidError> {
        Self::require(&self.glyph_order, "setup_post", "setup_glyph_order")?;
        let post = Post {
            version: Version16Dot16::VERSION_3_0,
            italic_angle: Fixed::from_f64(0.0),
            underline_position: FWord::new(MetricType::UnderlinePosition.value()),
            underline_thickness: FWord::new(MetricType::UnderlineThickness.value()),
            is_fixed_pitch: 0,
            ..Default::default()
        };
        self.tables.add_table(&post)?;
        Ok(self)
    }

    pub fn setup_name_table(&mut self, names: &Names) -> Result<&mut Self, FundaidError> {
        self.names = names.clone();
        let table = self.names.to_name_table();
        self.tables.add_table(&table)?;
        Ok(self)
    }

    /// Run every glyph's drawer, in glyph order.
    pub fn draw_glyphs(&mut self) -> Result<&mut Self, FundaidError> {
        let order = Self::require(&self.glyph_order, "draw_glyphs", "setup_glyph_order")?;
        let mut glyphs = Vec::with_capacity(order.len());
        for name in order {
            let spec = registry::get(name).ok_or_else(|| FundaidError::GlyphNotFound {
                glyph: name.to_string(),
            })?;
            glyphs.push(Glyph::draw(spec)?);
        }
        log::info!("Drew {} glyphs", glyphs.len());
        self.glyphs = Some(GlyphList(glyphs));
        Ok(self)
    }

    /// Encode the drawn outlines as the `CFF ` table.
    pub fn setup_cff(&mut self) -> Result<&mut Self, FundaidError> {
        let glyphs = Self::require(&self.glyphs, "setup_cff", "draw_glyphs")?;
        let table = cff::compile(&self.names, glyphs)?;
        log::debug!("Compiled CFF table, {} bytes", table.len());
        self.tables.add_raw(CFF_TAG, table);
        Ok(self)
    }

    /// One advance and a zero left side bearing per glyph.
    pub fn setup_horizontal_metrics(&mut self) -> Result<&mut Self, FundaidError> {
        let glyphs = Self::require(&self.glyphs, "setup_horizontal_metrics", "draw_glyphs")?;
        self.require_table(CFF_TAG, "setup_horizontal_metrics")?;
        let mut metrics = Vec::with_capacity(glyphs.len());
        for glyph in glyphs.iter() {
            let ink_width = glyph
                .bounds()?
                .map(|rect| ot_round(rect.x1) - ot_round(rect.x0));
            metrics.push(HorizontalMetric {
                advance: glyph.advance_width,
                lsb: glyph.left_side_bearing,
                ink_width,
            });
        }
        let hmtx = Hmtx {
            h_metrics: metrics
                .iter()
                .map(|m| LongMetric {
                    advance: m.advance,
                    side_bearing: m.lsb,
                })
                .collect(),
            left_side_bearings: vec![],
        };
        self.tables.add_table(&hmtx)?;
        self.metrics = Some(metrics);
        Ok(self)
    }

    /// Vertical metrics, plus extremes derived from the horizontal metrics.
    pub fn setup_horizontal_header(&mut self) -> Result<&mut Self, FundaidError> {
        let metrics = Self::require(
            &self.metrics,
            "setup_horizontal_header",
            "setup_horizontal_metrics",
        )?;
        let advance_width_max = metrics.iter().map(|m| m.advance).max().unwrap_or(0);
        let inked = metrics
            .iter()
            .filter_map(|m| m.ink_width.map(|w| (m, w)))
            .collect::<Vec<_>>();
        let min_lsb = inked.iter().map(|(m, _)| i32::from(m.lsb)).min();
        let min_rsb = inked
            .iter()
            .map(|(m, w)| i32::from(m.advance) - i32::from(m.lsb) - w)
            .min();
        let max_extent = inked.iter().map(|(m, w)| i32::from(m.lsb) + w).max();
        let number_of_h_metrics = u16::try_from(metrics.len())
            .map_err(|_| FundaidError::General("too many glyphs".to_string()))?;
        let hhea = Hhea {
            ascender: FWord::new(MetricType::HheaAscender.value()),
            descender: FWord::new(MetricType::HheaDescender.value()),
            line_gap: FWord::new(MetricType::HheaLineGap.value()),
            advance_width_max: UfWord::new(advance_width_max),
            min_left_side_bearing: FWord::new(clamp_i16(min_lsb.unwrap_or(0))),
            min_right_side_bearing: FWord::new(clamp_i16(min_rsb.unwrap_or(0))),
            x_max_extent: FWord::new(clamp_i16(max_extent.unwrap_or(0))),
            caret_slope_rise: 1,
            caret_slope_run: 0,
            caret_offset: 0,
            number_of_h_metrics,
        };
        self.tables.add_table(&hhea)?;
        Ok(self)
    }

    /// `OS/2` metrics mirroring `hhea`, with character ranges from the
    /// character map.
    pub fn setup_os2(&mut self) -> Result<&mut Self, FundaidError> {
        let metrics = Self::require(&self.metrics, "setup_os2", "setup_horizontal_metrics")?;
        let character_map =
            Self::require(&self.character_map, "setup_os2", "setup_character_map")?;

        let advances = metrics
            .iter()
            .map(|m| f64::from(m.advance))
            .filter(|a| *a > 0.0)
            .collect::<Vec<_>>();
        let x_avg_char_width = if advances.is_empty() {
            0
        } else {
            ot_round(advances.iter().sum::<f64>() / advances.len() as f64)
        };
        // Characters beyond the BMP are reported as 0xFFFF
        let char_index = |c: &char| u16::try_from(u32::from(*c)).unwrap_or(u16::MAX);
        let first = character_map.keys().next().map(char_index).unwrap_or(0);
        let last = character_map.keys().next_back().map(char_index).unwrap_or(0);
        let unicode_range = if character_map.keys().any(|c| (' '..='~').contains(c)) {
            BASIC_LATIN_RANGE
        } else {
            0
        };

        let os2 = Os2 {
            x_avg_char_width: clamp_i16(x_avg_char_width),
            us_weight_class: 400,
            us_width_class: 5,
            fs_type: 0,
            y_strikeout_size: MetricType::UnderlineThickness.value(),
            y_strikeout_position: MetricType::XHeight.value() / 2,
            ul_unicode_range_1: unicode_range,
            ach_vend_id: tag_from_string("NONE")?,
            fs_selection: SelectionFlags::REGULAR,
            us_first_char_index: first,
            us_last_char_index: last,
            s_typo_ascender: MetricType::TypoAscender.value(),
            s_typo_descender: MetricType::TypoDescender.value(),
            s_typo_line_gap: MetricType::TypoLineGap.value(),
            us_win_ascent: MetricType::WinAscent.value().unsigned_abs(),
            us_win_descent: MetricType::WinDescent.value().unsigned_abs(),
            ul_code_page_range_1: Some(LATIN_1_CODE_PAGE),
            ul_code_page_range_2: Some(0),
            sx_height: Some(MetricType::XHeight.value()),
            s_cap_height: Some(MetricType::CapHeight.value()),
            us_default_char: Some(0),
            us_break_char: Some(u16::from(b' ')),
            us_max_context: Some(0),
            ..Default::default()
        };
        self.tables.add_table(&os2)?;
        Ok(self)
    }

    /// Add `head` and `maxp` and assemble the sfnt.
    pub fn build(&mut self) -> Result<Font, FundaidError> {
        let glyphs = Self::require(&self.glyphs, "build", "draw_glyphs")?.clone();
        let mut head = Self::require(&self.head, "build", "setup_head")?.clone();
        for tag in [b"cmap", b"post", b"name", b"CFF ", b"hmtx", b"hhea", b"OS/2"] {
            self.require_table(Tag::new(tag), "build")?;
        }

        if let Some(bounds) = glyphs.bounds()? {
            head.x_min = clamp_i16(bounds.x0.floor() as i32);
            head.y_min = clamp_i16(bounds.y0.floor() as i32);
            head.x_max = clamp_i16(bounds.x1.ceil() as i32);
            head.y_max = clamp_i16(bounds.y1.ceil() as i32);
        }
        self.tables.add_table(&head)?;
        let maxp = Maxp {
            num_glyphs: u16::try_from(glyphs.len())
                .map_err(|_| FundaidError::General("too many glyphs".to_string()))?,
            ..Default::default()
        };
        self.tables.add_table(&maxp)?;

        let otf = sfnt::finalize_otf(self.tables.build())?;
        log::debug!("Assembled font binary, {} bytes", otf.len());
        Ok(Font {
            upm: UNITS_PER_EM,
            names: self.names.clone(),
            glyphs,
            otf,
        })
    }
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i16::MIN.into(), i16::MAX.into()) as i16
}
