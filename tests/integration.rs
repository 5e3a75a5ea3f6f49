use fundaid_font::{build_font, generate, FundaidError, OutputOptions};
use pretty_assertions::assert_eq;
use skrifa::{
    instance::{LocationRef, Size},
    outline::{DrawSettings, OutlinePen},
    raw::TableProvider,
    string::StringId,
    FontRef, GlyphId, MetadataProvider,
};

/// Counts contours and remembers where each one starts
#[derive(Default)]
struct ContourCounter {
    starts: Vec<(f32, f32)>,
    closes: usize,
    curves: usize,
}

impl OutlinePen for ContourCounter {
    fn move_to(&mut self, x: f32, y: f32) {
        self.starts.push((x, y));
    }
    fn line_to(&mut self, _x: f32, _y: f32) {}
    fn quad_to(&mut self, _cx0: f32, _cy0: f32, _x: f32, _y: f32) {}
    fn curve_to(&mut self, _cx0: f32, _cy0: f32, _cx1: f32, _cy1: f32, _x: f32, _y: f32) {
        self.curves += 1;
    }
    fn close(&mut self) {
        self.closes += 1;
    }
}

fn outline(font: &FontRef, ch: char) -> ContourCounter {
    let gid = font.charmap().map(ch).unwrap();
    let glyph = font.outline_glyphs().get(gid).unwrap();
    let mut pen = ContourCounter::default();
    glyph
        .draw(
            DrawSettings::unhinted(Size::unscaled(), LocationRef::default()),
            &mut pen,
        )
        .unwrap();
    pen
}

#[test]
fn test_otf_reads_back() -> Result<(), FundaidError> {
    let built = build_font()?;
    let font = FontRef::new(built.otf()).unwrap();
    assert_eq!(&built.otf()[..4], b"OTTO");

    let tags = font
        .table_directory
        .table_records()
        .iter()
        .map(|record| record.tag().to_string())
        .collect::<Vec<_>>();
    assert_eq!(
        tags,
        vec!["CFF ", "OS/2", "cmap", "head", "hhea", "hmtx", "maxp", "name", "post"]
    );

    let charmap = font.charmap();
    assert_eq!(charmap.map('F'), Some(GlyphId::new(2)));
    assert_eq!(charmap.map(' '), Some(GlyphId::new(1)));
    assert_eq!(charmap.map('I'), Some(GlyphId::new(7)));
    assert_eq!(charmap.map('Z'), None);
    let mut mapped = charmap
        .mappings()
        .map(|(cp, _)| cp)
        .collect::<Vec<_>>();
    mapped.sort();
    assert_eq!(mapped, vec![0x20, 0x41, 0x44, 0x46, 0x49, 0x4E, 0x55]);

    let metrics = font.glyph_metrics(Size::unscaled(), LocationRef::default());
    let advances = (0..8)
        .map(|gid| metrics.advance_width(GlyphId::new(gid)).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(
        advances,
        vec![500.0, 250.0, 550.0, 650.0, 650.0, 650.0, 650.0, 280.0]
    );

    let hhea = font.hhea().unwrap();
    assert_eq!(hhea.ascender().to_i16(), 800);
    assert_eq!(hhea.descender().to_i16(), -200);
    let os2 = font.os2().unwrap();
    assert_eq!(os2.s_typo_ascender(), 800);
    assert_eq!(os2.s_typo_descender(), -200);
    assert_eq!(font.head().unwrap().units_per_em(), 1000);
    Ok(())
}

#[test]
fn test_names_read_back() -> Result<(), FundaidError> {
    let built = build_font()?;
    let font = FontRef::new(built.otf()).unwrap();
    let name = |id| {
        font.localized_strings(id)
            .english_or_first()
            .unwrap()
            .to_string()
    };
    assert_eq!(name(StringId::FAMILY_NAME), "FundAid Display");
    assert_eq!(name(StringId::SUBFAMILY_NAME), "Regular");
    assert_eq!(name(StringId::UNIQUE_ID), "FundAid-Display-Regular");
    assert_eq!(name(StringId::FULL_NAME), "FundAid Display Regular");
    assert_eq!(name(StringId::VERSION_STRING), "Version 1.0");
    assert_eq!(name(StringId::POSTSCRIPT_NAME), "FundAidDisplay-Regular");
    Ok(())
}

#[test]
fn test_outlines_read_back() -> Result<(), FundaidError> {
    let built = build_font()?;
    let font = FontRef::new(built.otf()).unwrap();

    let f = outline(&font, 'F');
    assert_eq!(f.closes, 3);
    assert_eq!(f.curves, 0);
    assert_eq!(f.starts, vec![(100.0, 0.0), (100.0, 580.0), (100.0, 440.0)]);

    let u = outline(&font, 'U');
    assert_eq!(u.closes, 1);
    assert_eq!(u.curves, 4);

    for (ch, contours) in [('N', 3), ('D', 3), ('A', 3), ('I', 3)] {
        assert_eq!(outline(&font, ch).closes, contours, "contours of {ch}");
    }
    assert_eq!(outline(&font, ' ').closes, 0);
    Ok(())
}

#[test]
fn test_build_is_deterministic() -> Result<(), FundaidError> {
    assert_eq!(build_font()?.otf(), build_font()?.otf());
    Ok(())
}

#[test]
fn test_generate_writes_files() -> Result<(), FundaidError> {
    let dir = tempfile::tempdir()?;
    let dump = dir.path().join("glyphs.json");
    let options = OutputOptions {
        output_dir: dir.path().to_path_buf(),
        woff2: true,
        dump_glyphs: Some(dump.clone()),
    };
    let report = generate(&options)?;

    assert_eq!(report.otf, dir.path().join("FundAid-Display.otf"));
    let otf = std::fs::read(&report.otf)?;
    assert_eq!(otf, build_font()?.otf());

    #[cfg(feature = "woff2")]
    {
        let woff2 = report.woff2.clone().unwrap();
        assert_eq!(woff2, dir.path().join("FundAid-Display.woff2"));
        let data = std::fs::read(woff2)?;
        assert_eq!(&data[..4], b"wOF2");
        assert_eq!(&data[4..8], b"OTTO");
    }
    // Without Brotli the run still succeeds with the primary file alone
    #[cfg(not(feature = "woff2"))]
    {
        assert_eq!(report.woff2, None);
        assert!(!dir.path().join("FundAid-Display.woff2").exists());
    }

    assert_eq!(report.glyph_dump, Some(dump.clone()));
    let glyphs: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(dump)?)?;
    let glyphs = glyphs.as_array().unwrap();
    assert_eq!(glyphs.len(), 8);
    assert_eq!(glyphs[0]["name"], ".notdef");
    assert_eq!(glyphs[2]["contours"].as_array().unwrap().len(), 3);
    Ok(())
}

#[test]
fn test_woff2_can_be_skipped() -> Result<(), FundaidError> {
    let dir = tempfile::tempdir()?;
    let options = OutputOptions {
        output_dir: dir.path().to_path_buf(),
        woff2: false,
        dump_glyphs: None,
    };
    let report = generate(&options)?;
    assert!(report.otf.exists());
    assert_eq!(report.woff2, None);
    assert!(!dir.path().join("FundAid-Display.woff2").exists());
    Ok(())
}
