use crate::{
    registry::GlyphSpec,
    shape::{check_contours, CommandRecorder, PathCommand},
    FundaidError, Path, PathBuilder,
};
use kurbo::Shape as _;
use serde::{Serialize, Serializer};
use smol_str::SmolStr;
use std::ops::Deref;

#[derive(Debug, Clone, Default, Serialize)]
pub struct GlyphList(pub Vec<Glyph>);

impl GlyphList {
    pub fn get(&self, g: &str) -> Option<&Glyph> {
        self.0.iter().find(|&glyph| glyph.name == g)
    }

    pub fn get_by_index(&self, id: usize) -> Option<&Glyph> {
        self.0.get(id)
    }

    pub fn index_of(&self, g: &str) -> Option<usize> {
        self.0.iter().position(|glyph| glyph.name == g)
    }

    /// Glyph for a code point, through the glyphs' own code points
    pub fn for_char(&self, ch: char) -> Option<&Glyph> {
        self.0.iter().find(|glyph| glyph.codepoint == Some(ch))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Glyph> {
        self.0.iter()
    }

    /// Union of all glyph bounds, or `None` when nothing has ink
    pub fn bounds(&self) -> Result<Option<kurbo::Rect>, FundaidError> {
        let mut union: Option<kurbo::Rect> = None;
        for glyph in self.iter() {
            if let Some(rect) = glyph.bounds()? {
                union = Some(union.map_or(rect, |u| u.union(rect)));
            }
        }
        Ok(union)
    }
}

impl Deref for GlyphList {
    type Target = Vec<Glyph>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A drawn glyph
#[derive(Debug, Clone, Serialize)]
pub struct Glyph {
    pub name: SmolStr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codepoint: Option<char>,
    pub advance_width: u16,
    pub left_side_bearing: i16,
    #[serde(rename = "contours", serialize_with = "serialize_commands")]
    pub commands: Vec<PathCommand>,
}

impl Glyph {
    /// Run a registry entry's drawer on a fresh pen and keep what it drew.
    pub fn draw(spec: &GlyphSpec) -> Result<Glyph, FundaidError> {
        let mut pen = CommandRecorder::new();
        (spec.draw)(&mut pen);
        let commands = pen.finish();
        let contours = check_contours(&commands).map_err(|reason| FundaidError::BadPath {
            glyph: spec.name.to_string(),
            reason,
        })?;
        log::trace!("Drew {} with {} contours", spec.name, contours);
        Ok(Glyph {
            name: SmolStr::new(spec.name),
            codepoint: spec.codepoint,
            advance_width: spec.advance_width,
            left_side_bearing: 0,
            commands,
        })
    }

    /// The outline as closed paths, one per contour
    pub fn contours(&self) -> Vec<Path> {
        let mut pen = PathBuilder::new();
        for command in &self.commands {
            command.replay(&mut pen);
        }
        pen.build()
    }

    pub fn contour_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::ClosePath))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn bounds(&self) -> Result<Option<kurbo::Rect>, FundaidError> {
        let mut union: Option<kurbo::Rect> = None;
        for path in self.contours() {
            let bez = path.to_kurbo().map_err(|reason| FundaidError::BadPath {
                glyph: self.name.to_string(),
                reason,
            })?;
            let rect = bez.bounding_box();
            union = Some(union.map_or(rect, |u| u.union(rect)));
        }
        Ok(union)
    }
}

fn serialize_commands<S>(commands: &[PathCommand], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut pen = PathBuilder::new();
    for command in commands {
        command.replay(&mut pen);
    }
    pen.build().serialize(serializer)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{registry, OutlinePen};
    use pretty_assertions::assert_eq;

    fn all_glyphs() -> GlyphList {
        GlyphList(
            registry::GLYPHS
                .iter()
                .map(|spec| Glyph::draw(spec).unwrap())
                .collect(),
        )
    }

    #[test]
    fn lookup() {
        let glyphs = all_glyphs();
        assert_eq!(glyphs.index_of(".notdef"), Some(0));
        assert_eq!(glyphs.index_of("I"), Some(7));
        assert_eq!(glyphs.for_char('F').unwrap().name, "F");
        assert!(glyphs.for_char('Z').is_none());
        assert_eq!(glyphs.get_by_index(3).unwrap().name, "U");
    }

    #[test]
    fn f_has_three_contours() {
        let glyphs = all_glyphs();
        let f = glyphs.get("F").unwrap();
        assert_eq!(f.contour_count(), 3);
        assert_eq!(f.contours().len(), 3);
        assert!(f.contours().iter().all(|p| p.closed));
        assert_eq!(f.advance_width, 550);
        assert_eq!(f.left_side_bearing, 0);
    }

    #[test]
    fn bounds_ignore_advance() {
        let glyphs = all_glyphs();
        let u = glyphs.get("U").unwrap().bounds().unwrap().unwrap().round();
        assert_eq!((u.x0, u.y0, u.x1, u.y1), (100.0, 0.0, 700.0, 700.0));
        // The ink is wider than the tightened advance
        assert!(u.x1 > f64::from(glyphs.get("U").unwrap().advance_width));
        assert!(glyphs.get("space").unwrap().bounds().unwrap().is_none());

        let all = glyphs.bounds().unwrap().unwrap().round();
        assert_eq!((all.x0, all.y0, all.x1, all.y1), (50.0, 0.0, 700.0, 700.0));
    }

    #[test]
    fn unclosed_drawer_is_rejected() {
        fn broken(pen: &mut dyn OutlinePen) {
            pen.move_to(0.0, 0.0);
            pen.line_to(10.0, 0.0);
        }
        let spec = GlyphSpec {
            name: "broken",
            codepoint: None,
            advance_width: 100,
            draw: broken,
        };
        assert!(matches!(
            Glyph::draw(&spec),
            Err(FundaidError::BadPath { glyph, .. }) if glyph == "broken"
        ));
    }

    #[test]
    fn glyph_serializes_as_contours() {
        let glyphs = all_glyphs();
        let value = serde_json::to_value(glyphs.get("I").unwrap()).unwrap();
        assert_eq!(value["name"], "I");
        assert_eq!(value["codepoint"], "I");
        assert_eq!(value["advance_width"], 280);
        assert_eq!(value["contours"].as_array().unwrap().len(), 3);
        let notdef = serde_json::to_value(glyphs.get(".notdef").unwrap()).unwrap();
        assert!(notdef.get("codepoint").is_none());
    }

    #[test]
    fn dumped_contours_read_back() {
        let glyphs = all_glyphs();
        for glyph in glyphs.iter() {
            let value = serde_json::to_value(glyph).unwrap();
            let contours: Vec<Path> = serde_json::from_value(value["contours"].clone()).unwrap();
            let drawn = glyph.contours();
            assert_eq!(contours.len(), drawn.len(), "contours of {}", glyph.name);
            for (read, path) in contours.iter().zip(&drawn) {
                assert_eq!(read.closed, path.closed);
                assert_eq!(read.nodes.len(), path.nodes.len());
                for (a, b) in read.nodes.iter().zip(&path.nodes) {
                    assert_eq!(a.nodetype, b.nodetype);
                    assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
                }
            }
        }
    }
}
