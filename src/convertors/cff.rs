//! Compiler for the `CFF ` table (Compact Font Format, version 1).
//!
//! Outlines are written as Type 2 charstrings with every coordinate rounded
//! to an integer. No subroutines are emitted, so the global subroutine INDEX
//! is always empty and there is no local one.
use crate::{
    common::ot_round,
    glyph::GlyphList,
    names::Names,
    registry::NOTDEF,
    FundaidError, OutlinePen,
};

/// Width operands are stored relative to this value
const NOMINAL_WIDTH_X: i32 = 0;
const DEFAULT_WIDTH_X: i32 = 0;
/// Type 2 argument stack limit
const MAX_STACK: usize = 48;
/// Strings with SIDs from here on live in the String INDEX
const FIRST_CUSTOM_SID: u16 = 391;

mod dict_op {
    pub const VERSION: u8 = 0;
    pub const FULL_NAME: u8 = 2;
    pub const FAMILY_NAME: u8 = 3;
    pub const WEIGHT: u8 = 4;
    pub const FONT_BBOX: u8 = 5;
    pub const CHARSET: u8 = 15;
    pub const CHAR_STRINGS: u8 = 17;
    pub const PRIVATE: u8 = 18;
    pub const DEFAULT_WIDTH_X: u8 = 20;
    pub const NOMINAL_WIDTH_X: u8 = 21;
}

mod cs_op {
    pub const RLINETO: u8 = 5;
    pub const RRCURVETO: u8 = 8;
    pub const ENDCHAR: u8 = 14;
    pub const RMOVETO: u8 = 21;
}

/// The first 96 predefined strings (SID 0 to 95).
const STANDARD_STRINGS: [&str; 96] = [
    ".notdef",
    "space",
    "exclam",
    "quotedbl",
    "numbersign",
    "dollar",
    "percent",
    "ampersand",
    "quoteright",
    "parenleft",
    "parenright",
    "asterisk",
    "plus",
    "comma",
    "hyphen",
    "period",
    "slash",
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "colon",
    "semicolon",
    "less",
    "equal",
    "greater",
    "question",
    "at",
    "A",
    "B",
    "C",
    "D",
    "E",
    "F",
    "G",
    "H",
    "I",
    "J",
    "K",
    "L",
    "M",
    "N",
    "O",
    "P",
    "Q",
    "R",
    "S",
    "T",
    "U",
    "V",
    "W",
    "X",
    "Y",
    "Z",
    "bracketleft",
    "backslash",
    "bracketright",
    "asciicircum",
    "underscore",
    "quoteleft",
    "a",
    "b",
    "c",
    "d",
    "e",
    "f",
    "g",
    "h",
    "i",
    "j",
    "k",
    "l",
    "m",
    "n",
    "o",
    "p",
    "q",
    "r",
    "s",
    "t",
    "u",
    "v",
    "w",
    "x",
    "y",
    "z",
    "braceleft",
    "bar",
    "braceright",
    "asciitilde",
];

/// Predefined weight names, SID 383 to 390
const STANDARD_WEIGHTS: [&str; 8] = [
    "Black", "Bold", "Book", "Light", "Medium", "Regular", "Roman", "Semibold",
];
const FIRST_WEIGHT_SID: u16 = 383;

fn standard_sid(string: &str) -> Option<u16> {
    if let Some(pos) = STANDARD_STRINGS.iter().position(|s| *s == string) {
        return Some(pos as u16);
    }
    STANDARD_WEIGHTS
        .iter()
        .position(|s| *s == string)
        .map(|pos| FIRST_WEIGHT_SID + pos as u16)
}

/// Hands out string IDs, collecting the strings that are not predefined.
#[derive(Debug, Default)]
struct Strings {
    custom: Vec<String>,
}

impl Strings {
    fn sid(&mut self, string: &str) -> u16 {
        if let Some(sid) = standard_sid(string) {
            return sid;
        }
        let pos = match self.custom.iter().position(|s| s == string) {
            Some(pos) => pos,
            None => {
                self.custom.push(string.to_string());
                self.custom.len() - 1
            }
        };
        FIRST_CUSTOM_SID + pos as u16
    }

    fn into_index(self) -> Vec<Vec<u8>> {
        self.custom.into_iter().map(String::into_bytes).collect()
    }
}

/// Writes an INDEX structure. An empty INDEX is only its zero count.
fn write_index(out: &mut Vec<u8>, objects: &[Vec<u8>]) -> Result<(), FundaidError> {
    let count = u16::try_from(objects.len()).map_err(|_| {
        FundaidError::General(format!("Too many objects for INDEX: {}", objects.len()))
    })?;
    out.extend(count.to_be_bytes());
    if count == 0 {
        return Ok(());
    }
    let mut offsets = Vec::with_capacity(objects.len() + 1);
    // offsets are 1-based
    let mut current = 1u32;
    offsets.push(current);
    for object in objects {
        current += object.len() as u32;
        offsets.push(current);
    }
    let off_size = offset_size(current);
    out.push(off_size as u8);
    for offset in offsets {
        out.extend_from_slice(&offset.to_be_bytes()[4 - off_size..]);
    }
    for object in objects {
        out.extend_from_slice(object);
    }
    Ok(())
}

fn index_len(objects: &[Vec<u8>]) -> usize {
    if objects.is_empty() {
        return 2;
    }
    let data: usize = objects.iter().map(Vec::len).sum();
    let off_size = offset_size(data as u32 + 1);
    3 + off_size * (objects.len() + 1) + data
}

/// Smallest byte count able to hold `value`
fn offset_size(value: u32) -> usize {
    (4 - value.leading_zeros() as usize / 8).max(1)
}

/// Operand and operator encoder for DICT data
#[derive(Debug, Default)]
struct DictWriter(Vec<u8>);

impl DictWriter {
    fn int(&mut self, value: i32) -> &mut Self {
        match value {
            -107..=107 => self.0.push((value + 139) as u8),
            108..=1131 => {
                let v = value - 108;
                self.0.extend([((v >> 8) + 247) as u8, (v & 0xff) as u8]);
            }
            -1131..=-108 => {
                let v = -value - 108;
                self.0.extend([((v >> 8) + 251) as u8, (v & 0xff) as u8]);
            }
            -32768..=32767 => {
                self.0.push(28);
                self.0.extend((value as i16).to_be_bytes());
            }
            _ => self.long(value),
        }
        self
    }

    /// Always five bytes, so offsets can be patched in without moving anything
    fn long(&mut self, value: i32) {
        self.0.push(29);
        self.0.extend(value.to_be_bytes());
    }

    fn offset(&mut self, value: usize) -> Result<&mut Self, FundaidError> {
        let value = i32::try_from(value)
            .map_err(|_| FundaidError::General(format!("CFF offset {value} out of range")))?;
        self.long(value);
        Ok(self)
    }

    fn op(&mut self, op: u8) -> &mut Self {
        self.0.push(op);
        self
    }

    fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.0)
    }
}

/// Encodes one charstring operand. Only integers fit the formats used here.
fn write_cs_number(out: &mut Vec<u8>, value: i32) -> Result<(), String> {
    match value {
        -107..=107 => out.push((value + 139) as u8),
        108..=1131 => {
            let v = value - 108;
            out.extend([((v >> 8) + 247) as u8, (v & 0xff) as u8]);
        }
        -1131..=-108 => {
            let v = -value - 108;
            out.extend([((v >> 8) + 251) as u8, (v & 0xff) as u8]);
        }
        -32768..=32767 => {
            out.push(28);
            out.extend((value as i16).to_be_bytes());
        }
        _ => return Err(format!("coordinate delta {value} does not fit a charstring")),
    }
    Ok(())
}

/// A pen producing a Type 2 charstring.
///
/// Absolute coordinates are rounded before deltas are taken, so rounding
/// errors never accumulate along a contour. Runs of the same segment type
/// share one operator while the argument stack allows it.
#[derive(Debug)]
pub struct CharStringPen {
    width: Option<i32>,
    current: (i32, i32),
    pending: Option<u8>,
    stack: Vec<i32>,
    program: Vec<u8>,
    error: Option<String>,
}

impl CharStringPen {
    pub fn new(advance_width: u16) -> Self {
        CharStringPen {
            width: Some(i32::from(advance_width) - NOMINAL_WIDTH_X),
            current: (0, 0),
            pending: None,
            stack: Vec::new(),
            program: Vec::new(),
            error: None,
        }
    }

    fn delta(&mut self, x: f64, y: f64) -> [i32; 2] {
        let (x, y) = (ot_round(x), ot_round(y));
        let delta = [x - self.current.0, y - self.current.1];
        self.current = (x, y);
        delta
    }

    fn push(&mut self, op: u8, args: &[i32]) {
        let depth = self.stack.len() + args.len() + usize::from(self.width.is_some());
        if self.pending != Some(op) || op == cs_op::RMOVETO || depth > MAX_STACK {
            self.flush();
        }
        self.pending = Some(op);
        self.stack.extend_from_slice(args);
    }

    fn number(&mut self, value: i32) {
        if let Err(e) = write_cs_number(&mut self.program, value) {
            self.error.get_or_insert(e);
        }
    }

    fn flush(&mut self) {
        let Some(op) = self.pending.take() else {
            return;
        };
        // The advance rides along with the first stack-clearing operator
        if let Some(width) = self.width.take() {
            self.number(width);
        }
        for value in std::mem::take(&mut self.stack) {
            self.number(value);
        }
        self.program.push(op);
    }

    pub fn finish(mut self) -> Result<Vec<u8>, String> {
        self.flush();
        if let Some(width) = self.width.take() {
            self.number(width);
        }
        self.program.push(cs_op::ENDCHAR);
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.program),
        }
    }
}

impl OutlinePen for CharStringPen {
    fn move_to(&mut self, x: f64, y: f64) {
        let d = self.delta(x, y);
        self.push(cs_op::RMOVETO, &d);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let d = self.delta(x, y);
        self.push(cs_op::RLINETO, &d);
    }

    fn curve_to(&mut self, cx0: f64, cy0: f64, cx1: f64, cy1: f64, x: f64, y: f64) {
        let [a, b] = self.delta(cx0, cy0);
        let [c, d] = self.delta(cx1, cy1);
        let [e, f] = self.delta(x, y);
        self.push(cs_op::RRCURVETO, &[a, b, c, d, e, f]);
    }

    // Type 2 contours close implicitly
    fn close(&mut self) {}
}

/// The CFF `version` string is the bare number of the name table version
fn cff_version(version: &str) -> &str {
    version.strip_prefix("Version ").unwrap_or(version).trim()
}

/// Offsets of the structures following the Top DICT INDEX
struct Layout {
    charset: usize,
    char_strings: usize,
    private: usize,
    private_len: usize,
}

struct TopDict {
    version: u16,
    full_name: u16,
    family_name: u16,
    weight: u16,
    bbox: [i32; 4],
}

impl TopDict {
    fn compile(&self, layout: &Layout) -> Result<Vec<u8>, FundaidError> {
        let mut dict = DictWriter::default();
        dict.int(self.version.into())
            .op(dict_op::VERSION)
            .int(self.full_name.into())
            .op(dict_op::FULL_NAME)
            .int(self.family_name.into())
            .op(dict_op::FAMILY_NAME)
            .int(self.weight.into())
            .op(dict_op::WEIGHT);
        for value in self.bbox {
            dict.int(value);
        }
        dict.op(dict_op::FONT_BBOX);
        dict.offset(layout.charset)?.op(dict_op::CHARSET);
        dict.offset(layout.char_strings)?.op(dict_op::CHAR_STRINGS);
        dict.offset(layout.private_len)?
            .offset(layout.private)?
            .op(dict_op::PRIVATE);
        Ok(dict.finish())
    }
}

/// Compile the `CFF ` table for a set of drawn glyphs.
pub fn compile(names: &Names, glyphs: &GlyphList) -> Result<Vec<u8>, FundaidError> {
    if glyphs.first().map(|g| g.name.as_str()) != Some(NOTDEF) {
        return Err(FundaidError::NotdefNotFirst);
    }

    let mut char_strings = Vec::with_capacity(glyphs.len());
    for glyph in glyphs.iter() {
        let mut pen = CharStringPen::new(glyph.advance_width);
        for command in &glyph.commands {
            command.replay(&mut pen);
        }
        let program = pen.finish().map_err(|reason| FundaidError::BadPath {
            glyph: glyph.name.to_string(),
            reason,
        })?;
        char_strings.push(program);
    }

    let mut strings = Strings::default();
    let bbox = match glyphs.bounds()? {
        Some(rect) => [
            rect.x0.floor() as i32,
            rect.y0.floor() as i32,
            rect.x1.ceil() as i32,
            rect.y1.ceil() as i32,
        ],
        None => [0; 4],
    };
    let top = TopDict {
        version: strings.sid(cff_version(&names.version)),
        full_name: strings.sid(&names.full_name),
        family_name: strings.sid(&names.family_name),
        weight: strings.sid(&names.style_name),
        bbox,
    };

    // Format 0: one SID per glyph after .notdef
    let mut charset = vec![0u8];
    for glyph in glyphs.iter().skip(1) {
        charset.extend(strings.sid(&glyph.name).to_be_bytes());
    }

    let private = DictWriter::default()
        .int(DEFAULT_WIDTH_X)
        .op(dict_op::DEFAULT_WIDTH_X)
        .int(NOMINAL_WIDTH_X)
        .op(dict_op::NOMINAL_WIDTH_X)
        .finish();

    let name_index = vec![names.postscript_name.as_bytes().to_vec()];
    let string_index = strings.into_index();
    let header = [1u8, 0, 4, 0];

    // Offsets are fixed width, so a dry run gives the Top DICT its final size
    let placeholder = Layout {
        charset: 0,
        char_strings: 0,
        private: 0,
        private_len: 0,
    };
    let top_len = top.compile(&placeholder)?.len();
    let charset_offset = header.len()
        + index_len(&name_index)
        + index_len(&[vec![0; top_len]])
        + index_len(&string_index)
        + index_len(&[]);
    let char_strings_offset = charset_offset + charset.len();
    let layout = Layout {
        charset: charset_offset,
        char_strings: char_strings_offset,
        private: char_strings_offset + index_len(&char_strings),
        private_len: private.len(),
    };
    let total = layout.private + private.len();

    let mut out = Vec::with_capacity(total);
    out.extend(header);
    out[3] = offset_size(total as u32) as u8;
    write_index(&mut out, &name_index)?;
    write_index(&mut out, &[top.compile(&layout)?])?;
    write_index(&mut out, &string_index)?;
    write_index(&mut out, &[])?;
    debug_assert_eq!(out.len(), layout.charset);
    out.extend(charset);
    write_index(&mut out, &char_strings)?;
    out.extend(private);
    log::debug!(
        "Compiled CFF table: {} glyphs, {} bytes",
        char_strings.len(),
        out.len()
    );
    Ok(out)
}
