use write_fonts::types::Tag;

mod node;
pub use node::{Node, NodeType};

use crate::FundaidError;

pub(crate) fn tag_from_string(s: &str) -> Result<Tag, FundaidError> {
    let mut chars = s.bytes().collect::<Vec<u8>>();
    while chars.len() < 4 {
        chars.push(b' ');
    }
    let bytes: [u8; 4] = chars
        .get(0..4)
        .and_then(|c| c.try_into().ok())
        .ok_or_else(|| FundaidError::General(format!("Bad tag: '{}'", s)))?;
    Ok(Tag::new(&bytes))
}

/// Round half up, the way OpenType compilers round design coordinates.
pub(crate) fn ot_round(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}
