//! Finishing touches on the assembled sfnt binary.
use crate::FundaidError;
use write_fonts::types::Tag;

/// Version tag of fonts carrying CFF outlines
pub const CFF_SFNT_VERSION: &[u8; 4] = b"OTTO";
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;
const HEAD: Tag = Tag::new(b"head");
/// Position of `checksumAdjustment` inside `head`
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;
const TABLE_RECORD_LEN: usize = 16;
pub(crate) const SFNT_HEADER_LEN: usize = 12;

/// One entry of the table directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TableEntry {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: usize,
    pub length: usize,
}

fn read_u16(data: &[u8], at: usize) -> Option<u16> {
    Some(u16::from_be_bytes(data.get(at..at + 2)?.try_into().ok()?))
}

fn read_u32(data: &[u8], at: usize) -> Option<u32> {
    Some(u32::from_be_bytes(data.get(at..at + 4)?.try_into().ok()?))
}

/// The table directory of a single (non-collection) font
pub(crate) fn table_entries(data: &[u8]) -> Result<Vec<TableEntry>, FundaidError> {
    let truncated = || FundaidError::Read("truncated table directory".to_string());
    let num_tables = read_u16(data, 4).ok_or_else(truncated)? as usize;
    let mut entries = Vec::with_capacity(num_tables);
    for i in 0..num_tables {
        let record = SFNT_HEADER_LEN + i * TABLE_RECORD_LEN;
        let tag = data.get(record..record + 4).ok_or_else(truncated)?;
        let entry = TableEntry {
            tag: Tag::new_checked(tag).map_err(|e| FundaidError::Read(e.to_string()))?,
            checksum: read_u32(data, record + 4).ok_or_else(truncated)?,
            offset: read_u32(data, record + 8).ok_or_else(truncated)? as usize,
            length: read_u32(data, record + 12).ok_or_else(truncated)? as usize,
        };
        if data.len() < entry.offset + entry.length {
            return Err(FundaidError::Read(format!(
                "table '{}' runs past the end of the font",
                entry.tag
            )));
        }
        entries.push(entry);
    }
    Ok(entries)
}

/// Sum of big-endian 32-bit words, the final word zero padded
pub(crate) fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Mark the binary as CFF-flavoured and store the whole-font checksum
/// adjustment in `head`. The `head` record's own checksum stays valid, as it
/// is defined with the adjustment zeroed.
pub fn finalize_otf(mut data: Vec<u8>) -> Result<Vec<u8>, FundaidError> {
    let version = data
        .get_mut(0..4)
        .ok_or_else(|| FundaidError::Read("empty font".to_string()))?;
    version.copy_from_slice(CFF_SFNT_VERSION);

    let head = table_entries(&data)?
        .into_iter()
        .find(|entry| entry.tag == HEAD)
        .ok_or_else(|| FundaidError::Read("no head table".to_string()))?;
    let at = head.offset + CHECKSUM_ADJUSTMENT_OFFSET;
    let slot = data
        .get_mut(at..at + 4)
        .ok_or_else(|| FundaidError::Read("head table too short".to_string()))?;
    slot.fill(0);
    let adjustment = CHECKSUM_MAGIC.wrapping_sub(checksum(&data));
    data[at..at + 4].copy_from_slice(&adjustment.to_be_bytes());
    log::debug!("checkSumAdjustment = {adjustment:#010x}");
    Ok(data)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use pretty_assertions::assert_eq;
    use write_fonts::{
        read::{FontRef, TableProvider},
        tables::{head::Head, maxp::Maxp},
        FontBuilder,
    };

    fn minimal_font() -> Vec<u8> {
        let mut builder = FontBuilder::new();
        builder
            .add_table(&Head {
                units_per_em: 1000,
                ..Default::default()
            })
            .unwrap()
            .add_table(&Maxp {
                num_glyphs: 1,
                ..Default::default()
            })
            .unwrap();
        builder.build()
    }

    #[test]
    fn checksum_pads_the_last_word() {
        assert_eq!(checksum(&[0, 0, 0, 1, 0, 0, 0, 2]), 3);
        assert_eq!(checksum(&[1]), 0x0100_0000);
        assert_eq!(checksum(&[0xFF; 8]), 0xFFFF_FFFE);
    }

    #[test]
    fn directory_is_read() {
        let data = minimal_font();
        let entries = table_entries(&data).unwrap();
        let tags = entries.iter().map(|e| e.tag).collect::<Vec<_>>();
        assert_eq!(tags, vec![Tag::new(b"head"), Tag::new(b"maxp")]);
        assert_eq!(entries[0].length, 54);
    }

    #[test]
    fn truncated_directory_is_an_error() {
        let data = minimal_font();
        assert!(table_entries(&data[..20]).is_err());
    }

    #[test]
    fn finalized_font_sums_to_magic() {
        let data = finalize_otf(minimal_font()).unwrap();
        assert_eq!(&data[..4], b"OTTO");
        assert_eq!(checksum(&data), CHECKSUM_MAGIC);
        let font = FontRef::new(&data).unwrap();
        assert_ne!(font.head().unwrap().checksum_adjustment(), 0);
    }
}
