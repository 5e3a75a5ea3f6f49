//! WOFF2 packaging of a compiled font.
//!
//! Every table is stored with the null transform and all table data goes
//! through a single Brotli stream. Compression needs the `woff2` feature;
//! without it [`compile`] reports [`FundaidError::CompressionUnavailable`].
use crate::{
    convertors::sfnt::{table_entries, SFNT_HEADER_LEN},
    FundaidError,
};
use write_fonts::types::Tag;

pub const SIGNATURE: &[u8; 4] = b"wOF2";
const HEADER_LEN: usize = 48;
/// Flag value announcing an explicit four-byte tag
const ARBITRARY_TAG: u8 = 0x3f;
/// Transform version 3 is the null transform for `glyf` and `loca`
const NULL_TRANSFORM_GLYF: u8 = 3 << 6;

/// Tags with a one-byte code in the table directory, in code order
const KNOWN_TAGS: [&[u8; 4]; 63] = [
    b"cmap", b"head", b"hhea", b"hmtx", b"maxp", b"name", b"OS/2", b"post", b"cvt ", b"fpgm",
    b"glyf", b"loca", b"prep", b"CFF ", b"VORG", b"EBDT", b"EBLC", b"gasp", b"hdmx", b"kern",
    b"LTSH", b"PCLT", b"VDMX", b"vhea", b"vmtx", b"BASE", b"GDEF", b"GPOS", b"GSUB", b"EBSC",
    b"JSTF", b"MATH", b"CBDT", b"CBLC", b"COLR", b"CPAL", b"SVG ", b"sbix", b"acnt", b"avar",
    b"bdat", b"bloc", b"bsln", b"cvar", b"fdsc", b"feat", b"fmtx", b"fvar", b"gvar", b"hsty",
    b"just", b"lcar", b"mort", b"morx", b"opbd", b"prop", b"trak", b"Zapf", b"Silf", b"Glat",
    b"Gloc", b"Feat", b"Sill",
];

fn known_tag_index(tag: Tag) -> Option<u8> {
    KNOWN_TAGS
        .iter()
        .position(|known| Tag::new(known) == tag)
        .map(|i| i as u8)
}

/// Variable-length unsigned integer, seven bits per byte, most significant
/// group first
fn write_base128(out: &mut Vec<u8>, mut value: u32) {
    let mut groups = [0u8; 5];
    let mut len = 0;
    loop {
        groups[len] = (value & 0x7f) as u8;
        value >>= 7;
        len += 1;
        if value == 0 {
            break;
        }
    }
    for (i, group) in groups[..len].iter().enumerate().rev() {
        let continuation = if i == 0 { 0 } else { 0x80 };
        out.push(group | continuation);
    }
}

fn directory_entry(out: &mut Vec<u8>, tag: Tag, length: u32) {
    let transform = if tag == Tag::new(b"glyf") || tag == Tag::new(b"loca") {
        NULL_TRANSFORM_GLYF
    } else {
        0
    };
    match known_tag_index(tag) {
        Some(index) => out.push(index | transform),
        None => {
            out.push(ARBITRARY_TAG | transform);
            out.extend_from_slice(&tag.to_be_bytes());
        }
    }
    write_base128(out, length);
}

#[cfg(feature = "woff2")]
fn compress(data: &[u8]) -> Result<Vec<u8>, FundaidError> {
    use std::io::Write;
    let mut compressor = brotlic::CompressorWriter::new(Vec::new());
    compressor.write_all(data)?;
    compressor
        .into_inner()
        .map_err(|_| FundaidError::General("Brotli compression failed".to_string()))
}

#[cfg(not(feature = "woff2"))]
fn compress(_data: &[u8]) -> Result<Vec<u8>, FundaidError> {
    Err(FundaidError::CompressionUnavailable)
}

fn u32_len(len: usize) -> Result<u32, FundaidError> {
    u32::try_from(len).map_err(|_| FundaidError::General(format!("{len} bytes is too large")))
}

/// Wrap an sfnt binary into a WOFF2 file.
pub fn compile(sfnt: &[u8]) -> Result<Vec<u8>, FundaidError> {
    let flavor = sfnt
        .get(0..4)
        .ok_or_else(|| FundaidError::Read("empty font".to_string()))?;
    let entries = table_entries(sfnt)?;

    let mut directory = Vec::new();
    let mut stream = Vec::new();
    let mut sfnt_size = SFNT_HEADER_LEN + 16 * entries.len();
    for entry in &entries {
        directory_entry(&mut directory, entry.tag, u32_len(entry.length)?);
        stream.extend_from_slice(&sfnt[entry.offset..entry.offset + entry.length]);
        sfnt_size += (entry.length + 3) & !3;
    }
    let compressed = compress(&stream)?;

    let unpadded = HEADER_LEN + directory.len() + compressed.len();
    let length = (unpadded + 3) & !3;
    let num_tables = u16::try_from(entries.len())
        .map_err(|_| FundaidError::General("too many tables".to_string()))?;

    let mut out = Vec::with_capacity(length);
    out.extend_from_slice(SIGNATURE);
    out.extend_from_slice(flavor);
    out.extend(u32_len(length)?.to_be_bytes());
    out.extend(num_tables.to_be_bytes());
    out.extend(0u16.to_be_bytes()); // reserved
    out.extend(u32_len(sfnt_size)?.to_be_bytes());
    out.extend(u32_len(compressed.len())?.to_be_bytes());
    out.extend(1u16.to_be_bytes()); // major version
    out.extend(0u16.to_be_bytes()); // minor version
    // no metadata or private block
    out.extend([0u8; 20]);
    out.extend(directory);
    out.extend(compressed);
    out.resize(length, 0);
    log::debug!(
        "WOFF2: {} tables, {} bytes of table data compressed to {}",
        entries.len(),
        stream.len(),
        length
    );
    Ok(out)
}
