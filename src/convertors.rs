/// `CFF ` table compiler
pub mod cff;
/// sfnt directory access and checksums
pub mod sfnt;
/// WOFF2 container
pub mod woff2;
