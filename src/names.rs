use write_fonts::{
    tables::name::{Name, NameRecord},
    types::NameId,
};

/// Stem shared by both output files
pub const FILE_STEM: &str = "FundAid-Display";

const MAC_PLATFORM: u16 = 1;
const MAC_ROMAN: u16 = 0;
const MAC_ENGLISH: u16 = 0;
const WINDOWS_PLATFORM: u16 = 3;
const WINDOWS_UNICODE_BMP: u16 = 1;
const WINDOWS_ENGLISH_US: u16 = 0x409;

/// Identification strings of the face
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    pub family_name: String,
    pub style_name: String,
    pub unique_id: String,
    pub full_name: String,
    pub version: String,
    pub postscript_name: String,
}

impl Default for Names {
    fn default() -> Self {
        Names {
            family_name: "FundAid Display".to_string(),
            style_name: "Regular".to_string(),
            unique_id: "FundAid-Display-Regular".to_string(),
            full_name: "FundAid Display Regular".to_string(),
            version: "Version 1.0".to_string(),
            postscript_name: "FundAidDisplay-Regular".to_string(),
        }
    }
}

impl Names {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stringid: NameId) -> Option<&str> {
        match stringid {
            NameId::FAMILY_NAME => Some(&self.family_name),
            NameId::SUBFAMILY_NAME => Some(&self.style_name),
            NameId::UNIQUE_ID => Some(&self.unique_id),
            NameId::FULL_NAME => Some(&self.full_name),
            NameId::VERSION_STRING => Some(&self.version),
            NameId::POSTSCRIPT_NAME => Some(&self.postscript_name),
            _ => None,
        }
    }

    /// The `name` table: every string once for Macintosh and once for
    /// Windows, records sorted by platform and then name ID.
    pub fn to_name_table(&self) -> Name {
        let ids = (1..=6).map(NameId::new).collect::<Vec<_>>();
        let mut records = Vec::with_capacity(ids.len() * 2);
        for (platform, encoding, language) in [
            (MAC_PLATFORM, MAC_ROMAN, MAC_ENGLISH),
            (WINDOWS_PLATFORM, WINDOWS_UNICODE_BMP, WINDOWS_ENGLISH_US),
        ] {
            for id in &ids {
                if let Some(string) = self.get(*id) {
                    records.push(NameRecord::new(
                        platform,
                        encoding,
                        language,
                        *id,
                        string.to_string().into(),
                    ));
                }
            }
        }
        Name {
            name_record: records,
            ..Default::default()
        }
    }

    /// The `@font-face` rule a stylesheet needs to use the generated files.
    pub fn font_face_css(&self, sources: &[&str]) -> String {
        let src = sources
            .iter()
            .map(|file| {
                let format = if file.ends_with(".woff2") {
                    "woff2"
                } else {
                    "opentype"
                };
                format!("url('/fonts/{file}') format('{format}')")
            })
            .collect::<Vec<_>>()
            .join(",\n       ");
        format!(
            "@font-face {{\n  font-family: '{}';\n  src: {};\n  font-display: swap;\n}}",
            self.family_name, src
        )
    }
}
