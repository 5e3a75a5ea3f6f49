//! Writing the compiled font to disk.
use crate::{names::FILE_STEM, Font, FundaidError};
use std::path::{Path, PathBuf};

/// Where and what to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
    /// Attempt the WOFF2 file
    pub woff2: bool,
    /// Also write the drawn glyphs as JSON to this path
    pub dump_glyphs: Option<PathBuf>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        OutputOptions {
            output_dir: PathBuf::from("."),
            woff2: true,
            dump_glyphs: None,
        }
    }
}

/// The files a run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputReport {
    pub otf: PathBuf,
    /// `None` when the WOFF2 file was skipped
    pub woff2: Option<PathBuf>,
    pub glyph_dump: Option<PathBuf>,
}

impl OutputReport {
    /// File names in the order a stylesheet should list them
    pub fn font_files(&self) -> Vec<String> {
        self.woff2
            .iter()
            .chain(std::iter::once(&self.otf))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }
}

/// Write the WOFF2 file unless the Brotli backend is missing, which only
/// earns a warning.
fn write_woff2(font: &Font, path: &Path) -> Result<Option<PathBuf>, FundaidError> {
    match font.woff2() {
        Ok(bytes) => {
            std::fs::write(path, bytes)?;
            log::info!("Wrote {}", path.display());
            Ok(Some(path.to_path_buf()))
        }
        Err(FundaidError::CompressionUnavailable) => {
            log::warn!(
                "Skipping {}: built without Brotli compression (enable the `woff2` feature)",
                path.display()
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn dump_glyphs(font: &Font, path: &Path) -> Result<(), FundaidError> {
    let file = std::fs::File::create(path)?;
    let mut buffer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut buffer, &font.glyphs)?;
    log::info!("Wrote glyph data to {}", path.display());
    Ok(())
}

/// Write `FundAid-Display.otf`, then try `FundAid-Display.woff2`.
///
/// Any failure writing the OpenType file is fatal, as is any failure of the
/// WOFF2 step other than missing compression support.
pub fn write(font: &Font, options: &OutputOptions) -> Result<OutputReport, FundaidError> {
    let otf = options.output_dir.join(format!("{FILE_STEM}.otf"));
    std::fs::write(&otf, font.otf())?;
    log::info!("Wrote {}", otf.display());

    let woff2 = if options.woff2 {
        write_woff2(font, &options.output_dir.join(format!("{FILE_STEM}.woff2")))?
    } else {
        None
    };

    let glyph_dump = match &options.dump_glyphs {
        Some(path) => {
            dump_glyphs(font, path)?;
            Some(path.clone())
        }
        None => None,
    };

    let report = OutputReport {
        otf,
        woff2,
        glyph_dump,
    };
    let files = report.font_files();
    let sources = files.iter().map(String::as_str).collect::<Vec<_>>();
    log::info!(
        "Use the font in a stylesheet with:\n{}",
        font.names.font_face_css(&sources)
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_options_write_both_files_here() {
        let options = OutputOptions::default();
        assert_eq!(options.output_dir, PathBuf::from("."));
        assert!(options.woff2);
        assert!(options.dump_glyphs.is_none());
    }

    #[test]
    fn woff2_is_listed_first() {
        let report = OutputReport {
            otf: PathBuf::from("out/FundAid-Display.otf"),
            woff2: Some(PathBuf::from("out/FundAid-Display.woff2")),
            glyph_dump: None,
        };
        assert_eq!(
            report.font_files(),
            vec!["FundAid-Display.woff2", "FundAid-Display.otf"]
        );
        let otf_only = OutputReport {
            woff2: None,
            ..report
        };
        assert_eq!(otf_only.font_files(), vec!["FundAid-Display.otf"]);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let font = crate::build_font().unwrap();
        let options = OutputOptions {
            output_dir: PathBuf::from("/nonexistent/fundaid/output"),
            ..Default::default()
        };
        assert!(matches!(
            write(&font, &options),
            Err(FundaidError::IO(_))
        ));
    }
}
