use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use fundaid_font::OutputOptions;
use std::path::PathBuf;

/// Generate the FundAid Display font files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory to write the font files into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Only write the OpenType file
    #[arg(long)]
    no_woff2: bool,

    /// Also write the drawn glyph outlines as JSON to this file
    #[arg(long, value_name = "FILE")]
    dump_glyphs: Option<PathBuf>,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    let options = OutputOptions {
        output_dir: args.output_dir,
        woff2: !args.no_woff2,
        dump_glyphs: args.dump_glyphs,
    };
    match fundaid_font::generate(&options) {
        Ok(report) => {
            log::debug!("{:?}", report);
        }
        Err(e) => {
            log::error!("Font generation failed: {}", e);
            std::process::exit(1);
        }
    }
}
