//! # LGTM CLI
//!
//! Command-line interface for drawing LGTM images.
//!
//! ## Usage
//!
//! ```bash
//! # Draw LGTM on a photo, writing ./cat-lgtm.jpeg
//! lgtm draw -i cat.jpg
//!
//! # Custom texts in black, with concentration lines
//! lgtm draw -i cat.png -t "SHIP IT" -s "no notes" -c black --concentration-lines
//!
//! # Mascot sticker instead of text
//! lgtm draw -i party.gif --mascot gopher.png
//!
//! # Inspect the layout for a canvas size
//! lgtm layout --width 1920 --height 1080
//! ```

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use lgtm::{
    LgtmError, OverlayConfig, PairLayout, Pipeline, SizeStrategy, layout_pair, logging,
    render::{ConcentrationLines, MascotOverlay, TextOverlay, lines},
    text::TextColor,
};

/// LGTM - Draw "Looks Good To Me" on images
#[derive(Parser, Debug)]
#[command(name = "lgtm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log layout decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args, Debug)]
struct TextArgs {
    /// Headline text
    #[arg(short = 't', long)]
    text: Option<String>,

    /// Caption text
    #[arg(short = 's', long)]
    sub_text: Option<String>,

    /// TrueType/OpenType font file (defaults to the embedded font)
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Size text from character counts instead of font metrics
    #[arg(long)]
    heuristic: bool,

    /// Draw texts as typed, without letter spacing
    #[arg(long)]
    no_spacing: bool,

    /// Font for characters the main font lacks (repeatable)
    #[arg(long, value_name = "FILE")]
    fallback_font: Vec<PathBuf>,

    /// Don't look for an installed CJK font
    #[arg(long)]
    no_system_fallback: bool,
}

impl TextArgs {
    fn into_config(self) -> OverlayConfig {
        let mut config = OverlayConfig::with_texts(self.text, self.sub_text);
        config.font_path = self.font;
        config.fallback_fonts = self.fallback_font;
        config.system_fallback = !self.no_system_fallback;
        config.letter_spacing = !self.no_spacing;
        if self.heuristic {
            config.strategy = SizeStrategy::Heuristic;
        }
        config
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Draw onto an image file
    Draw {
        /// Input image (JPEG, PNG or GIF)
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output file (defaults to ./<name>-<effect>.<ext>)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        #[command(flatten)]
        text: TextArgs,

        /// Text color
        #[arg(short, long, value_enum, default_value_t = TextColor::Light)]
        color: TextColor,

        /// Draw concentration lines under the text
        #[arg(short = 'l', long)]
        concentration_lines: bool,

        /// Seed for concentration lines
        #[arg(long, requires = "concentration_lines")]
        seed: Option<u64>,

        /// PNG sticker drawn instead of the text
        #[arg(long, value_name = "FILE")]
        mascot: Option<PathBuf>,

        /// Draw the caption even when it is empty
        #[arg(long)]
        keep_empty_sub: bool,
    },

    /// Print the layout for a canvas size as JSON
    Layout {
        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        #[command(flatten)]
        text: TextArgs,
    },
}

#[derive(Serialize)]
struct LayoutReport {
    primary_text: String,
    secondary_text: String,
    #[serde(flatten)]
    layout: PairLayout,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LgtmError> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Draw {
            input,
            output,
            text,
            color,
            concentration_lines,
            seed,
            mascot,
            keep_empty_sub,
        } => {
            let mut config = text.into_config();
            config.color = color;
            config.skip_empty_secondary = !keep_empty_sub;
            debug!(?config, "draw");

            let mut pipeline = Pipeline::new();
            if concentration_lines {
                pipeline.push(Box::new(ConcentrationLines::new(lines::Params {
                    seed,
                    ..Default::default()
                })));
            }
            match mascot {
                Some(path) => pipeline.push(Box::new(MascotOverlay::from_path(path)?)),
                None => pipeline.push(Box::new(TextOverlay::new(config)?)),
            }

            let written = pipeline.run(&input, output.as_deref())?;
            println!("{}", written.display());
        }

        Commands::Layout {
            width,
            height,
            text,
        } => {
            let config = text.into_config();
            let font = config.load_font()?;
            let primary = config.primary().rendered(config.letter_spacing);
            let secondary = config.secondary().rendered(config.letter_spacing);
            let layout = layout_pair(
                &primary,
                &secondary,
                &font,
                width,
                height,
                &config.layout_options(),
            )?;

            let report = LayoutReport {
                primary_text: primary,
                secondary_text: secondary,
                layout,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
