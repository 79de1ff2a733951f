use anyhow::{anyhow, Context, Result};
use chordsheet::{ChordDiagrams, Dialect, OutputFormat, RenderOptions};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "chordsheet", version)]
#[command(about = "Render ChordPro and chords-over-lyrics song sheets")]
struct Args {
    /// Song file to read (`-` for stdin)
    input: PathBuf,

    /// YAML file with render options
    #[arg(short, long, value_name = "FILE", env = "CHORDSHEET_CONFIG")]
    config: Option<PathBuf>,

    /// Source dialect: chordpro, chord-sheet or auto
    #[arg(short, long)]
    dialect: Option<Dialect>,

    /// Semitones to transpose by
    #[arg(short, long, allow_negative_numbers = true)]
    transpose: Option<i32>,

    /// Drop tab sections
    #[arg(long)]
    no_tabs: bool,

    /// Collapse runs of blank lines to at most this many (chord sheets only)
    #[arg(long, value_name = "N")]
    collapse_blank_lines: Option<usize>,

    /// Output format: html, text, chordpro or chord-sheet
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// List the song's chords instead of rendering it
    #[arg(long)]
    chords: bool,

    /// Chord diagram dictionary (JSON), used with --chords
    #[arg(long, value_name = "FILE")]
    diagrams: Option<PathBuf>,

    /// Write output here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("chordsheet=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let options = options_from_args(&args)?;

    let source = read_input(&args.input)?;
    let rendered = chordsheet::render(&source, &options).map_err(|e| anyhow!("Error in {}: {}", e.area(), e))?;
    for warning in &rendered.warnings {
        warn!("{}", warning);
    }

    let text = if args.chords {
        let diagrams = match &args.diagrams {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read diagrams from {}", path.display()))?;
                Some(ChordDiagrams::from_json(&json).map_err(|e| anyhow!("Error in {}: {}", e.area(), e))?)
            }
            None => None,
        };
        chord_listing(&rendered.chords, diagrams.as_ref())
    } else {
        rendered.output
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }

    Ok(())
}

fn options_from_args(args: &Args) -> Result<RenderOptions> {
    let mut options = match &args.config {
        Some(path) => RenderOptions::load(path).map_err(|e| anyhow!("Error in {}: {}", e.area(), e))?,
        None => RenderOptions::default(),
    };

    if let Some(dialect) = args.dialect {
        options.dialect = dialect;
    }
    if let Some(delta) = args.transpose {
        options.transpose = delta;
    }
    if args.no_tabs {
        options.show_tabs = false;
    }
    if let Some(limit) = args.collapse_blank_lines {
        options.preserve_whitespace = false;
        options.collapsed_blank_lines = limit;
    }
    if let Some(format) = args.format {
        options.output = format;
    }

    Ok(options)
}

fn read_input(path: &PathBuf) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source).context("Failed to read stdin")?;
        return Ok(source);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn chord_listing(chords: &chordsheet::ChordCollection, diagrams: Option<&ChordDiagrams>) -> String {
    let mut listing = String::new();
    for chord in chords {
        listing.push_str(&chord.to_string());
        if let Some(diagrams) = diagrams {
            match diagrams.lookup(chord).and_then(|entries| entries.first()) {
                Some(diagram) => listing.push_str(&format!("  {}", diagram.positions.join(" "))),
                None => listing.push_str("  (no diagram)"),
            }
        }
        listing.push('\n');
    }
    listing
}
