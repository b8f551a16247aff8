//! # Tactile Canvas CLI
//!
//! Headless driver for stored canvases.
//!
//! ## Usage
//!
//! ```bash
//! tactile new sunset --width 16 --height 16
//! tactile apply <id> "paint red; right; paint red; right; paint red"
//! tactile describe <id>
//! tactile export <id> --format svg --out sunset.svg
//! ```
//!
//! Documents are kept under `--data-dir` (or `TACTILE_DATA_DIR`).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod script;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tactile_core::{
    describe_canvas, export_canvas, summarize, to_svg, CanvasSession, DocumentId, GridConfig,
    SessionConfig, SvgOptions,
};
use tactile_store::{to_pretty_json, DocumentStore};

/// Command-line arguments for tactile.
#[derive(Debug, Clone, Parser)]
#[command(name = "tactile")]
#[command(about = "Paint on a grid without looking")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding canvas documents
    #[arg(long, env = "TACTILE_DATA_DIR", default_value = ".tactile")]
    pub data_dir: PathBuf,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create an empty canvas
    New {
        /// Document name
        name: String,
        /// Columns
        #[arg(long, default_value_t = 16)]
        width: u32,
        /// Rows
        #[arg(long, default_value_t = 16)]
        height: u32,
    },
    /// List documents, newest first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Run a script of commands against a document and save it
    Apply {
        /// Document ID
        id: String,
        /// Commands separated by `;`
        script: String,
    },
    /// Describe a document for a screen reader
    Describe {
        /// Document ID
        id: String,
        /// One line only
        #[arg(long)]
        summary: bool,
    },
    /// Export a document
    Export {
        /// Document ID
        id: String,
        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Delete a document
    Delete {
        /// Document ID
        id: String,
    },
}

/// Export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Canonical JSON.
    Json,
    /// SVG markup.
    Svg,
}

fn parse_id(id: &str) -> anyhow::Result<DocumentId> {
    DocumentId::parse(id).with_context(|| format!("'{id}' is not a document id"))
}

/// Execute a parsed command line, writing user-facing output to `out`.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, a document is missing or
/// invalid, or output cannot be written.
pub fn run(args: CliArgs, out: &mut impl Write) -> anyhow::Result<()> {
    let store = DocumentStore::with_data_dir(&args.data_dir)
        .with_context(|| format!("opening data directory {}", args.data_dir.display()))?;
    store.load_all_from_disk()?;

    match args.command {
        Command::New {
            name,
            width,
            height,
        } => {
            let doc = store.create(&name, GridConfig::new(width, height)?)?;
            writeln!(out, "{}\t{}", doc.id, doc.name)?;
        }
        Command::List { json } => {
            let summaries = store.list();
            if json {
                writeln!(out, "{}", to_pretty_json(&summaries)?)?;
            } else {
                for s in summaries {
                    writeln!(
                        out,
                        "{}\t{}\t{}x{}\t{} painted",
                        s.id, s.name, s.width, s.height, s.painted
                    )?;
                }
            }
        }
        Command::Apply { id, script } => {
            let id = parse_id(&id)?;
            let commands = script::parse_script(&script)?;
            let doc = store
                .get(id)
                .with_context(|| format!("document {id} not found"))?;
            let mut session =
                CanvasSession::from_canvas(doc.to_canvas()?, SessionConfig::default())?;
            for result in script::run_script(&mut session, &commands) {
                writeln!(out, "{}", result.message())?;
            }
            store.update(id, session.canvas())?;
            tracing::debug!(%id, commands = commands.len(), "script applied");
        }
        Command::Describe { id, summary } => {
            let canvas = store.load_canvas(parse_id(&id)?)?;
            let text = if summary {
                summarize(&canvas)
            } else {
                describe_canvas(&canvas)
            };
            writeln!(out, "{text}")?;
        }
        Command::Export { id, format, out: path } => {
            let canvas = store.load_canvas(parse_id(&id)?)?;
            let text = match format {
                ExportFormat::Json => export_canvas(&canvas).to_json()?,
                ExportFormat::Svg => to_svg(&canvas, &SvgOptions::default()),
            };
            match path {
                Some(path) => {
                    if path.as_os_str().is_empty() {
                        bail!("output path is empty");
                    }
                    std::fs::write(&path, text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    writeln!(out, "Wrote {}", path.display())?;
                }
                None => writeln!(out, "{text}")?,
            }
        }
        Command::Delete { id } => {
            let doc = store.delete(parse_id(&id)?)?;
            writeln!(out, "Deleted {}", doc.name)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = CliArgs::try_parse_from([
            "tactile",
            "--data-dir",
            "/tmp/x",
            "export",
            "abc",
            "--format",
            "svg",
        ])
        .expect("parse");
        assert_eq!(args.data_dir, PathBuf::from("/tmp/x"));
        assert!(matches!(
            args.command,
            Command::Export {
                format: ExportFormat::Svg,
                out: None,
                ..
            }
        ));
    }

    #[test]
    fn test_new_defaults() {
        let args = CliArgs::try_parse_from(["tactile", "new", "pic"]).expect("parse");
        assert!(matches!(
            args.command,
            Command::New {
                width: 16,
                height: 16,
                ..
            }
        ));
    }

    #[test]
    fn test_bad_id() {
        assert!(parse_id("not-a-uuid").is_err());
    }
}
