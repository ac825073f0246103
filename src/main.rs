use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use canonical_integrals::report::{render_json, render_text};
use canonical_integrals::canonicalize_source;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
  Text,
  Json,
}

#[derive(Subcommand)]
enum Commands {
  /// Print the canonical integrals of a form description
  Canonicalize {
    /// Form description file, or `-` for stdin
    file: PathBuf,
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
  },
  /// Print the canonical integrals as a flat list of integral terms
  Flatten {
    /// Form description file, or `-` for stdin
    file: PathBuf,
  },
}

fn read_input(file: &PathBuf) -> anyhow::Result<String> {
  if file.as_os_str() == "-" {
    let mut input = String::new();
    std::io::stdin()
      .read_to_string(&mut input)
      .context("reading form description from stdin")?;
    return Ok(input);
  }
  std::fs::read_to_string(file)
    .with_context(|| format!("reading {}", file.display()))
}

fn main() -> anyhow::Result<()> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "canonical_integrals=warn".into()),
    )
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();

  match cli.command {
    Commands::Canonicalize { file, format } => {
      let input = read_input(&file)?;
      let (_, form) = canonicalize_source(&input)
        .with_context(|| format!("canonicalizing {}", file.display()))?;
      match format {
        Format::Text => print!("{}", render_text(&form)),
        Format::Json => {
          println!("{}", serde_json::to_string_pretty(&render_json(&form))?)
        }
      }
    }
    Commands::Flatten { file } => {
      let input = read_input(&file)?;
      let (_, form) = canonicalize_source(&input)
        .with_context(|| format!("canonicalizing {}", file.display()))?;
      for term in form.flatten() {
        println!("{}", term);
      }
    }
  }
  Ok(())
}

