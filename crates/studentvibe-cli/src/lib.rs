//! Command-line front end
//!
//! Reads a text file, runs it through the humanize pipeline with rate
//! limiting off, and writes `<stem>_vibe.md` next to the input (or to
//! `--output`). The offline engine is used unless `--remote` is given.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use studentvibe_core::{
    ClientContext, EngineKind, Generator, Guard, GuardConfig, HumanizeError, Humanizer,
    HumanizerConfig, LocalRewriter, PersonaTag, RawHumanizeRequest,
};
use tracing::info;

/// StudentVibe AI text humanizer
#[derive(Parser, Debug, Clone)]
#[command(name = "studentvibe")]
#[command(about = "Rewrite machine-generated text so it reads like a student wrote it")]
pub struct Args {
    /// Path to the raw text file to humanize
    pub input_file: PathBuf,

    /// Persona: "High School", "College" or "Creative"
    #[arg(long, default_value = "College")]
    pub persona: String,

    /// Output Markdown file (default: <input stem>_vibe.md beside the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the Gemini model instead of the offline engine
    #[arg(long)]
    pub remote: bool,

    /// Send the text even if it looks like it contains personal information
    #[arg(long)]
    pub acknowledge_sensitive: bool,

    /// TOML config file for the remote engine (falls back to $STUDENTVIBE_CONFIG)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for the offline engine, for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

/// `notes.txt` -> `notes_vibe.md` in the same directory
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_vibe.md", stem))
}

fn build_generator(args: &Args) -> Result<Arc<dyn Generator>> {
    if args.remote {
        let mut config = HumanizerConfig::load(args.config.as_deref())?;
        config.engine = EngineKind::Gemini;
        return Ok(config.build_generator()?);
    }

    Ok(Arc::new(match args.seed {
        Some(seed) => LocalRewriter::seeded(seed),
        None => LocalRewriter::new(),
    }))
}

/// Run the command; returns where the output was written
pub async fn run(args: Args) -> Result<PathBuf> {
    if !args.input_file.exists() {
        bail!("Input file '{}' not found.", args.input_file.display());
    }

    // Fail on a bad persona before doing any work
    let persona: PersonaTag = args.persona.parse()?;

    let text = std::fs::read_to_string(&args.input_file)
        .with_context(|| format!("reading {}", args.input_file.display()))?;

    let humanizer = Humanizer::new(Guard::new(GuardConfig::minimal()), build_generator(&args)?);
    info!(persona = %persona, engine = humanizer.generator_name(), "Humanizing");

    let mut request = RawHumanizeRequest::new(text, persona);
    request.acknowledge_sensitive_content = args.acknowledge_sensitive;

    let result = match humanizer.humanize(request, &ClientContext::new()).await {
        Ok(result) => result,
        Err(HumanizeError::PiiWarning { reason, kinds }) => {
            let kinds: Vec<String> = kinds.iter().map(ToString::to_string).collect();
            return Err(anyhow!(
                "{} (found: {}). Pass --acknowledge-sensitive to continue.",
                reason,
                kinds.join(", ")
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input_file));
    std::fs::write(&output, &result.humanized)
        .with_context(|| format!("writing {}", output.display()))?;

    info!(output = %output.display(), "Saved");
    Ok(output)
}
