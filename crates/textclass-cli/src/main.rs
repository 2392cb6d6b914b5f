mod display;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use textclass_ai::{ASSETS_ENV, AssetContext, DEFAULT_ASSETS_DIR, DEFAULT_MODEL_NAME, OnnxClient};
use textclass_core::verdict::{DEFAULT_SPAM_INDEX, DEFAULT_THRESHOLD};
use textclass_core::{Target, VerdictRule};

const MODEL_ENV: &str = "TEXTCLASS_MODEL";

#[derive(Parser)]
#[command(name = "textclass", version, about = "Classify text with a packaged ONNX model")]
struct Cli {
    /// Directory the model resource is resolved against
    #[arg(long, global = true, env = ASSETS_ENV, default_value = DEFAULT_ASSETS_DIR)]
    assets: PathBuf,

    /// Model resource name inside the assets directory
    #[arg(long, global = true, env = MODEL_ENV, default_value = DEFAULT_MODEL_NAME)]
    model: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify TEXT, or each line of stdin when no TEXT is given
    Classify(ClassifyArgs),
    /// Load and unload the model to confirm it is usable
    Check,
}

#[derive(Args)]
struct ClassifyArgs {
    text: Vec<String>,

    /// Emit one JSON object per input instead of a table
    #[arg(long)]
    json: bool,

    /// Flag the input when the watched score is above this value
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Watch the category with this label
    #[arg(long, conflicts_with = "index")]
    label: Option<String>,

    /// Watch the category at this position in the model output
    #[arg(long, default_value_t = DEFAULT_SPAM_INDEX)]
    index: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!("textclass v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let mut client =
        OnnxClient::new(AssetContext::new(&cli.assets)).with_model_name(cli.model.as_str());

    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::Classify(args) => classify(&mut client, args, &mut out),
        Command::Check => check(&mut client, &mut out),
    }
}

fn classify(
    client: &mut OnnxClient,
    args: ClassifyArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let target = match args.label {
        Some(label) => Target::Label(label),
        None => Target::Index(args.index),
    };
    let rule = VerdictRule::new(target, args.threshold)?;

    client.load()?;

    if args.text.is_empty() {
        for line in std::io::stdin().lock().lines() {
            let line = line.context("reading stdin")?;
            classify_one(client, &rule, &line, args.json, out)?;
        }
    } else {
        classify_one(client, &rule, &args.text.join(" "), args.json, out)?;
    }

    client.unload()?;
    Ok(())
}

fn classify_one(
    client: &mut OnnxClient,
    rule: &VerdictRule,
    text: &str,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let categories = client.classify(text)?;
    let verdict = rule.judge(&categories);

    if json {
        let report = display::Report::new(text, &categories, verdict);
        writeln!(out, "{}", serde_json::to_string(&report)?)?;
    } else {
        write!(out, "{}", display::render_categories(&categories))?;
        writeln!(out, "{}", display::verdict_message(verdict))?;
    }
    Ok(())
}

fn check(client: &mut OnnxClient, out: &mut impl Write) -> anyhow::Result<()> {
    let path = client.context().root().join(client.model_name());
    client
        .load()
        .with_context(|| format!("checking {}", path.display()))?;
    client.unload()?;
    writeln!(out, "ok: {}", path.display())?;
    Ok(())
}
