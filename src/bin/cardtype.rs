use std::{
    fs::File,
    io::{BufReader, BufWriter, Write as _},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cardtype", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out a single card job and write the result JSON.
    Layout(LayoutArgs),
    /// Lay out a JSON array of card jobs in parallel.
    Batch(BatchArgs),
    /// Print the italic/plain segments of a piece of rules text.
    Classify(ClassifyArgs),
}

#[derive(Parser, Debug)]
struct LayoutArgs {
    /// Input job JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output result JSON (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Measure with this font (TTF/OTF) instead of the estimator.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Estimator metrics JSON (`advance_em`, `italic_factor`, `line_height_em`).
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Exit non-zero when the layout produced warnings.
    #[arg(long)]
    strict: bool,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Input JSON array of jobs.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output JSON array (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Estimator metrics JSON.
    #[arg(long)]
    metrics: Option<PathBuf>,

    /// Worker threads (rayon default when omitted).
    #[arg(long)]
    threads: Option<NonZeroUsize>,
}

#[derive(Parser, Debug)]
struct ClassifyArgs {
    /// Rules text; `\n` sequences are read as line breaks.
    #[arg(long)]
    text: String,

    /// JSON array of ability words replacing the built-in table.
    #[arg(long)]
    ability_words: Option<PathBuf>,

    /// Treat the text as flavor text.
    #[arg(long)]
    flavor: bool,

    /// Exit non-zero when the text is malformed.
    #[arg(long)]
    strict: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
enum BatchEntry {
    Ok(cardtype::LayoutResult),
    Error(String),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Batch(args) => cmd_batch(args),
        Command::Classify(args) => cmd_classify(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    let v: T = serde_json::from_reader(r).with_context(|| format!("parse {what} JSON"))?;
    Ok(v)
}

fn write_json<T: serde::Serialize>(out: Option<&Path>, value: &T) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create output dir '{}'", parent.display()))?;
            }
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, value).with_context(|| "write result JSON")?;
            w.flush()?;
            eprintln!("wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut w = stdout.lock();
            serde_json::to_writer_pretty(&mut w, value).with_context(|| "write result JSON")?;
            writeln!(w)?;
        }
    }
    Ok(())
}

fn estimator(metrics: Option<&Path>) -> anyhow::Result<cardtype::EstimatedMeasure> {
    let m = match metrics {
        Some(path) => read_json::<cardtype::EstimatedMeasure>(path, "metrics")?,
        None => cardtype::EstimatedMeasure::default(),
    };
    m.validate()?;
    Ok(m)
}

fn ensure_no_warnings(warnings: &[cardtype::Warning]) -> anyhow::Result<()> {
    match warnings.first() {
        Some(w) => Err(anyhow::anyhow!(
            "{} warning(s), first: {w}",
            warnings.len()
        )),
        None => Ok(()),
    }
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let job: cardtype::CardLayoutJob = read_json(&args.in_path, "job")?;
    let engine = cardtype::LayoutEngine::default();

    let result = match &args.font {
        Some(font) => {
            let bytes =
                std::fs::read(font).with_context(|| format!("read font '{}'", font.display()))?;
            let mut measure = cardtype::ParleyMeasure::new(&bytes)?;
            engine.layout_card(&job, &mut measure)?
        }
        None => {
            let mut measure = estimator(args.metrics.as_deref())?;
            engine.layout_card(&job, &mut measure)?
        }
    };

    write_json(args.out.as_deref(), &result)?;
    for w in &result.warnings {
        eprintln!("warning: {w}");
    }
    if args.strict {
        ensure_no_warnings(&result.warnings)?;
    }
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let jobs: Vec<cardtype::CardLayoutJob> = read_json(&args.in_path, "jobs")?;
    let measure = estimator(args.metrics.as_deref())?;
    let engine = cardtype::LayoutEngine::default();

    let results = engine.layout_batch(&jobs, args.threads, move || measure)?;
    let failed = results.iter().filter(|r| r.is_err()).count();
    let entries = results
        .into_iter()
        .map(|r| match r {
            Ok(v) => BatchEntry::Ok(v),
            Err(e) => BatchEntry::Error(e.to_string()),
        })
        .collect::<Vec<_>>();

    write_json(args.out.as_deref(), &entries)?;
    if failed > 0 {
        anyhow::bail!("{failed} of {} job(s) failed", jobs.len());
    }
    Ok(())
}

fn cmd_classify(args: ClassifyArgs) -> anyhow::Result<()> {
    let table = match &args.ability_words {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("read ability words '{}'", path.display()))?;
            cardtype::AbilityWordTable::from_json_str(&s)?
        }
        None => cardtype::AbilityWordTable::builtin(),
    };
    let classifier = cardtype::SpanClassifier::new(Arc::new(table));
    let text = args.text.replace("\\n", "\n");

    let report = if args.flavor {
        cardtype::ClassifyReport {
            segments: classifier.classify_flavor(&text),
            warnings: Vec::new(),
        }
    } else {
        classifier.classify_report(&text)
    };

    write_json(None, &report)?;
    if args.strict {
        ensure_no_warnings(&report.warnings)?;
    }
    Ok(())
}
