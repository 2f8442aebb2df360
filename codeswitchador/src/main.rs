use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use codeswitch_core::{FrequencyTable, Lidder, RatioTable, ResolvePolicy};
use codeswitchador::{label_line, LowMethod, ModelKind, UnkMethod};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codeswitchador")]
#[command(about = "Word-level language identification and code-switch detection")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count tokens and write a wordlist, most common first
    Wordlist {
        /// Input text; stdin when omitted
        input: Option<PathBuf>,
    },
    /// Build a ratio table from two wordlists and print it sorted by ratio
    Ratios {
        /// Lidstone smoothing constant
        smooth: f64,
        /// Minimum count for a word to be kept
        mincount: u64,
        wordlist1: PathBuf,
        wordlist2: PathBuf,
        /// Also save the table as a bincode snapshot
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Label each input line with its languages
    Label {
        /// Model configuration file (TOML)
        #[arg(short, long)]
        config: PathBuf,
        /// Saved ratio table to use instead of the config's wordlists
        #[arg(long)]
        table: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ModelArg::Attaching)]
        model: ModelArg,
        /// Handling of low-confidence tokens
        #[arg(long, value_enum, default_value_t = LowArg::Unk)]
        low: LowArg,
        /// Handling of unknown tokens
        #[arg(long, value_enum, default_value_t = UnkArg::Left)]
        unk: UnkArg,
        /// Seed for the random policies
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Input lines are `token/tag` pairs
        #[arg(long)]
        tagged: bool,
        /// Emit one JSON object per message instead of TSV
        #[arg(long)]
        json: bool,
        /// Input messages, one per line; stdin when omitted
        input: Option<PathBuf>,
    },
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum ModelArg {
    #[value(name = "1.0")]
    Ratio,
    #[value(name = "1.5")]
    Attaching,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Ratio => ModelKind::Ratio,
            ModelArg::Attaching => ModelKind::Attaching,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum LowArg {
    Mle,
    Random,
    Unk,
}

impl From<LowArg> for LowMethod {
    fn from(arg: LowArg) -> Self {
        match arg {
            LowArg::Mle => LowMethod::Mle,
            LowArg::Random => LowMethod::Random,
            LowArg::Unk => LowMethod::Unk,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum UnkArg {
    Random,
    Left,
    Right,
}

impl From<UnkArg> for UnkMethod {
    fn from(arg: UnkArg) -> Self {
        match arg {
            UnkArg::Random => UnkMethod::Random,
            UnkArg::Left => UnkMethod::Left,
            UnkArg::Right => UnkMethod::Right,
        }
    }
}

fn open_input(input: Option<&Path>) -> Result<Box<dyn BufRead>> {
    Ok(match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn handle_wordlist(input: Option<&Path>) -> Result<()> {
    let table = FrequencyTable::from_text(open_input(input)?).context("failed to read input")?;
    tracing::info!(types = table.len(), tokens = table.total(), "counted tokens");
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    table.write_counts(&mut out)?;
    out.flush()?;
    Ok(())
}

fn handle_ratios(
    smooth: f64,
    mincount: u64,
    wordlist1: &Path,
    wordlist2: &Path,
    save: Option<&Path>,
) -> Result<()> {
    let table1 = FrequencyTable::load(wordlist1)?;
    let table2 = FrequencyTable::load(wordlist2)?;
    let ratios = RatioTable::build(&table1, &table2, smooth, mincount)
        .context("failed to build ratio table")?;
    if let Some(path) = save {
        ratios.save(path)?;
        tracing::info!(path = %path.display(), entries = ratios.len(), "saved ratio table");
    }
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    ratios.write_ratios(&mut out, &table1, &table2)?;
    out.flush()?;
    Ok(())
}

struct LabelOptions {
    model: ModelKind,
    policy: ResolvePolicy,
    seed: u64,
    tagged: bool,
    json: bool,
}

fn handle_label(
    config: &Path,
    table: Option<&Path>,
    input: Option<&Path>,
    opts: LabelOptions,
) -> Result<()> {
    let lidder = match table {
        Some(table) => Lidder::from_config_and_table(opts.model, config, table),
        None => Lidder::from_config_file(opts.model, config),
    }
    .with_context(|| format!("failed to build model from {}", config.display()))?;
    let mut rng = StdRng::seed_from_u64(opts.seed);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let (mut labelled, mut skipped) = (0usize, 0usize);
    for (idx, line) in open_input(input)?.lines().enumerate() {
        let line = line.context("failed to read input")?;
        match label_line(&lidder, &line, opts.tagged, opts.policy, &mut rng) {
            Ok(Some(result)) => {
                if opts.json {
                    serde_json::to_writer(&mut out, &result)?;
                    writeln!(out)?;
                } else {
                    writeln!(out, "{}", result.to_tsv())?;
                }
                labelled += 1;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(line = idx + 1, error = %e, "skipping line");
                skipped += 1;
            }
        }
    }
    out.flush()?;
    tracing::info!(labelled, skipped, model = lidder.kind().as_str(), "done");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Wordlist { input } => handle_wordlist(input.as_deref()),
        Commands::Ratios {
            smooth,
            mincount,
            wordlist1,
            wordlist2,
            save,
        } => handle_ratios(smooth, mincount, &wordlist1, &wordlist2, save.as_deref()),
        Commands::Label {
            config,
            table,
            model,
            low,
            unk,
            seed,
            tagged,
            json,
            input,
        } => handle_label(
            &config,
            table.as_deref(),
            input.as_deref(),
            LabelOptions {
                model: model.into(),
                policy: ResolvePolicy::new(low.into(), unk.into()),
                seed,
                tagged,
                json,
            },
        ),
    }
}
