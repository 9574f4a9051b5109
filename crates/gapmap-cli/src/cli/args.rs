use clap::{Parser, Subcommand, ValueEnum};
use gapmap_core::Modulus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gapmap",
    version,
    about = "Residue-class gap statistics over prime sequences: build frequency maps, score anchors, benchmark successor prediction"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scan prime pairs and write a frequency map artifact
    Build(BuildArgs),
    /// Look up the failure rate for one anchor in a saved map
    Score(ScoreArgs),
    /// Benchmark successor prediction over a window of the sequence
    Bench(BenchArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Prime sequence file, one integer per line, strictly increasing
    #[arg(long)]
    pub input: PathBuf,

    /// Residue modulus for the anchor axis
    #[arg(long)]
    pub modulus: Modulus,

    /// Cross the residue axis with the Small/Medium/Large gap axis
    #[arg(long)]
    pub gap_categories: bool,

    /// Gaps strictly below this are Small (with --gap-categories)
    #[arg(long, default_value_t = 18)]
    pub small_below: u64,

    /// Gaps at or above this are Large (with --gap-categories)
    #[arg(long, default_value_t = 22)]
    pub large_from: u64,

    /// First pair index to scan
    #[arg(long, default_value_t = 10)]
    pub start: usize,

    /// Number of pairs to scan
    #[arg(long)]
    pub count: usize,

    /// Search radius for the nearest-prime criterion
    #[arg(long, default_value_t = gapmap_core::DEFAULT_SEARCH_RADIUS)]
    pub radius: u64,

    /// Where to write the map artifact
    #[arg(long)]
    pub output: PathBuf,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Saved frequency map artifact
    #[arg(long)]
    pub map: PathBuf,

    /// Candidate anchor value (a sum of two primes)
    #[arg(long)]
    pub anchor: u64,

    /// Gap between the pair; required to resolve compound maps
    #[arg(long)]
    pub gap: Option<u64>,

    #[arg(long, value_enum, default_value_t = ScoreFormat::Text)]
    pub format: ScoreFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// (rate + 1.0) * gap against the mod-6 map
    Weighted,
    /// Gap-adaptive tier selection across mod-6/30/210 maps
    Tiered,
}

#[derive(clap::Args, Debug, Clone)]
pub struct BenchArgs {
    /// Prime sequence file, one integer per line, strictly increasing
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = EngineKind::Weighted)]
    pub engine: EngineKind,

    /// Mod-6 map artifact (always required)
    #[arg(long)]
    pub mod6: PathBuf,

    /// Mod-30 map artifact (tiered engine)
    #[arg(long)]
    pub mod30: Option<PathBuf>,

    /// Mod-210 map artifact (tiered engine)
    #[arg(long)]
    pub mod210: Option<PathBuf>,

    /// First index to predict from
    #[arg(long, default_value_t = 10)]
    pub start: usize,

    /// Number of predictions
    #[arg(long)]
    pub count: usize,

    /// Candidate successors ranked per prediction
    #[arg(long, default_value_t = 10)]
    pub candidates: usize,
}
