use std::path::PathBuf;

use clap::Parser;

use patch_tracker::config::parse_day;
use patch_tracker::snapshot::{JsonFileSink, SnapshotSource};
use patch_tracker::{AssemblyConfig, DateRange};

#[derive(Parser, Debug)]
#[command(
    name = "patch-tracker",
    about = "Rebuild patch series from a mailing-list snapshot and match them to commits"
)]
struct Args {
    /// Snapshot JSON with `messages`, `people`, and `commits`.
    #[arg(long)]
    input: PathBuf,

    /// Where to write the assembled series as JSON.
    #[arg(long)]
    output: PathBuf,

    /// First day to include (YYYY-MM-DD).
    #[arg(long, value_parser = parse_day_arg)]
    from: Option<chrono::NaiveDateTime>,

    /// First day to exclude (YYYY-MM-DD).
    #[arg(long, value_parser = parse_day_arg)]
    to: Option<chrono::NaiveDateTime>,

    /// Parse thread-root subjects in parallel before assembly.
    #[arg(long)]
    parallel_parse: bool,

    /// Keep subjects exactly as archived.
    #[arg(long)]
    raw_subjects: bool,
}

fn parse_day_arg(value: &str) -> Result<chrono::NaiveDateTime, String> {
    parse_day(value).ok_or_else(|| format!("expected YYYY-MM-DD, got '{value}'"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let mut range = DateRange::from_env();
    if let Some(from) = args.from {
        range.from = from;
    }
    if let Some(to) = args.to {
        range.to = to;
    }

    let mut config = AssemblyConfig::from_env();
    config.parallel_parse |= args.parallel_parse;
    if args.raw_subjects {
        config.clean_subjects = false;
    }

    let source = SnapshotSource::from_path(&args.input)?;
    let mut sink = JsonFileSink::new(args.output);

    let assembly = patch_tracker::run(&source, &source, &mut sink, &range, &config)?;

    println!("{}", assembly.stats.summary());
    if !assembly.diagnostics.is_empty() {
        println!("{} diagnostics recorded", assembly.diagnostics.len());
    }
    Ok(())
}
