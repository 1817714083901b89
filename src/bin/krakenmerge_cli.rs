use clap::{value_parser, Arg, ArgMatches, Command};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::ExitCode;

use krakenmerge_rs::sample_id::DEFAULT_MARKER;
use krakenmerge_rs::{
    discover_reports, merge_reports_with, ContaminantSet, MergeError, MergeOptions,
    SampleIdDeriver, TargetRank, DEFAULT_OUTPUT,
};

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn cli() -> Command {
    Command::new("krakenmerge-rs")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Merge Kraken reports into a raw count table at one taxonomic rank")
        .arg(
            Arg::new("PATTERN")
                .long("pattern")
                .required(true)
                .help("Wildcard pattern matching the report files (e.g. \"*.report\")"),
        )
        .arg(
            Arg::new("LEVEL")
                .long("level")
                .required(true)
                .help("Rank code to extract (U, R, D, P, C, O, F, G, S)"),
        )
        .arg(
            Arg::new("CONTAMINANTS")
                .long("contaminants")
                .help("Comma-separated contaminant names or taxIDs to exclude (Escherichia_coli,9606)"),
        )
        .arg(
            Arg::new("OUT")
                .short('o')
                .long("output")
                .default_value(DEFAULT_OUTPUT)
                .help("Output table"),
        )
        .arg(
            Arg::new("MARKER")
                .long("marker")
                .default_value(DEFAULT_MARKER)
                .help("File name suffix removed to form the sample id"),
        )
        .arg(
            Arg::new("SUMMARY")
                .long("summary")
                .help("Also write per-sample root/unclassified totals to this file"),
        )
        .arg(
            Arg::new("THREADS")
                .short('t')
                .long("threads")
                .default_value("1")
                .value_parser(value_parser!(usize))
                .help("Number of reports parsed in parallel"),
        )
}

fn spinner(color: &str, msg: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(TICKS)
        .template(&format!("{{spinner:.{color}}} {{msg}}"))
    {
        pb.set_style(style);
    }
    pb.set_message(msg);
    pb
}

fn string_arg<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn run() -> Result<(), MergeError> {
    let matches = cli().get_matches();
    let arg = |id| string_arg(&matches, id);

    let mut opts = MergeOptions::new(TargetRank::new(arg("LEVEL"))?);
    if !opts.target_rank.is_standard() {
        log::warn!(
            "'{}' is not a standard rank code; only lines with exactly this code are used",
            opts.target_rank
        );
    }
    opts.contaminants = ContaminantSet::parse(arg("CONTAMINANTS"));
    opts.sample_ids = SampleIdDeriver::new(arg("MARKER"));
    opts.threads = matches.get_one::<usize>("THREADS").copied().unwrap_or(1).max(1);
    let output = arg("OUT");

    // 1. Find reports
    let pb = spinner("blue", "Gathering reports...");
    let reports = discover_reports(arg("PATTERN"))?;
    pb.finish_with_message(format!("Found {} report(s).", reports.len()));
    log::info!(
        "extracting rank {} with {} contaminant(s) excluded",
        opts.target_rank,
        opts.contaminants.len()
    );

    // 2. Parse and merge
    let pb = ProgressBar::new(reports.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{bar:40.green} {pos}/{len} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Parsing reports...");
    let results = merge_reports_with(&reports, &opts, &|_: &Path| pb.inc(1))?;
    pb.finish_with_message("Reports merged.");
    results.summary.log();
    for failed in &results.failed {
        eprintln!("warning: skipped {}: {}", failed.path.display(), failed.error);
    }

    // 3. Write outputs
    let pb = spinner("yellow", "Writing output files...");
    // Matrix last: it only exists once every other output is written.
    if let Some(summary_path) = matches.get_one::<String>("SUMMARY") {
        results.write_aggregates(summary_path)?;
    }
    results.write_matrix(output)?;
    pb.finish_with_message("Output files created.");

    println!("Merged Kraken report saved to: {}", output);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
