use std::fs;
use std::path::{Path, PathBuf};

use krakenmerge_rs::{
    discover_reports, merge_reports, ContaminantSet, MergeError, MergeOptions, TargetRank,
};

const REPORT_A: &str = "\
 4.76\t5\t5\tU\t0\tunclassified
95.24\t100\t0\tR\t1\troot
40.00\t40\t0\t0\t0\tG\t561\t          Escherichia
";

const REPORT_B: &str = "\
100.00\t80\t0\tR\t1\troot
 0.00\t0\t0\tG\t561\t          Escherichia
37.50\t30\t30\tG\t570\t          Klebsiella
";

fn write_report(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn genus_options() -> MergeOptions {
    MergeOptions::new(TargetRank::new("G").unwrap())
}

#[test]
fn two_reports_outer_join() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_report(dir.path(), "A_kraken.report", REPORT_A),
        write_report(dir.path(), "B_kraken.report", REPORT_B),
    ];

    let results = merge_reports(&paths, &genus_options()).unwrap();
    assert_eq!(
        results.matrix.to_tsv_string(),
        "taxon\tA\tB\nEscherichia\t40\t0\nKlebsiella\t0\t30\n"
    );

    assert_eq!(results.samples[0].aggregates.root, 100);
    assert_eq!(results.samples[0].aggregates.unclassified, 5);
    assert_eq!(results.samples[1].aggregates.root, 80);
    assert_eq!(results.samples[1].aggregates.unclassified, 0);
    assert!(results.failed.is_empty());
    assert_eq!(results.summary.files_parsed, 2);
}

#[test]
fn contaminant_name_is_excluded() {
    let dir = tempfile::tempdir().unwrap();
    let report = "\
1\t50\t0\tS\t562\t        Escherichia coli
1\t9\t0\tS\t573\t        Klebsiella pneumoniae
";
    let paths = vec![write_report(dir.path(), "S1_kraken.report", report)];

    let mut opts = MergeOptions::new(TargetRank::new("S").unwrap());
    opts.contaminants = ContaminantSet::parse("Escherichia_coli");
    let results = merge_reports(&paths, &opts).unwrap();

    assert_eq!(results.matrix.taxa(), ["Klebsiella pneumoniae"]);
    assert_eq!(results.summary.lines.excluded, 1);
}

#[test]
fn naming_collision_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("run1")).unwrap();
    fs::create_dir(dir.path().join("run2")).unwrap();
    let paths = vec![
        write_report(&dir.path().join("run1"), "S1_kraken.report", REPORT_A),
        write_report(&dir.path().join("run2"), "S1_kraken.report", REPORT_B),
    ];

    let err = merge_reports(&paths, &genus_options()).err().unwrap();
    assert!(matches!(err, MergeError::DuplicateSampleId { ref id, .. } if id == "S1"));
}

#[test]
fn unreadable_report_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_report(dir.path(), "A_kraken.report", REPORT_A),
        dir.path().join("missing_kraken.report"),
        write_report(dir.path(), "B_kraken.report", REPORT_B),
    ];

    let results = merge_reports(&paths, &genus_options()).unwrap();
    assert_eq!(results.matrix.samples(), ["A", "B"]);
    assert_eq!(results.failed.len(), 1);
    assert_eq!(results.failed[0].sample_id, "missing");
    assert!(matches!(results.failed[0].error, MergeError::Io { .. }));
    assert_eq!(results.summary.files_failed, 1);
}

#[test]
fn report_without_sample_name_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_report(dir.path(), "A_kraken.report", REPORT_A),
        write_report(dir.path(), "_kraken.report", REPORT_A),
        write_report(dir.path(), "B_kraken.report", REPORT_B),
    ];

    let results = merge_reports(&paths, &genus_options()).unwrap();
    assert_eq!(results.matrix.samples(), ["A", "B"]);
    assert_eq!(results.failed.len(), 1);
    assert_eq!(results.failed[0].path, paths[1]);
    assert!(matches!(
        results.failed[0].error,
        MergeError::EmptySampleId { .. }
    ));
    assert_eq!(results.summary.files_failed, 1);
    assert_eq!(results.summary.files_parsed, 2);
}

#[test]
fn sample_named_like_row_label_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![write_report(dir.path(), "taxon_kraken.report", REPORT_A)];

    let err = merge_reports(&paths, &genus_options()).err().unwrap();
    assert!(matches!(err, MergeError::ReservedSampleId { ref id } if id == "taxon"));
}

#[test]
fn nothing_parsed_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![dir.path().join("gone_kraken.report")];
    let err = merge_reports(&paths, &genus_options()).err().unwrap();
    assert!(matches!(err, MergeError::NoSamplesParsed { attempted: 1 }));
}

#[test]
fn empty_input_is_fatal() {
    let err = merge_reports(&[], &genus_options()).err().unwrap();
    assert!(matches!(err, MergeError::NoInputFiles));
}

#[test]
fn rerun_and_threads_give_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let mut paths = Vec::new();
    for i in 0..12 {
        let body = format!(
            "1\t{root}\t0\tR\t1\troot\n1\t{a}\t0\tG\t{i}\tGenus{i}\n1\t{b}\t0\tG\t999\tShared\n",
            root = 100 + i,
            a = i + 1,
            b = 2 * i + 1,
        );
        paths.push(write_report(dir.path(), &format!("S{i:02}_kraken.report"), &body));
    }

    let out1 = dir.path().join("out1.tsv");
    let out2 = dir.path().join("out2.tsv");
    merge_reports(&paths, &genus_options())
        .unwrap()
        .write_matrix(&out1)
        .unwrap();

    let mut opts = genus_options();
    opts.threads = 4;
    merge_reports(&paths, &opts)
        .unwrap()
        .write_matrix(&out2)
        .unwrap();

    let first = fs::read(&out1).unwrap();
    assert_eq!(first, fs::read(&out2).unwrap());

    let text = String::from_utf8(first).unwrap();
    let mut lines = text.lines();
    assert!(lines.next().unwrap().starts_with("taxon\tS00\tS01"));
    assert!(lines.next().unwrap().starts_with("Genus0\t1\t0"));
    assert!(lines.next().unwrap().starts_with("Shared\t1\t3\t5"));
}

#[test]
fn aggregates_file() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_report(dir.path(), "A_kraken.report", REPORT_A),
        write_report(dir.path(), "B_kraken.report", REPORT_B),
    ];
    let summary = dir.path().join("totals.tsv");
    merge_reports(&paths, &genus_options())
        .unwrap()
        .write_aggregates(&summary)
        .unwrap();

    assert_eq!(
        fs::read_to_string(&summary).unwrap(),
        "sample\troot\tunclassified\tassigned_at_rank\nA\t100\t5\t40\nB\t80\t0\t30\n"
    );
}

#[test]
fn discovery_is_sorted() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), "c_kraken.report", REPORT_A);
    write_report(dir.path(), "a_kraken.report", REPORT_A);
    write_report(dir.path(), "b_kraken.report", REPORT_B);
    write_report(dir.path(), "notes.txt", "");

    let pattern = format!("{}/*.report", dir.path().display());
    let found = discover_reports(&pattern).unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a_kraken.report", "b_kraken.report", "c_kraken.report"]);
}

#[test]
fn discovery_without_matches() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = format!("{}/*.report", dir.path().display());
    assert!(matches!(
        discover_reports(&pattern),
        Err(MergeError::NoMatches { .. })
    ));
}
