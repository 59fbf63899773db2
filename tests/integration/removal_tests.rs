use clap::Parser;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use sumdedup::actions::{execute, RemovalPolicy, ResolutionPlan};
use sumdedup::cli::Cli;
use sumdedup::duplicates::{DuplicateFinder, FinderConfig};
use sumdedup::error::ExitCode;
use tempfile::tempdir;

const HELLO_FP: &str = "5+2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    File::create(path).unwrap().write_all(content).unwrap();
}

fn run(args: &[&str]) -> (ExitCode, String) {
    let cli = Cli::try_parse_from(std::iter::once("sumdedup").chain(args.iter().copied())).unwrap();
    let mut out = Vec::new();
    let code = sumdedup::run_with_writer(cli, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_keep_first_dry_run_marks_second_root() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("x"), b"hello");
    write(&b.path().join("y"), b"hello");
    let (a_str, b_str) = (a.path().to_str().unwrap(), b.path().to_str().unwrap());

    let (code, report) = run(&["--rm", "--dryrun", "--sort", "--no-progress", a_str, b_str]);

    assert_eq!(code, ExitCode::Success);
    let lines: Vec<_> = report.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("DUPLICATE: size+sha={HELLO_FP}"));
    assert!(lines[1].starts_with("\t      \tinode="));
    assert!(lines[1].ends_with(&format!("\tname=x\tpath={}", a.path().join("x").display())));
    assert!(lines[2].starts_with("\tremove\tinode="));
    assert!(lines[2].ends_with(&format!("\tname=y\tpath={}", b.path().join("y").display())));

    // Dry run: nothing removed.
    assert!(a.path().join("x").exists());
    assert!(b.path().join("y").exists());
}

#[test]
fn test_keep_first_removes_all_but_first() {
    let a = tempdir().unwrap();
    let b = tempdir().unwrap();
    write(&a.path().join("x"), b"hello");
    write(&b.path().join("y"), b"hello");
    write(&b.path().join("z"), b"hello");

    let (code, _) = run(&[
        "--rm",
        "--multithread",
        "--no-progress",
        a.path().to_str().unwrap(),
        b.path().to_str().unwrap(),
    ]);

    assert_eq!(code, ExitCode::Success);
    assert!(a.path().join("x").exists());
    assert!(!b.path().join("y").exists());
    assert!(!b.path().join("z").exists());
}

#[test]
fn test_remove_all_copies() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"dup");
    write(&dir.path().join("b"), b"dup");
    write(&dir.path().join("keep"), b"unique");

    let (code, report) = run(&["--rm-all", "--no-progress", dir.path().to_str().unwrap()]);

    assert_eq!(code, ExitCode::Success);
    assert_eq!(report.matches("\tremove\t").count(), 2);
    assert!(!dir.path().join("a").exists());
    assert!(!dir.path().join("b").exists());
    assert!(dir.path().join("keep").exists());
}

#[test]
fn test_dry_run_report_matches_real_run() {
    let make = || {
        let dir = tempdir().unwrap();
        write(&dir.path().join("a"), b"dup");
        write(&dir.path().join("b"), b"dup");
        dir
    };

    let dir = make();
    let path = dir.path().to_str().unwrap();
    let (_, dry) = run(&["--rm", "--dryrun", "--no-progress", path]);
    let (_, real) = run(&["--rm", "--no-progress", path]);

    assert_eq!(dry, real);
    assert!(dir.path().join("a").exists());
    assert!(!dir.path().join("b").exists());
}

#[test]
fn test_quiet_suppresses_report_but_still_removes() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"dup");
    write(&dir.path().join("b"), b"dup");

    let (code, report) = run(&["--rm", "--quiet", dir.path().to_str().unwrap()]);

    assert_eq!(code, ExitCode::Success);
    assert!(report.is_empty());
    assert!(!dir.path().join("b").exists());
}

#[test]
fn test_report_only_touches_nothing() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"dup");
    write(&dir.path().join("b"), b"dup");

    let (_, report) = run(&["--no-progress", dir.path().to_str().unwrap()]);

    assert!(!report.contains("remove"));
    assert!(dir.path().join("a").exists());
    assert!(dir.path().join("b").exists());
}

#[test]
fn test_failed_removal_is_partial_success() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"dup");
    write(&dir.path().join("b"), b"dup");

    let (groups, _) = DuplicateFinder::new(FinderConfig::default())
        .find_duplicates_in_paths(vec![dir.path().to_path_buf()])
        .unwrap();
    let plan = ResolutionPlan::new(groups, RemovalPolicy::keep_first());

    // The marked file vanishes between scan and removal.
    fs::remove_file(dir.path().join("b")).unwrap();
    let report = execute(&plan);

    assert_eq!(report.failure_count(), 1);
    assert_eq!(report.success_count(), 0);
    assert!(dir.path().join("a").exists());
}

#[test]
fn test_json_output_carries_removals() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a"), b"dup");
    write(&dir.path().join("b"), b"dup");

    let (code, out) = run(&[
        "--rm",
        "--dryrun",
        "--output",
        "json",
        "--no-progress",
        dir.path().to_str().unwrap(),
    ]);

    assert_eq!(code, ExitCode::Success);
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["duplicates"].as_array().unwrap().len(), 1);
    assert_eq!(value["duplicates"][0]["members"][1]["action"], "remove");
    assert_eq!(value["removals"][0]["status"], "skipped");
    assert_eq!(value["summary"]["exit_code_name"], "SD000");
}

#[test]
fn test_root_spelled_twice_never_removes_only_copy() {
    let dir = tempdir().unwrap();
    let d = dir.path().join("d");
    write(&d.join("a"), b"only copy");
    let alias = d.join("..").join("d");

    for extra in [&["--dryrun"][..], &[][..]] {
        let mut args = vec!["--rm", "--sort", "--no-progress"];
        args.extend_from_slice(extra);
        args.push(d.to_str().unwrap());
        args.push(alias.to_str().unwrap());

        let (code, report) = run(&args);

        // Both spellings are reported, one of them marked.
        assert_eq!(report.matches("\tremove\t").count(), 1);
        assert_eq!(code, ExitCode::PartialSuccess);
        assert!(d.join("a").exists(), "the only copy was removed");
    }
}
