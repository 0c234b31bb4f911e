//! End-to-end tests of the bam-design binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn bam_design() -> Command {
    Command::cargo_bin("bam-design").expect("binary should build")
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"").unwrap();
}

/// A BAM directory with one indexed and one unindexed sample
fn bam_tree(root: &Path) {
    touch(&root.join("run1").join("S1.bam"));
    touch(&root.join("run1").join("S1.bam.bai"));
    touch(&root.join("run2").join("S2.bam"));
    touch(&root.join("run2").join("S2.flagstat"));
}

#[test]
fn test_prepare_writes_design_and_config() {
    let dir = TempDir::new().unwrap();
    let bams = dir.path().join("bams");
    let workdir = dir.path().join("out").join("calling");
    bam_tree(&bams);

    bam_design()
        .arg("prepare")
        .arg("--bam-dir")
        .arg(&bams)
        .arg("--workdir")
        .arg(&workdir)
        .args(["--threads", "4", "--fasta", "/refs/hg38/genome.fa"])
        .assert()
        .success();

    let design = std::fs::read_to_string(workdir.join("design.tsv")).unwrap();
    let s1_bam = bams.join("run1").join("S1.bam");
    let s2_bam = bams.join("run2").join("S2.bam");
    assert_eq!(
        design,
        format!(
            "sample\tbam\tbai\nS1\t{}\t{}.bai\nS2\t{}\t\n",
            s1_bam.display(),
            s1_bam.display(),
            s2_bam.display()
        )
    );

    let config = std::fs::read_to_string(workdir.join("config.yaml")).unwrap();
    let config: serde_yaml::Value = serde_yaml::from_str(&config).unwrap();
    assert_eq!(config["threads"].as_u64(), Some(4));
    assert_eq!(
        config["design"].as_str(),
        workdir.join("design.tsv").to_str()
    );
    assert_eq!(config["ref"]["fasta"].as_str(), Some("genomes/genome.fa"));
    assert_eq!(
        config["ref"]["fasta_dictionary"].as_str(),
        Some("genomes/genome.fa.dict")
    );
    assert_eq!(
        config["params"]["copy_extra"].as_str(),
        Some("--verbose")
    );
}

#[test]
fn test_prepare_merges_previous_design() {
    let dir = TempDir::new().unwrap();
    let bams = dir.path().join("bams");
    bam_tree(&bams);

    let previous = dir.path().join("mapping_design.tsv");
    std::fs::write(
        &previous,
        "Sample_id\tUpstream_file\tcondition\nS1\tS1_R1.fq.gz\ttumor\nS3\tS3_R1.fq.gz\tnormal\n",
    )
    .unwrap();

    bam_design()
        .current_dir(dir.path())
        .args(["prepare", "--bam-dir", "bams", "--workdir", "out"])
        .arg("--previous-design")
        .arg(&previous)
        .assert()
        .success();

    let design = std::fs::read_to_string(dir.path().join("out").join("design.tsv")).unwrap();
    let mut lines = design.lines();
    assert_eq!(
        lines.next(),
        Some("sample\tbam\tbai\tUpstream_file\tcondition")
    );
    assert!(lines.next().unwrap().ends_with("\tS1_R1.fq.gz\ttumor"));
    assert!(lines.next().unwrap().ends_with("\t\t\t"));
    assert!(lines.next().is_none());
}

#[test]
fn test_prepare_keeps_previous_samples_when_asked() {
    let dir = TempDir::new().unwrap();
    let bams = dir.path().join("bams");
    bam_tree(&bams);
    let previous = dir.path().join("previous.tsv");
    std::fs::write(&previous, "sample\tcondition\nS3\tnormal\n").unwrap();

    bam_design()
        .current_dir(dir.path())
        .args(["prepare", "--bam-dir", "bams", "--workdir", "out"])
        .arg("--previous-design")
        .arg(&previous)
        .arg("--keep-previous-samples")
        .assert()
        .success();

    let design = std::fs::read_to_string(dir.path().join("out").join("design.tsv")).unwrap();
    assert!(design.contains("S3\t\t\tnormal\n"));
}

#[test]
fn test_prepare_tolerates_malformed_previous_design() {
    let dir = TempDir::new().unwrap();
    let bams = dir.path().join("bams");
    bam_tree(&bams);
    let previous = dir.path().join("previous.tsv");
    std::fs::write(&previous, "sample\tcondition\nS1\ttumor\textra\n").unwrap();

    bam_design()
        .current_dir(dir.path())
        .args(["prepare", "--bam-dir", "bams", "--workdir", "out"])
        .arg("--previous-design")
        .arg(&previous)
        .assert()
        .success()
        .stderr(predicate::str::contains("malformed"));

    let design = std::fs::read_to_string(dir.path().join("out").join("design.tsv")).unwrap();
    assert!(design.starts_with("sample\tbam\tbai\n"));
}

#[test]
fn test_prepare_missing_bam_dir_fails() {
    let dir = TempDir::new().unwrap();

    bam_design()
        .current_dir(dir.path())
        .args(["prepare", "--bam-dir", "no-such-dir", "--workdir", "out"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no-such-dir"));

    assert!(!dir.path().join("out").join("design.tsv").exists());
}

#[test]
fn test_prepare_quiet_is_silent_on_success() {
    let dir = TempDir::new().unwrap();
    bam_tree(&dir.path().join("bams"));

    bam_design()
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .args(["-q", "prepare", "--bam-dir", "bams", "--workdir", "out"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_debug_and_quiet_are_exclusive() {
    bam_design()
        .args(["--debug", "--quiet", "refs", "seq.fa"])
        .assert()
        .failure();
}

#[test]
fn test_link_json() {
    let dir = TempDir::new().unwrap();
    let design = dir.path().join("design.tsv");
    std::fs::write(
        &design,
        "sample\tbam\tbai\nS1\t/p/S1.bam\t/p/S1.bam.bai\nS2\t\t/p/S2.bam.bai\nS3\t/p/S3.bam\t\n",
    )
    .unwrap();

    let output = bam_design()
        .args(["link", "--format", "json", "--design"])
        .arg(&design)
        .output()
        .unwrap();
    assert!(output.status.success());

    let links: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        links,
        serde_json::json!({
            "S1.bam": "/p/S1.bam",
            "S1.bam.bai": "/p/S1.bam.bai",
            "S3.bam": "/p/S3.bam",
        })
    );
}

#[test]
fn test_link_missing_design_fails() {
    let dir = TempDir::new().unwrap();
    bam_design()
        .args(["link", "--design"])
        .arg(dir.path().join("missing.tsv"))
        .assert()
        .code(1);
}

#[test]
fn test_refs_text() {
    bam_design()
        .args(["refs", "/absolute/path/to/seq.fa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fasta: genomes/seq.fa\n"))
        .stdout(predicate::str::contains("fasta_index: genomes/seq.fa.fai\n"))
        .stdout(predicate::str::contains("fasta_dictionary: genomes/seq.fa.dict\n"));
}

#[test]
fn test_refs_json_ignores_directory() {
    let relative = bam_design()
        .args(["refs", "--format", "json", "path/to/seq.fa"])
        .output()
        .unwrap();
    let bare = bam_design()
        .args(["refs", "--format", "json", "seq.fa"])
        .output()
        .unwrap();
    assert_eq!(relative.stdout, bare.stdout);
}
