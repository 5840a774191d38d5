/// Command-line integration tests
use assert_cmd::Command;
use noodles::bam;
use noodles::sam;
use noodles::sam::alignment::io::Write as SamWrite;
use predicates::prelude::*;
use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "@HD\tVN:1.6\tSO:queryname\n@SQ\tSN:chr1\tLN:100000\n@SQ\tSN:chr2\tLN:100000\n";

/// Two SAM lines for a mate pair with both mates on chr1.
fn pair(name: &str, proper: bool, pos: u32) -> String {
    let (f1, f2) = if proper { (99, 147) } else { (97, 145) };
    let mate = pos + 200;
    format!(
        "{name}\t{f1}\tchr1\t{pos}\t60\t50M\t=\t{mate}\t250\t*\t*\n\
         {name}\t{f2}\tchr1\t{mate}\t60\t50M\t=\t{pos}\t-250\t*\t*\n"
    )
}

fn write_sam(dir: &TempDir, file: &str, body: &str) -> PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, format!("{HEADER}{body}")).unwrap();
    path
}

/// Re-encode a SAM file as BAM.
fn sam_to_bam(sam_path: &Path, bam_path: &Path) {
    let mut reader = sam::io::Reader::new(BufReader::new(fs::File::open(sam_path).unwrap()));
    let header = reader.read_header().unwrap();

    let mut writer = bam::io::Writer::new(fs::File::create(bam_path).unwrap());
    writer.write_header(&header).unwrap();
    for record in reader.record_bufs(&header) {
        writer
            .write_alignment_record(&header, &record.unwrap())
            .unwrap();
    }
    writer.finish(&header).unwrap();
}

fn collision_body() -> String {
    [
        pair("EAS1:1:FC1:1:1101:100:100", true, 1001),
        pair("EAS1:1:FC1:1:1101:101:100", false, 1011),
        pair("EAS1:1:FC1:1:1101:900:900", true, 60001),
        pair("EAS1:1:FC1:1:1102:100:100", true, 1001),
    ]
    .concat()
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_missing_input_prints_usage() {
    Command::cargo_bin("tilecollide")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_missing_file_fails() {
    let tmpdir = TempDir::new().unwrap();
    Command::cargo_bin("tilecollide")
        .unwrap()
        .arg(tmpdir.path().join("absent.bam"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not open file"));
}

#[test]
fn test_collision_report() {
    let tmpdir = TempDir::new().unwrap();
    let sam = write_sam(&tmpdir, "reads.sam", &collision_body());
    let name = sam.display().to_string();

    let stdout = stdout_of(
        Command::cargo_bin("tilecollide")
            .unwrap()
            .arg("--threads")
            .arg("2")
            .arg(&sam),
    );
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(
        lines[0],
        format!("# {name}\t4\t4\t1.000000\t3\t0.750000\t1\t0.250000")
    );
    assert_eq!(
        lines[1],
        format!("{name}\tCoincide\t2\t0.500000\t1\t0.333333\t1\t1.000000")
    );
    assert!(lines[2].starts_with(&format!("{name}\tAdjacent\t2\t")));
    assert!(lines[3].starts_with(&format!("{name}\tAt1k\t2\t")));
    assert!(lines[4].starts_with(&format!("{name}\tAt10k\t2\t")));

    let histogram: Vec<&str> = lines[5..].to_vec();
    assert!(histogram.contains(&format!("{name}\tFC1.1.1101\tAll\t37\t2").as_str()));
    assert!(histogram.contains(&format!("{name}\tFC1.1.1101\tConcord Discord\t37\t1").as_str()));
    assert!(histogram.contains(&format!("{name}\tFC1.1.1101\tDiscord Concord\t37\t1").as_str()));
    assert!(histogram.iter().all(|l| !l.contains("FC1.1.1102")));
}

#[test]
fn test_bam_matches_sam() {
    let tmpdir = TempDir::new().unwrap();
    let sam = write_sam(&tmpdir, "reads.sam", &collision_body());
    let bam = tmpdir.path().join("reads.bam");
    sam_to_bam(&sam, &bam);

    let strip_name = |text: String, name: &Path| text.replace(&name.display().to_string(), "");
    let from_sam = stdout_of(Command::cargo_bin("tilecollide").unwrap().arg(&sam));
    let from_bam = stdout_of(Command::cargo_bin("tilecollide").unwrap().arg(&bam));
    assert_eq!(strip_name(from_sam, &sam), strip_name(from_bam, &bam));
}

#[test]
fn test_discordant_mode() {
    let tmpdir = TempDir::new().unwrap();
    let body = [
        pair("EAS1:1:FC1:1:1101:100:100", false, 1001),
        pair("EAS1:1:FC1:1:1101:100:102", true, 1021),
        pair("EAS1:1:FC1:1:1102:100:100", true, 1001),
    ]
    .concat();
    let sam = write_sam(&tmpdir, "reads.sam", &body);
    let name = sam.display().to_string();

    let stdout = stdout_of(
        Command::cargo_bin("tilecollide")
            .unwrap()
            .arg("--mode")
            .arg("discordant")
            .arg(&sam),
    );
    assert_eq!(
        stdout,
        format!(
            "# {name}\t3\t1\t0.333333\n\
             {name}\tCoincide\t1\t1.000000\n\
             {name}\tAdjacent\t1\t1.000000\n\
             {name}\tAt1k\t1\t1.000000\n\
             {name}\tAt10k\t1\t1.000000\n"
        )
    );
}

#[test]
fn test_no_mapped_reads_is_success() {
    let tmpdir = TempDir::new().unwrap();
    let body = "EAS1:1:FC1:1:1101:1:1\t77\t*\t0\t0\t*\t*\t0\t0\t*\t*\n\
                EAS1:1:FC1:1:1101:1:1\t141\t*\t0\t0\t*\t*\t0\t0\t*\t*\n";
    let sam = write_sam(&tmpdir, "unmapped.sam", body);

    Command::cargo_bin("tilecollide")
        .unwrap()
        .arg(&sam)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no mapped read"));
}

#[test]
fn test_empty_result_reported_at_warn_level() {
    let tmpdir = TempDir::new().unwrap();
    let sam = write_sam(&tmpdir, "proper.sam", &pair("EAS1:1:FC1:1:1101:1:1", true, 1001));

    Command::cargo_bin("tilecollide")
        .unwrap()
        .env("RUST_LOG", "warn")
        .arg("--mode")
        .arg("discordant")
        .arg(&sam)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no discordant read"));
}

#[test]
fn test_unsorted_input_fails() {
    let tmpdir = TempDir::new().unwrap();
    let first = pair("EAS1:1:FC1:1:1101:1:1", true, 1001);
    let second = pair("EAS1:1:FC1:1:1101:2:2", true, 1001);
    let body = format!(
        "{}{}",
        first.lines().next().unwrap().to_owned() + "\n",
        second
    );
    let sam = write_sam(&tmpdir, "unsorted.sam", &body);

    Command::cargo_bin("tilecollide")
        .unwrap()
        .arg(&sam)
        .assert()
        .failure()
        .stderr(predicate::str::contains("name mismatch"));
}

#[test]
fn test_invalid_offsets_rejected() {
    let tmpdir = TempDir::new().unwrap();
    let sam = write_sam(&tmpdir, "reads.sam", &collision_body());
    Command::cargo_bin("tilecollide")
        .unwrap()
        .arg("--offsets")
        .arg("10,100")
        .arg(&sam)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--offsets must start at 0"));
}

#[test]
fn test_largest_offset_counts_every_neighbor() {
    let tmpdir = TempDir::new().unwrap();
    let sam = write_sam(&tmpdir, "reads.sam", &collision_body());
    let name = sam.display().to_string();

    let stdout = stdout_of(
        Command::cargo_bin("tilecollide")
            .unwrap()
            .arg("--offsets")
            .arg(format!("0,{}", i64::MAX))
            .arg(&sam),
    );
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines[1].starts_with(&format!("{name}\tCoincide\t2\t")));
    // All three pairs on tile 1101 find a neighbor on the same segment.
    assert!(lines[2].starts_with(&format!("{name}\tAt{}\t3\t", i64::MAX)));
}
