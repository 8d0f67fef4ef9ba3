// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tests against the command-line interface.

use std::fs;

use indoc::formatdoc;
use tempfile::TempDir;

use crate::*;

#[test]
fn test_help_is_correct() {
    for flag in ["--help", "-h"] {
        let cmd = rfi_plot().arg(flag).ok();
        assert!(cmd.is_ok());
        let (stdout, stderr) = get_cmd_output(cmd);
        assert!(stderr.is_empty());
        assert!(stdout.contains("tavg-power"));
        assert!(stdout.contains("kurtosis"));
        assert!(stdout.contains("--dry-run"));
    }

    let cmd = rfi_plot().args(["kurtosis", "--help"]).ok();
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("--kurtosis-range"));
    assert!(stdout.contains("--show-rfi"));
}

#[test]
fn test_tavg_power_dry_run() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let waterfall = make_filterbank(tmp_dir.path());
    let output = tmp_dir.path().join("tavg.png");

    let cmd = rfi_plot()
        .args([
            "tavg-power",
            waterfall.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--n-divs",
            "8",
            "--dry-run",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("8 timesteps, 1 IFs, 64 channels"));
    assert!(stdout.contains("Frequency bins: 8"));
    assert!(stdout.contains("Dry run"));
    assert!(!output.exists());
}

#[test]
fn test_kurtosis_arg_file_and_save_toml() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let waterfall = make_filterbank(tmp_dir.path());
    let args_file = tmp_dir.path().join("args.toml");
    let saved = tmp_dir.path().join("saved.toml");
    fs::write(
        &args_file,
        formatdoc! {r#"
            waterfall = "{}"
            output = "kurtosis.svg"
            output_format = "svg"
            n_divs = 16
            show_rfi = true
        "#, waterfall.display()},
    )
    .unwrap();

    let cmd = rfi_plot()
        .args([
            "--dry-run",
            "--save-toml",
            saved.to_str().unwrap(),
            "kurtosis",
            args_file.to_str().unwrap(),
            "--threshold",
            "10",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    let (stdout, _) = get_cmd_output(cmd);
    assert!(stdout.contains("Frequency bins: 16, kurtosis threshold: 10"));
    assert!(stdout.contains("kurtosis.svg (svg)"));

    let saved = fs::read_to_string(saved).unwrap();
    assert!(saved.contains("n_divs = 16"));
    assert!(saved.contains("threshold = 10.0"));
    assert!(saved.contains("show_rfi = true"));
    assert!(!saved.contains("args_file"));
}

#[test]
fn test_missing_inputs() {
    let cmd = rfi_plot()
        .args(["kurtosis", "/does/not/exist.fil", "-o", "kurtosis.png"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("doesn't exist"));

    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let waterfall = make_filterbank(tmp_dir.path());
    let cmd = rfi_plot().args(["tavg-power", waterfall.to_str().unwrap()]).ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("No output plot file was supplied"));
}

#[test]
fn test_not_a_filterbank() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let junk = tmp_dir.path().join("junk.fil");
    let mut bytes = 12_i32.to_le_bytes().to_vec();
    bytes.extend_from_slice(b"NOT_A_FILTER");
    fs::write(&junk, bytes).unwrap();
    let cmd = rfi_plot()
        .args(["tavg-power", junk.to_str().unwrap(), "-o", "tavg.png"])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("HEADER_START"));
    assert!(stderr.contains("SIGPROC filterbank"));
}

#[test]
fn test_unsupported_output_format() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let waterfall = make_filterbank(tmp_dir.path());
    let output = tmp_dir.path().join("tavg.pdf");
    let cmd = rfi_plot()
        .args([
            "tavg-power",
            waterfall.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--output-format",
            "pdf",
            "--n-divs",
            "8",
        ])
        .ok();
    assert!(cmd.is_err());
    let (_, stderr) = get_cmd_output(cmd);
    assert!(stderr.contains("Unsupported output format 'pdf'"));
    assert!(!output.exists());
}

// Rendering needs fonts from the system.
#[test]
#[ignore]
fn test_plots_are_written() {
    let tmp_dir = TempDir::new().expect("couldn't make tmp dir");
    let waterfall = make_filterbank(tmp_dir.path());

    let tavg = tmp_dir.path().join("tavg.png");
    let cmd = rfi_plot()
        .args([
            "tavg-power",
            waterfall.to_str().unwrap(),
            "-o",
            tavg.to_str().unwrap(),
            "--n-divs",
            "8",
            "--threshold",
            "2",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(tavg.exists());

    let kurt = tmp_dir.path().join("kurtosis");
    let cmd = rfi_plot()
        .args([
            "kurtosis",
            waterfall.to_str().unwrap(),
            "-o",
            kurt.to_str().unwrap(),
            "--output-format",
            "bmp",
            "--freq-range",
            "0",
            "0",
            "--kurtosis-range",
            "0",
            "0",
            "--n-divs",
            "8",
            "--show-rfi",
        ])
        .ok();
    assert!(cmd.is_ok(), "{:?}", get_cmd_output(cmd));
    assert!(fs::read(&kurt).unwrap().starts_with(b"BM"));
}
