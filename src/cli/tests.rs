// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::{fs::File, io::Write, path::PathBuf};

use clap::{CommandFactory, ErrorKind, Parser};
use indoc::indoc;
use tempfile::TempDir;

use super::{
    common::{parse_range, split_arg_file, PlotArgsError},
    kurtosis::KurtosisArgs,
    tavg_power::TavgPowerArgs,
    *,
};

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_global_args() {
    let args = RfiPlot::try_parse_from([
        "rfi-plot",
        "-vv",
        "--dry-run",
        "kurtosis",
        "obs.fil",
        "-o",
        "kurtosis.png",
    ])
    .unwrap();
    assert_eq!(args.global_opts.verbosity, 2);
    assert!(args.global_opts.dry_run);
    assert!(args.global_opts.save_toml.is_none());
    match args.command {
        Command::Kurtosis(k) => {
            assert_eq!(k.waterfall, Some(PathBuf::from("obs.fil")));
            assert_eq!(k.output, Some(PathBuf::from("kurtosis.png")));
            assert!(k.args_file.is_none());
        }
        Command::TavgPower(_) => panic!("expected the kurtosis subcommand"),
    }
}

#[test]
fn test_about_and_version() {
    let command = RfiPlot::command();
    assert_eq!(command.get_version(), Some(env!("CARGO_PKG_VERSION")));
    assert!(command.get_author().is_none());
    assert!(command
        .get_about()
        .is_some_and(|about| about.contains("spectral kurtosis")));
}

#[test]
fn test_ranges_need_two_values() {
    let result =
        TavgPowerArgs::try_parse_from(["tavg-power", "obs.fil", "--freq-range", "1000"]);
    assert!(matches!(
        result.err().map(|e| e.kind()),
        Some(ErrorKind::WrongNumberOfValues)
    ));

    let args = KurtosisArgs::try_parse_from([
        "kurtosis",
        "obs.fil",
        "--kurtosis-range",
        "-5",
        "500",
        "--freq-range",
        "2000",
        "4000",
    ])
    .unwrap();
    assert_eq!(args.kurtosis_range, Some(vec![-5.0, 500.0]));
    assert_eq!(args.freq_range, Some(vec![2000.0, 4000.0]));
}

#[test]
fn test_parse_range() {
    assert_eq!(parse_range("r", None, (1.0, 2.0)).unwrap(), (1.0, 2.0));
    assert_eq!(
        parse_range("r", Some(vec![-3.0, 4.0]), (1.0, 2.0)).unwrap(),
        (-3.0, 4.0)
    );
    assert!(matches!(
        parse_range("r", Some(vec![1.0, 2.0, 3.0]), (1.0, 2.0)),
        Err(PlotArgsError::BadRange { arg: "r", .. })
    ));
}

#[test]
fn test_lone_arg_file_is_moved() {
    assert_eq!(
        split_arg_file(Some(PathBuf::from("args.TOML")), None),
        (None, Some(PathBuf::from("args.TOML")))
    );
    assert_eq!(
        split_arg_file(Some(PathBuf::from("obs.fil")), None),
        (Some(PathBuf::from("obs.fil")), None)
    );
    assert_eq!(
        split_arg_file(
            Some(PathBuf::from("obs.toml")),
            Some(PathBuf::from("args.json"))
        ),
        (
            Some(PathBuf::from("obs.toml")),
            Some(PathBuf::from("args.json"))
        )
    );
}

#[test]
fn test_tavg_power_cli_overrides_toml() {
    let tmp_dir = TempDir::new().unwrap();
    let args_file = write_file(
        &tmp_dir,
        "args.toml",
        indoc! {r#"
            waterfall = "from_file.fil"
            output = "from_file.png"
            n_divs = 64
            threshold = 20.0
            power_range = [0.0, 1000.0]
            hide_flagged_bins = true
        "#},
    );

    let args = TavgPowerArgs::try_parse_from([
        "tavg-power",
        "obs.fil",
        args_file.to_str().unwrap(),
        "--n-divs",
        "128",
    ])
    .unwrap()
    .merge()
    .unwrap();

    assert_eq!(args.waterfall, Some(PathBuf::from("obs.fil")));
    assert!(args.args_file.is_none());
    assert_eq!(args.output, Some(PathBuf::from("from_file.png")));
    assert_eq!(args.n_divs, Some(128));
    assert_eq!(args.threshold, Some(20.0));
    assert_eq!(args.power_range, Some(vec![0.0, 1000.0]));
    assert!(args.freq_range.is_none());
    assert!(args.hide_flagged_bins);
}

#[test]
fn test_kurtosis_json_arg_file_alone() {
    let tmp_dir = TempDir::new().unwrap();
    let waterfall = write_file(&tmp_dir, "obs.fil", "");
    let args_file = write_file(
        &tmp_dir,
        "args.json",
        &format!(
            r#"{{"waterfall": {:?}, "output": "k.svg", "output_format": "svg", "show_rfi": true, "freq_range": [0, 0], "kurtosis_range": [0, 0]}}"#,
            waterfall.display().to_string()
        ),
    );

    let args = KurtosisArgs::try_parse_from(["kurtosis", args_file.to_str().unwrap()])
        .unwrap()
        .merge()
        .unwrap();
    assert_eq!(args.waterfall.as_deref(), Some(waterfall.as_path()));
    assert!(args.show_rfi);
    assert!(!args.hide_clean);

    let (waterfall_file, output, options) = args.parse().unwrap();
    assert_eq!(waterfall_file, waterfall);
    assert_eq!(output, PathBuf::from("k.svg"));
    assert_eq!(options.output_format, "svg");
    assert!(options.show_unfiltered);
    assert!(options.show_clean);
    assert!(options.show_flagged);
    assert_eq!(options.freq_range, (0.0, 0.0));
    assert_eq!(options.kurtosis_range, (0.0, 0.0));
    assert_eq!(options.n_divs, crate::constants::DEFAULT_NUM_DIVISIONS);
}

#[test]
fn test_tavg_power_defaults() {
    let tmp_dir = TempDir::new().unwrap();
    let waterfall = write_file(&tmp_dir, "obs.fil", "");
    let args = TavgPowerArgs::try_parse_from([
        "tavg-power",
        waterfall.to_str().unwrap(),
        "-o",
        "tavg.png",
    ])
    .unwrap()
    .merge()
    .unwrap();
    let (_, _, options) = args.parse().unwrap();
    assert_eq!(options, crate::plot::TavgPowerOptions::default());
}

#[test]
fn test_missing_paths() {
    let result = TavgPowerArgs::try_parse_from(["tavg-power", "-o", "tavg.png"])
        .unwrap()
        .parse();
    assert!(matches!(result, Err(RfiPlotError::Waterfall(_))));

    let result = KurtosisArgs::try_parse_from(["kurtosis", "/does/not/exist.fil", "-o", "k.png"])
        .unwrap()
        .parse();
    assert!(matches!(result, Err(RfiPlotError::Waterfall(s)) if s.contains("doesn't exist")));

    let tmp_dir = TempDir::new().unwrap();
    let waterfall = write_file(&tmp_dir, "obs.fil", "");
    let result = KurtosisArgs::try_parse_from(["kurtosis", waterfall.to_str().unwrap()])
        .unwrap()
        .parse();
    assert!(matches!(result, Err(RfiPlotError::Plot(s)) if s.contains("No output")));
}

#[test]
fn test_bad_arg_files() {
    let tmp_dir = TempDir::new().unwrap();
    let args_file = write_file(&tmp_dir, "args.yaml", "n_divs: 4");
    let result = TavgPowerArgs::try_parse_from([
        "tavg-power",
        "obs.fil",
        args_file.to_str().unwrap(),
    ])
    .unwrap()
    .merge();
    assert!(matches!(result, Err(RfiPlotError::ArgFile(_))));

    let args_file = write_file(&tmp_dir, "args.toml", "n_divs = \"many\"");
    let result = TavgPowerArgs::try_parse_from([
        "tavg-power",
        "obs.fil",
        args_file.to_str().unwrap(),
    ])
    .unwrap()
    .merge();
    assert!(matches!(result, Err(RfiPlotError::ArgFile(s)) if s.contains("toml")));

    let args_file = write_file(&tmp_dir, "range.toml", "freq_range = [1.0, 2.0, 3.0]");
    let waterfall = write_file(&tmp_dir, "obs.fil", "");
    let result = TavgPowerArgs::try_parse_from([
        "tavg-power",
        waterfall.to_str().unwrap(),
        args_file.to_str().unwrap(),
        "-o",
        "tavg.png",
    ])
    .unwrap()
    .merge()
    .unwrap()
    .parse();
    assert!(matches!(result, Err(RfiPlotError::Plot(s)) if s.contains("--freq-range")));
}
