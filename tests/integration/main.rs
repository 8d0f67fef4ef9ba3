// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod cli_args;

use std::path::{Path, PathBuf};
use std::process::Output;
use std::str::from_utf8;

use assert_cmd::{output::OutputError, Command};
use ndarray::prelude::*;

use rfi_kurtosis_plot::waterfall::{filterbank, FilterbankHeader};

fn rfi_plot() -> Command {
    Command::cargo_bin("rfi-plot").unwrap()
}

fn get_cmd_output(result: Result<Output, OutputError>) -> (String, String) {
    let output = match result {
        Ok(o) => o,
        Err(o) => o.as_output().unwrap().clone(),
    };
    (
        from_utf8(&output.stdout).unwrap().to_string(),
        from_utf8(&output.stderr).unwrap().to_string(),
    )
}

/// Write a small 32-bit filterbank file with 8 timesteps and 64 channels
/// starting at 2000 MHz. Channel 20 carries strong, bursty RFI.
fn make_filterbank<T: AsRef<Path>>(dir: T) -> PathBuf {
    let path = dir.as_ref().join("obs.fil");
    let header = FilterbankHeader::new(32, 64, 1, 2000.0, 10.0);
    let data = Array3::from_shape_fn((8, 1, 64), |(t, _, c)| {
        let base = 1000.0 + ((c * 7 + t * 3) % 5) as f64;
        if c == 20 {
            base * 1000.0 * (t + 1) as f64
        } else {
            base
        }
    });
    filterbank::write(&path, &header, data.view()).unwrap();
    path
}
