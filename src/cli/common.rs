// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code shared between the subcommands.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use itertools::Itertools;
use log::debug;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use crate::{
    constants::{DEFAULT_KURTOSIS_THRESHOLD, DEFAULT_NUM_DIVISIONS, DEFAULT_OUTPUT_FORMAT},
    plot::{FigureSaver, OUTPUT_FORMATS_COMMA_SEPARATED},
};

lazy_static::lazy_static! {
    pub(super) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String = ArgFileTypes::iter().join(", ");

    pub(super) static ref ARG_FILE_HELP: String =
        format!("All arguments may be specified in a file. Any CLI arguments override arguments set in the file. Supported formats: {}", *ARG_FILE_TYPES_COMMA_SEPARATED);

    pub(super) static ref OUTPUT_FORMAT_HELP: String =
        format!("The image format of the plot. This does not need to match the output file's extension. Supported formats: {}. Default: {DEFAULT_OUTPUT_FORMAT}", *OUTPUT_FORMATS_COMMA_SEPARATED);

    pub(super) static ref N_DIVS_HELP: String =
        format!("The number of frequency bins the channels are divided into before calculating their kurtosis. Default: {DEFAULT_NUM_DIVISIONS}");

    pub(super) static ref THRESHOLD_HELP: String =
        format!("Bins with a kurtosis above this value are flagged as RFI. Default: {DEFAULT_KURTOSIS_THRESHOLD}");
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(super) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

macro_rules! unpack_arg_file {
    ($arg_file:expr) => ({
        use std::{fs::File, io::Read, str::FromStr};

        use crate::cli::common::{ArgFileTypes, ARG_FILE_TYPES_COMMA_SEPARATED};

        debug!("Attempting to parse argument file {}", $arg_file.display());

        let mut contents = String::new();
        let arg_file_type = $arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok());

        match arg_file_type {
            Some(ArgFileTypes::Toml) => {
                debug!("Parsing toml file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match toml::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(RfiPlotError::ArgFile(format!(
                            "Couldn't decode toml structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }
            Some(ArgFileTypes::Json) => {
                debug!("Parsing json file...");
                let mut fh = File::open(&$arg_file)?;
                fh.read_to_string(&mut contents)?;
                match serde_json::from_str(&contents) {
                    Ok(p) => p,
                    Err(err) => {
                        return Err(RfiPlotError::ArgFile(format!(
                            "Couldn't decode json structure from {:?}:\n{err}",
                            $arg_file
                        )))
                    }
                }
            }

            _ => {
                return Err(RfiPlotError::ArgFile(format!(
                    "Argument file '{:?}' doesn't have a recognised file extension! Valid extensions are: {}", $arg_file, *ARG_FILE_TYPES_COMMA_SEPARATED)
                ))
            }
        }
    });
}

/// Both positional arguments are optional, so a lone arguments file lands in
/// the waterfall slot. Move it to where it belongs.
pub(super) fn split_arg_file(
    waterfall: Option<PathBuf>,
    args_file: Option<PathBuf>,
) -> (Option<PathBuf>, Option<PathBuf>) {
    match (waterfall, args_file) {
        (Some(w), None) if is_arg_file(&w) => {
            debug!("Treating {} as an argument file", w.display());
            (None, Some(w))
        }
        other => other,
    }
}

fn is_arg_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| ArgFileTypes::from_str(&e.to_lowercase()).is_ok())
        .unwrap_or(false)
}

/// Unpack a `[lower, upper]` range argument.
pub(super) fn parse_range(
    arg: &'static str,
    range: Option<Vec<f64>>,
    default: (f64, f64),
) -> Result<(f64, f64), PlotArgsError> {
    match range.as_deref() {
        None => Ok(default),
        Some(&[lower, upper]) => Ok((lower, upper)),
        Some(other) => Err(PlotArgsError::BadRange {
            arg,
            got: other.to_vec(),
        }),
    }
}

/// Check the waterfall and output paths that every subcommand needs.
pub(super) fn check_paths(
    waterfall: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<(PathBuf, PathBuf), PlotArgsError> {
    let waterfall = waterfall.ok_or(PlotArgsError::NoWaterfall)?;
    if !waterfall.exists() {
        return Err(PlotArgsError::WaterfallDoesntExist(waterfall.into_boxed_path()));
    }
    let output = output.ok_or(PlotArgsError::NoOutput)?;
    Ok((waterfall, output))
}

#[cfg(feature = "plotting")]
pub(super) fn figure_saver() -> Result<Box<dyn FigureSaver>, PlotArgsError> {
    Ok(Box::new(crate::plot::PlottersSaver::default()))
}

#[cfg(not(feature = "plotting"))]
pub(super) fn figure_saver() -> Result<Box<dyn FigureSaver>, PlotArgsError> {
    // Rendering needs plotters, which is an optional dependency.
    Err(PlotArgsError::NoPlottingFeature)
}

#[derive(Error, Debug)]
pub(super) enum PlotArgsError {
    #[error("No waterfall file was supplied")]
    NoWaterfall,

    #[error("Waterfall file '{}' doesn't exist", .0.display())]
    WaterfallDoesntExist(Box<Path>),

    #[error("No output plot file was supplied")]
    NoOutput,

    #[error("--{arg} was specified as {got:?}, not [<lower>, <upper>]")]
    BadRange { arg: &'static str, got: Vec<f64> },

    #[cfg(not(feature = "plotting"))]
    #[error("rfi-plot was not compiled with the \"plotting\" feature. Please recompile with this feature enabled to make plots")]
    NoPlottingFeature,
}
