// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all rfi-plot-related errors. This should be the *only*
//! error enum that is publicly visible from the CLI.

use thiserror::Error;

use super::common::PlotArgsError;
use crate::{kurtosis::ClassifyError, plot::PlotError, waterfall::WaterfallError};

/// The *only* publicly visible error from the rfi-plot CLI.
#[derive(Error, Debug)]
pub enum RfiPlotError {
    /// An error related to argument files.
    #[error("{0}\n\nArgument files may be toml or json, and use the same names as the command-line arguments")]
    ArgFile(String),

    /// An error related to reading waterfalls.
    #[error("{0}\n\nWaterfalls must be SIGPROC filterbank files")]
    Waterfall(String),

    /// An error from the RFI classifier.
    #[error("{0}")]
    Classify(String),

    /// An error related to making a plot.
    #[error("{0}")]
    Plot(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<PlotArgsError> for RfiPlotError {
    fn from(e: PlotArgsError) -> Self {
        let s = e.to_string();
        match e {
            PlotArgsError::NoWaterfall | PlotArgsError::WaterfallDoesntExist(_) => {
                Self::Waterfall(s)
            }
            PlotArgsError::NoOutput | PlotArgsError::BadRange { .. } => Self::Plot(s),
            #[cfg(not(feature = "plotting"))]
            PlotArgsError::NoPlottingFeature => Self::Plot(s),
        }
    }
}

impl From<WaterfallError> for RfiPlotError {
    fn from(e: WaterfallError) -> Self {
        let s = e.to_string();
        match e {
            WaterfallError::IO(_) => Self::Generic(s),
            WaterfallError::NoHeaderStart { .. }
            | WaterfallError::BadKeywordLength(_)
            | WaterfallError::NonUtf8Keyword
            | WaterfallError::UnknownKeyword(_)
            | WaterfallError::MissingKeyword(_)
            | WaterfallError::InvalidValue { .. }
            | WaterfallError::UnsupportedNbits(_)
            | WaterfallError::SpectrumTooLarge { .. }
            | WaterfallError::Empty(_)
            | WaterfallError::BadShape { .. } => Self::Waterfall(s),
        }
    }
}

impl From<ClassifyError> for RfiPlotError {
    fn from(e: ClassifyError) -> Self {
        Self::Classify(e.to_string())
    }
}

impl From<PlotError> for RfiPlotError {
    fn from(e: PlotError) -> Self {
        let s = e.to_string();
        match e {
            PlotError::Classify(_) => Self::Classify(s),
            PlotError::UnsupportedFormat(_)
            | PlotError::InvalidAxisRange { .. }
            | PlotError::Draw(_) => Self::Plot(s),
            #[cfg(feature = "plotting")]
            PlotError::Image(_) => Self::Generic(s),
            PlotError::IO(_) => Self::Generic(s),
        }
    }
}

impl From<std::io::Error> for RfiPlotError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
