// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use super::OUTPUT_FORMATS_COMMA_SEPARATED;
use crate::kurtosis::ClassifyError;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    #[error(
        "Unsupported output format '{0}'. Supported formats: {}",
        *OUTPUT_FORMATS_COMMA_SEPARATED
    )]
    UnsupportedFormat(String),

    #[error("The {axis} axis lower limit ({lower}) must be smaller than its upper limit ({upper})")]
    InvalidAxisRange {
        axis: &'static str,
        lower: f64,
        upper: f64,
    },

    #[error("Error from the plotters library: {0}")]
    Draw(String),

    #[cfg(feature = "plotting")]
    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
