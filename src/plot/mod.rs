// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Plots of waterfalls and their RFI flags.
//!
//! Each plot is first described as a [`Figure`], which is handed to a
//! [`FigureSaver`] to be written to disk and then returned to the caller.
//! [`PlottersSaver`] renders figures with the `plotters` library (requires
//! the "plotting" feature).

mod error;
mod mask_kurtosis;
#[cfg(feature = "plotting")]
mod render;
mod tavg_power;

pub use error::PlotError;
pub use mask_kurtosis::{mask_kurtosis_figure, plot_mask_kurtosis, KurtosisPlotOptions};
#[cfg(feature = "plotting")]
pub use render::PlottersSaver;
pub use tavg_power::{plot_tavg_power, tavg_power_figure, TavgPowerOptions};

use std::{ops::Range, path::Path};

use itertools::Itertools;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

lazy_static::lazy_static! {
    pub static ref OUTPUT_FORMATS_COMMA_SEPARATED: String = OutputFormat::iter().join(", ");
}

/// Something that writes figures to files.
pub trait FigureSaver {
    /// Write `figure` to `path`. `format` is the image format, e.g. "png".
    fn save(&self, figure: &Figure, path: &Path, format: &str) -> Result<(), PlotError>;
}

/// The image formats that [`PlottersSaver`] can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString)]
pub enum OutputFormat {
    #[strum(serialize = "png")]
    Png,

    #[strum(to_string = "jpg", serialize = "jpeg")]
    Jpeg,

    #[strum(serialize = "bmp")]
    Bmp,

    #[strum(serialize = "svg")]
    Svg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    pub const BLACK: Colour = Colour::rgb(0, 0, 0);
    pub const RED: Colour = Colour::rgb(255, 0, 0);
    /// #1f1f1f
    pub const CHARCOAL: Colour = Colour::rgb(0x1f, 0x1f, 0x1f);
    /// #43cc5c
    pub const GREEN: Colour = Colour::rgb(0x43, 0xcc, 0x5c);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Colour {
        Colour { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeriesKind {
    /// Points joined by a line.
    Line,

    /// Unconnected circular markers with a radius in pixels.
    Markers { size: u32 },
}

/// One data series on a figure's axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub kind: SeriesKind,
    pub colour: Colour,
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
}

/// A shaded band covering the whole height of the axes.
#[derive(Debug, Clone, PartialEq)]
pub struct VerticalSpan {
    pub x_min: f64,
    pub x_max: f64,
    pub colour: Colour,
    /// 0 is transparent, 1 is opaque.
    pub alpha: f64,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendPosition {
    /// Above the axes, against the right edge.
    AboveRight,

    /// Above the axes, centred.
    AboveCentre,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Legend {
    pub position: LegendPosition,
    pub columns: usize,
}

/// A single set of axes and everything drawn on them.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: Option<String>,
    pub x_label: String,
    pub y_label: String,

    /// If `None`, the axis fits the data.
    pub x_range: Option<(f64, f64)>,

    /// If `None`, the axis fits the data.
    pub y_range: Option<(f64, f64)>,

    pub series: Vec<Series>,
    pub spans: Vec<VerticalSpan>,
    pub legend: Option<Legend>,
}

impl Figure {
    pub fn new(x_label: &str, y_label: &str) -> Figure {
        Figure {
            title: None,
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            x_range: None,
            y_range: None,
            series: vec![],
            spans: vec![],
            legend: None,
        }
    }

    /// All legend labels, spans first, in drawing order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.spans
            .iter()
            .filter_map(|s| s.label.as_deref())
            .chain(self.series.iter().filter_map(|s| s.label.as_deref()))
    }

    /// The x and y ranges to draw. Explicit ranges must have their lower
    /// limit below their upper limit; missing ranges are fitted to the finite
    /// data with a 5% margin.
    pub fn axis_ranges(&self) -> Result<(Range<f64>, Range<f64>), PlotError> {
        let points = || {
            self.series
                .iter()
                .flat_map(|s| s.points.iter().copied())
                .filter(|(x, y)| x.is_finite() && y.is_finite())
        };

        let x_range = match self.x_range {
            Some((lower, upper)) => checked_range("x", lower, upper)?,
            None => fit_range(
                points()
                    .map(|(x, _)| x)
                    .chain(self.spans.iter().flat_map(|s| [s.x_min, s.x_max])),
            ),
        };
        let y_range = match self.y_range {
            Some((lower, upper)) => checked_range("y", lower, upper)?,
            None => fit_range(points().map(|(_, y)| y)),
        };
        Ok((x_range, y_range))
    }
}

fn checked_range(axis: &'static str, lower: f64, upper: f64) -> Result<Range<f64>, PlotError> {
    if lower < upper && lower.is_finite() && upper.is_finite() {
        Ok(lower..upper)
    } else {
        Err(PlotError::InvalidAxisRange { axis, lower, upper })
    }
}

fn fit_range<I: Iterator<Item = f64>>(values: I) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });
    if min > max {
        // No data.
        return 0.0..1.0;
    }
    let margin = if max > min { 0.05 * (max - min) } else { 1.0 };
    (min - margin)..(max + margin)
}
