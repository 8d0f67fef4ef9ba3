// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The time-averaged power spectrum of a waterfall, with RFI-flagged bins
//! shaded.

use std::path::Path;

use log::debug;

use super::*;
use crate::{
    constants::{
        DEFAULT_KURTOSIS_THRESHOLD, DEFAULT_NUM_DIVISIONS, DEFAULT_OUTPUT_FORMAT,
        DEFAULT_TAVG_FREQ_RANGE, DEFAULT_TAVG_POWER_RANGE,
    },
    kurtosis::RfiClassifier,
    waterfall::Waterfall,
};

const SPECTRUM_LABEL: &str = "Time-averaged power spectrum";
const FLAGGED_LABEL: &str = "RFI-flagged channels";

#[derive(Debug, Clone, PartialEq)]
pub struct TavgPowerOptions {
    /// The frequency axis limits [MHz].
    pub freq_range: (f64, f64),

    /// The power axis limits [counts].
    pub power_range: (f64, f64),

    /// The number of bins the classifier divides the channels into.
    pub n_divs: usize,

    /// The kurtosis threshold given to the classifier.
    pub threshold: f64,

    /// Shade each flagged bin?
    pub show_flagged_bins: bool,

    pub output_format: String,
}

impl Default for TavgPowerOptions {
    fn default() -> Self {
        Self {
            freq_range: DEFAULT_TAVG_FREQ_RANGE,
            power_range: DEFAULT_TAVG_POWER_RANGE,
            n_divs: DEFAULT_NUM_DIVISIONS,
            threshold: DEFAULT_KURTOSIS_THRESHOLD,
            show_flagged_bins: true,
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }
}

/// Describe the time-averaged power spectrum of the first IF of `waterfall`.
/// If requested, every bin flagged by `classifier` is covered by a red band
/// one bin wide.
pub fn tavg_power_figure(
    waterfall: &Waterfall,
    classifier: &dyn RfiClassifier,
    options: &TavgPowerOptions,
) -> Result<Figure, PlotError> {
    let TavgPowerOptions {
        freq_range,
        power_range,
        n_divs,
        threshold,
        show_flagged_bins,
        output_format: _,
    } = options;

    let power = waterfall.time_averaged_power();
    let power = power.row(0);

    let mut figure = Figure::new("Frequency (MHz)", "Time-Averaged Power (Counts)");
    figure.x_range = Some(*freq_range);
    figure.y_range = Some(*power_range);
    figure.series.push(Series {
        kind: SeriesKind::Line,
        colour: Colour::CHARCOAL,
        label: Some(SPECTRUM_LABEL.to_string()),
        points: waterfall
            .freqs()
            .iter()
            .copied()
            .zip(power.iter().copied())
            .collect(),
    });

    let report = classifier.classify(waterfall, *n_divs, *threshold)?;

    if *show_flagged_bins {
        let (min_freq, max_freq) = waterfall.freq_extent();
        let bin_width = (max_freq - min_freq) / *n_divs as f64;
        debug!(
            "Shading {} flagged bins {bin_width} MHz wide",
            report.flagged_bins.len()
        );

        figure
            .spans
            .extend(report.flagged_bins.iter().map(|&bin| VerticalSpan {
                x_min: bin,
                x_max: bin + bin_width,
                colour: Colour::RED,
                alpha: 0.5,
                label: None,
            }));
        // One legend entry covers all of the bands.
        if let Some(last) = figure.spans.last_mut() {
            last.label = Some(FLAGGED_LABEL.to_string());
        }
    }

    figure.legend = Some(Legend {
        position: LegendPosition::AboveRight,
        columns: 1,
    });

    Ok(figure)
}

/// Plot the time-averaged power spectrum of `waterfall` (see
/// [`tavg_power_figure`]) and save it to `output_path`.
pub fn plot_tavg_power(
    waterfall: &Waterfall,
    classifier: &dyn RfiClassifier,
    saver: &dyn FigureSaver,
    output_path: &Path,
    options: &TavgPowerOptions,
) -> Result<Figure, PlotError> {
    let figure = tavg_power_figure(waterfall, classifier, options)?;
    saver.save(&figure, output_path, &options.output_format)?;
    Ok(figure)
}
