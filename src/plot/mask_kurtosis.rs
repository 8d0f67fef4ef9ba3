// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The kurtosis of each frequency bin of a waterfall.

use std::path::Path;

use log::debug;

use super::*;
use crate::{
    constants::{
        DEFAULT_KURTOSIS_FREQ_RANGE, DEFAULT_KURTOSIS_RANGE, DEFAULT_KURTOSIS_THRESHOLD,
        DEFAULT_NUM_DIVISIONS, DEFAULT_OUTPUT_FORMAT,
    },
    kurtosis::RfiClassifier,
    waterfall::Waterfall,
};

#[derive(Debug, Clone, PartialEq)]
pub struct KurtosisPlotOptions {
    /// The number of bins the classifier divides the channels into.
    pub n_divs: usize,

    /// The kurtosis threshold given to the classifier.
    pub threshold: f64,

    /// Plot every bin?
    pub show_unfiltered: bool,

    /// Plot the bins that weren't flagged?
    pub show_clean: bool,

    /// Plot the flagged bins?
    pub show_flagged: bool,

    /// The frequency axis limits [MHz].
    pub freq_range: (f64, f64),

    pub kurtosis_range: (f64, f64),

    pub output_format: String,
}

impl Default for KurtosisPlotOptions {
    fn default() -> Self {
        Self {
            n_divs: DEFAULT_NUM_DIVISIONS,
            threshold: DEFAULT_KURTOSIS_THRESHOLD,
            show_unfiltered: true,
            show_clean: true,
            show_flagged: false,
            freq_range: DEFAULT_KURTOSIS_FREQ_RANGE,
            kurtosis_range: DEFAULT_KURTOSIS_RANGE,
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }
}

/// Describe the kurtosis of the frequency bins of `waterfall` as markers.
/// Up to three series are drawn: every bin, the clean bins and the flagged
/// bins.
pub fn mask_kurtosis_figure(
    waterfall: &Waterfall,
    classifier: &dyn RfiClassifier,
    options: &KurtosisPlotOptions,
) -> Result<Figure, PlotError> {
    let KurtosisPlotOptions {
        n_divs,
        threshold,
        show_unfiltered,
        show_clean,
        show_flagged,
        freq_range: (f_start, f_stop),
        kurtosis_range: (k_start, k_stop),
        output_format: _,
    } = options;

    let report = classifier.classify(waterfall, *n_divs, *threshold)?;

    let mut figure = Figure::new("Frequency (MHz)", "Kurtosis");
    if *show_unfiltered {
        figure.series.push(Series {
            kind: SeriesKind::Markers { size: 6 },
            colour: Colour::BLACK,
            label: Some("Unfiltered data".to_string()),
            points: report
                .bins
                .iter()
                .copied()
                .zip(report.kurts.iter().copied())
                .collect(),
        });
    }
    if *show_clean {
        figure.series.push(Series {
            kind: SeriesKind::Markers { size: 3 },
            colour: Colour::GREEN,
            label: Some("Clean channels".to_string()),
            points: report.clean_points().collect(),
        });
    }
    if *show_flagged {
        figure.series.push(Series {
            kind: SeriesKind::Markers { size: 3 },
            colour: Colour::RED,
            label: Some("Heavy RFI".to_string()),
            points: report.flagged_points().collect(),
        });
    }

    // TODO: Replace this with an explicit "use custom limits" option. Any
    // non-zero limit currently applies all four.
    if [f_start, f_stop, k_start, k_stop].iter().any(|&&v| v != 0.0) {
        figure.x_range = Some((*f_start, *f_stop));
        figure.y_range = Some((*k_start, *k_stop));
    } else {
        debug!("All kurtosis plot limits are zero; fitting the axes to the data");
    }
    figure.legend = Some(Legend {
        position: LegendPosition::AboveCentre,
        columns: 3,
    });

    Ok(figure)
}

/// Plot the kurtosis of the frequency bins of `waterfall` (see
/// [`mask_kurtosis_figure`]) and save it to `output_path`.
pub fn plot_mask_kurtosis(
    waterfall: &Waterfall,
    classifier: &dyn RfiClassifier,
    saver: &dyn FigureSaver,
    output_path: &Path,
    options: &KurtosisPlotOptions,
) -> Result<Figure, PlotError> {
    let figure = mask_kurtosis_figure(waterfall, classifier, options)?;
    saver.save(&figure, output_path, &options.output_format)?;
    Ok(figure)
}
