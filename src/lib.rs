// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Plots of the power and spectral kurtosis of radio-astronomy waterfalls, for
spotting radio-frequency interference (RFI).
 */

mod cli;
pub mod constants;
pub mod kurtosis;
pub mod plot;
pub mod waterfall;

// Re-exports.
pub use cli::{RfiPlot, RfiPlotError};
pub use kurtosis::{KurtosisReport, RfiClassifier, SpectralKurtosis};
pub use plot::{
    mask_kurtosis_figure, plot_mask_kurtosis, plot_tavg_power, tavg_power_figure, Figure,
    FigureSaver, KurtosisPlotOptions, PlotError, TavgPowerOptions,
};
pub use waterfall::{Waterfall, WaterfallError};
