// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision, like the data they are compared
against.
 */

/// The number of frequency bins the kurtosis classifier divides a waterfall
/// into.
pub const DEFAULT_NUM_DIVISIONS: usize = 256;

/// Bins with kurtosis greater than this are flagged as RFI.
pub const DEFAULT_KURTOSIS_THRESHOLD: f64 = 50.0;

/// The default frequency axis limits of the time-averaged power plot [MHz].
pub const DEFAULT_TAVG_FREQ_RANGE: (f64, f64) = (0.0, 6000.0);

/// The default power axis limits of the time-averaged power plot [counts].
pub const DEFAULT_TAVG_POWER_RANGE: (f64, f64) = (0.0, 5e10);

/// The default frequency axis limits of the kurtosis plot [MHz].
pub const DEFAULT_KURTOSIS_FREQ_RANGE: (f64, f64) = (2000.0, 4000.0);

/// The default kurtosis axis limits of the kurtosis plot.
pub const DEFAULT_KURTOSIS_RANGE: (f64, f64) = (-5.0, 500.0);

/// The default image format of written plots.
pub const DEFAULT_OUTPUT_FORMAT: &str = "png";

/// The number of X pixels on the plots.
pub const X_PIXELS: u32 = 3200;

/// The number of Y pixels on the plots.
pub const Y_PIXELS: u32 = 1800;
