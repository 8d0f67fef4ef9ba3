// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Kurtosis-based RFI classification.
//!
//! Narrow-band, intermittent interference tends to give the frequency bin it
//! lives in an anomalously large kurtosis. A classifier divides a waterfall's
//! channels into bins, works out the kurtosis of each and partitions the bins
//! into "flagged" (RFI) and "masked" (clean) sets.

mod error;

pub use error::ClassifyError;

use std::ops::Range;

use log::debug;

use crate::waterfall::Waterfall;

/// Something that can flag the frequency bins of a waterfall as RFI.
pub trait RfiClassifier {
    /// Divide `waterfall` into `n_divs` frequency bins and flag the bins
    /// whose kurtosis exceeds `threshold`.
    fn classify(
        &self,
        waterfall: &Waterfall,
        n_divs: usize,
        threshold: f64,
    ) -> Result<KurtosisReport, ClassifyError>;
}

/// The statistics of each frequency bin of a waterfall, and which bins were
/// flagged as RFI.
///
/// Every bin is either flagged or masked, never both; the flagged and masked
/// sequences keep the order of `bins`.
#[derive(Debug, Clone, PartialEq)]
pub struct KurtosisReport {
    /// The start (lowest) frequency of each bin [MHz].
    pub bins: Vec<f64>,

    /// The kurtosis of each bin.
    pub kurts: Vec<f64>,

    /// The mean power of each bin.
    pub pows_mean: Vec<f64>,

    /// The start frequencies of the flagged bins [MHz].
    pub flagged_bins: Vec<f64>,

    /// The kurtosis of each flagged bin.
    pub flagged_kurts: Vec<f64>,

    /// The kurtosis of each bin that wasn't flagged.
    pub masked_kurts: Vec<f64>,

    /// The frequencies of the channels in bins that weren't flagged [MHz].
    pub masked_freqs: Vec<f64>,

    /// `true` for each flagged bin.
    pub bin_mask: Vec<bool>,

    /// `true` for each channel belonging to a flagged bin.
    pub freq_mask: Vec<bool>,
}

impl KurtosisReport {
    /// Assemble a report from per-bin statistics. `bin_chans` are the channel
    /// indices (into `freqs`) that make up each bin; a bin is flagged if its
    /// kurtosis is greater than `threshold`. NaN kurtoses are never flagged.
    pub fn from_bins(
        freqs: &[f64],
        bins: Vec<f64>,
        kurts: Vec<f64>,
        pows_mean: Vec<f64>,
        bin_chans: &[Range<usize>],
        threshold: f64,
    ) -> Result<KurtosisReport, ClassifyError> {
        let n_divs = bins.len();
        for (thing, len) in [
            ("the kurtoses", kurts.len()),
            ("the mean powers", pows_mean.len()),
            ("the bin channel ranges", bin_chans.len()),
        ] {
            if len != n_divs {
                return Err(ClassifyError::BadShape {
                    thing,
                    expected: n_divs,
                    actual: len,
                });
            }
        }
        if let Some(chans) = bin_chans
            .iter()
            .find(|c| c.start > c.end || c.end > freqs.len())
        {
            return Err(ClassifyError::BadShape {
                thing: "the channel frequencies",
                expected: chans.end,
                actual: freqs.len(),
            });
        }

        let bin_mask: Vec<bool> = kurts.iter().map(|&k| k > threshold).collect();

        let mut flagged_bins = vec![];
        let mut flagged_kurts = vec![];
        let mut masked_kurts = vec![];
        let mut masked_freqs = vec![];
        let mut freq_mask = vec![false; freqs.len()];
        for (((&bin, &kurt), &flagged), chans) in bins
            .iter()
            .zip(kurts.iter())
            .zip(bin_mask.iter())
            .zip(bin_chans)
        {
            if flagged {
                flagged_bins.push(bin);
                flagged_kurts.push(kurt);
                freq_mask[chans.clone()].fill(true);
            } else {
                masked_kurts.push(kurt);
                masked_freqs.extend_from_slice(&freqs[chans.clone()]);
            }
        }

        Ok(KurtosisReport {
            bins,
            kurts,
            pows_mean,
            flagged_bins,
            flagged_kurts,
            masked_kurts,
            masked_freqs,
            bin_mask,
            freq_mask,
        })
    }

    /// The number of frequency bins.
    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    /// The `(bin, kurtosis)` pairs of each bin that wasn't flagged.
    pub fn clean_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.bins
            .iter()
            .zip(self.bin_mask.iter())
            .filter(|&(_, &flagged)| !flagged)
            .map(|(&bin, _)| bin)
            .zip(self.masked_kurts.iter().copied())
    }

    /// The `(bin, kurtosis)` pairs of each flagged bin.
    pub fn flagged_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.flagged_bins
            .iter()
            .copied()
            .zip(self.flagged_kurts.iter().copied())
    }

    /// Does every bin belong to exactly one of the flagged and masked sets?
    pub fn is_partition(&self) -> bool {
        let n = self.num_bins();
        let num_flagged = self.bin_mask.iter().filter(|&&f| f).count();
        self.kurts.len() == n
            && self.bin_mask.len() == n
            && self.flagged_bins.len() == self.flagged_kurts.len()
            && self.flagged_bins.len() == num_flagged
            && self.masked_kurts.len() == n - num_flagged
            && self
                .bins
                .iter()
                .zip(self.bin_mask.iter())
                .filter(|&(_, &flagged)| flagged)
                .map(|(&bin, _)| bin)
                .eq(self.flagged_bins.iter().copied())
    }
}

/// Flags bins of the first IF of the time-averaged power spectrum by their
/// excess kurtosis.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralKurtosis;

impl RfiClassifier for SpectralKurtosis {
    fn classify(
        &self,
        waterfall: &Waterfall,
        n_divs: usize,
        threshold: f64,
    ) -> Result<KurtosisReport, ClassifyError> {
        let num_chans = waterfall.num_chans();
        if n_divs == 0 {
            return Err(ClassifyError::ZeroDivisions);
        }
        if n_divs > num_chans {
            return Err(ClassifyError::TooManyDivisions { n_divs, num_chans });
        }

        let bin_chans = divide_channels(num_chans, n_divs);
        let power = waterfall.time_averaged_power();
        let power = power.row(0);
        let freqs = waterfall.freqs();

        let mut bins = Vec::with_capacity(n_divs);
        let mut kurts = Vec::with_capacity(n_divs);
        let mut pows_mean = Vec::with_capacity(n_divs);
        for chans in &bin_chans {
            let bin_power = power.slice(ndarray::s![chans.clone()]).to_vec();
            bins.push(
                freqs[chans.clone()]
                    .iter()
                    .copied()
                    .fold(f64::INFINITY, f64::min),
            );
            pows_mean.push(bin_power.iter().sum::<f64>() / bin_power.len() as f64);
            kurts.push(excess_kurtosis(&bin_power));
        }

        let report =
            KurtosisReport::from_bins(freqs, bins, kurts, pows_mean, &bin_chans, threshold)?;
        debug!(
            "Flagged {} of {} bins with kurtosis above {threshold}",
            report.flagged_bins.len(),
            n_divs
        );
        Ok(report)
    }
}

/// Split `num_chans` channels into `n_divs` contiguous ranges of equal size.
/// Leftover channels go into the last range.
pub(crate) fn divide_channels(num_chans: usize, n_divs: usize) -> Vec<Range<usize>> {
    let chans_per_bin = num_chans / n_divs;
    (0..n_divs)
        .map(|i| {
            let start = i * chans_per_bin;
            let end = if i == n_divs - 1 {
                num_chans
            } else {
                start + chans_per_bin
            };
            start..end
        })
        .collect()
}

/// The (biased, Fisher) excess kurtosis of `values`: m4 / m2^2 - 3. NaN if
/// there are no values or they have no variance.
pub fn excess_kurtosis(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let (m2, m4) = values.iter().fold((0.0, 0.0), |(m2, m4), &v| {
        let d2 = (v - mean) * (v - mean);
        (m2 + d2, m4 + d2 * d2)
    });
    let (m2, m4) = (m2 / n, m4 / n);
    if m2 == 0.0 {
        return f64::NAN;
    }
    m4 / (m2 * m2) - 3.0
}
