// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Waterfalls: power measurements over time and frequency.

mod error;
pub mod filterbank;

pub use error::WaterfallError;
pub use filterbank::FilterbankHeader;

use std::path::Path;

use log::debug;
use ndarray::prelude::*;

/// Power measurements with the shape (time, IF, channel), along with the
/// frequency of each channel.
#[derive(Debug, Clone)]
pub struct Waterfall {
    data: Array3<f64>,

    /// [MHz]
    freqs: Vec<f64>,

    /// Only available if the waterfall was read from a filterbank file.
    header: Option<FilterbankHeader>,
}

impl Waterfall {
    /// Create a waterfall from power measurements with the shape (time, IF,
    /// channel) and the frequency of each channel [MHz].
    pub fn new(data: Array3<f64>, freqs: Vec<f64>) -> Result<Waterfall, WaterfallError> {
        let (num_timesteps, num_ifs, num_chans) = data.dim();
        if num_timesteps == 0 {
            return Err(WaterfallError::Empty("timesteps"));
        }
        if num_ifs == 0 {
            return Err(WaterfallError::Empty("IFs"));
        }
        if num_chans == 0 {
            return Err(WaterfallError::Empty("channels"));
        }
        if freqs.len() != num_chans {
            return Err(WaterfallError::BadShape {
                thing: "the channel frequencies",
                expected: num_chans,
                actual: freqs.len(),
            });
        }

        Ok(Waterfall {
            data,
            freqs,
            header: None,
        })
    }

    /// Read a waterfall from a SIGPROC filterbank file.
    pub fn read(file: &Path) -> Result<Waterfall, WaterfallError> {
        debug!("Reading waterfall from {}", file.display());
        let (header, data) = filterbank::read(file)?;
        let mut wf = Waterfall::new(data, header.channel_freqs())?;
        wf.header = Some(header);
        Ok(wf)
    }

    pub fn data(&self) -> ArrayView3<f64> {
        self.data.view()
    }

    /// The frequency of each channel [MHz].
    pub fn freqs(&self) -> &[f64] {
        &self.freqs
    }

    pub fn header(&self) -> Option<&FilterbankHeader> {
        self.header.as_ref()
    }

    pub fn num_timesteps(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn num_ifs(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn num_chans(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// The power averaged over time, with the shape (IF, channel).
    pub fn time_averaged_power(&self) -> Array2<f64> {
        self.data.sum_axis(Axis(0)) / self.num_timesteps() as f64
    }

    /// The smallest and largest channel frequencies [MHz].
    pub fn freq_extent(&self) -> (f64, f64) {
        self.freqs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &f| {
                (min.min(f), max.max(f))
            })
    }
}
