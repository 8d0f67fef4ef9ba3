// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("The number of frequency divisions must be at least 1")]
    ZeroDivisions,

    #[error("Cannot divide {num_chans} channels into {n_divs} frequency bins")]
    TooManyDivisions { n_divs: usize, num_chans: usize },

    #[error("Based on the number of bins, expected {thing} to have {expected} elements, but it had {actual} instead!")]
    BadShape {
        thing: &'static str,
        expected: usize,
        actual: usize,
    },
}
