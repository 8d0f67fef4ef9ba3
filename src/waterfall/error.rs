// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with reading or constructing waterfalls.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WaterfallError {
    #[error("When reading {file}, expected HEADER_START as the first keyword, got '{got}' instead!")]
    NoHeaderStart { file: String, got: String },

    #[error("Filterbank header keyword has an invalid length ({0})")]
    BadKeywordLength(i32),

    #[error("Filterbank header contains a keyword that isn't valid UTF-8")]
    NonUtf8Keyword,

    #[error("Unrecognised filterbank header keyword '{0}'")]
    UnknownKeyword(String),

    #[error("The filterbank header is missing the '{0}' keyword")]
    MissingKeyword(&'static str),

    #[error("Filterbank header keyword '{keyword}' has an invalid value ({value})")]
    InvalidValue { keyword: &'static str, value: i32 },

    #[error("Unsupported number of bits per sample: {0}. Supported: 8, 16, 32")]
    UnsupportedNbits(u32),

    #[error("A spectrum of {nifs} IFs and {nchans} {nbits}-bit channels is too large to read")]
    SpectrumTooLarge {
        nifs: usize,
        nchans: usize,
        nbits: u32,
    },

    #[error("The waterfall has no {0}")]
    Empty(&'static str),

    #[error("Expected {thing} to have {expected} elements, but it had {actual} instead!")]
    BadShape {
        thing: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
