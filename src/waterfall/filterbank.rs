// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Code to read and write SIGPROC filterbank files.
//!
//! A filterbank header is a sequence of keywords, each a little-endian `i32`
//! length followed by that many ASCII bytes, sitting between the keywords
//! `HEADER_START` and `HEADER_END`. Every keyword other than these two is
//! followed by its value: an `i32`, an `f64` or another length-prefixed
//! string. The samples follow the header, ordered by time (slowest), IF then
//! channel (fastest).

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use log::{debug, trace, warn};
use ndarray::prelude::*;

use super::error::WaterfallError;

const HEADER_START: &str = "HEADER_START";
const HEADER_END: &str = "HEADER_END";

/// No keyword or string value in a real header is anywhere near this long.
const MAX_STRING_LEN: i32 = 4096;

/// The metadata of a filterbank file. Only `nbits`, `nchans`, `nifs`, `fch1`
/// and `foff` are needed to interpret the data; everything else is carried
/// along for display.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterbankHeader {
    pub source_name: Option<String>,
    pub rawdatafile: Option<String>,
    pub telescope_id: Option<i32>,
    pub machine_id: Option<i32>,
    pub data_type: Option<i32>,
    pub barycentric: Option<i32>,
    pub pulsarcentric: Option<i32>,
    pub nsamples: Option<i32>,
    pub nbeams: Option<i32>,
    pub ibeam: Option<i32>,

    /// The number of bits per sample.
    pub nbits: u32,

    /// The number of frequency channels.
    pub nchans: usize,

    /// The number of IFs (e.g. polarisations).
    pub nifs: usize,

    /// The centre frequency of the first channel [MHz].
    pub fch1: f64,

    /// The channel width [MHz]. Negative if the channels are in descending
    /// frequency order.
    pub foff: f64,

    /// [MJD]
    pub tstart: Option<f64>,
    /// [seconds]
    pub tsamp: Option<f64>,
    pub src_raj: Option<f64>,
    pub src_dej: Option<f64>,
    pub az_start: Option<f64>,
    pub za_start: Option<f64>,
    pub refdm: Option<f64>,
    pub period: Option<f64>,
}

impl FilterbankHeader {
    /// A header with only the keywords required to read the data.
    pub fn new(nbits: u32, nchans: usize, nifs: usize, fch1: f64, foff: f64) -> Self {
        Self {
            source_name: None,
            rawdatafile: None,
            telescope_id: None,
            machine_id: None,
            data_type: None,
            barycentric: None,
            pulsarcentric: None,
            nsamples: None,
            nbeams: None,
            ibeam: None,
            nbits,
            nchans,
            nifs,
            fch1,
            foff,
            tstart: None,
            tsamp: None,
            src_raj: None,
            src_dej: None,
            az_start: None,
            za_start: None,
            refdm: None,
            period: None,
        }
    }

    /// The centre frequency of every channel, in file order [MHz].
    pub fn channel_freqs(&self) -> Vec<f64> {
        (0..self.nchans)
            .map(|i| self.fch1 + i as f64 * self.foff)
            .collect()
    }

    /// The number of bytes in a single spectrum (all IFs and channels of one
    /// timestep). `None` if that doesn't fit in a `usize` or is zero.
    pub fn spectrum_num_bytes(&self) -> Option<usize> {
        self.nifs
            .checked_mul(self.nchans)?
            .checked_mul(self.nbits as usize / 8)
            .filter(|&n| n > 0)
    }

    fn too_large(&self) -> WaterfallError {
        WaterfallError::SpectrumTooLarge {
            nifs: self.nifs,
            nchans: self.nchans,
            nbits: self.nbits,
        }
    }

    pub(super) fn read<R: Read>(reader: &mut R, file: &str) -> Result<Self, WaterfallError> {
        let first = read_string(reader)?;
        if first != HEADER_START {
            return Err(WaterfallError::NoHeaderStart {
                file: file.to_string(),
                got: first,
            });
        }

        let mut source_name = None;
        let mut rawdatafile = None;
        let mut telescope_id = None;
        let mut machine_id = None;
        let mut data_type = None;
        let mut barycentric = None;
        let mut pulsarcentric = None;
        let mut nsamples = None;
        let mut nbeams = None;
        let mut ibeam = None;
        let mut nbits = None;
        let mut nchans = None;
        let mut nifs = None;
        let mut fch1 = None;
        let mut foff = None;
        let mut tstart = None;
        let mut tsamp = None;
        let mut src_raj = None;
        let mut src_dej = None;
        let mut az_start = None;
        let mut za_start = None;
        let mut refdm = None;
        let mut period = None;

        loop {
            let keyword = read_string(reader)?;
            trace!("Filterbank header keyword: {keyword}");
            match keyword.as_str() {
                HEADER_END => break,

                "source_name" => source_name = Some(read_string(reader)?),
                "rawdatafile" => rawdatafile = Some(read_string(reader)?),

                "telescope_id" => telescope_id = Some(reader.read_i32::<LittleEndian>()?),
                "machine_id" => machine_id = Some(reader.read_i32::<LittleEndian>()?),
                "data_type" => data_type = Some(reader.read_i32::<LittleEndian>()?),
                "barycentric" => barycentric = Some(reader.read_i32::<LittleEndian>()?),
                "pulsarcentric" => pulsarcentric = Some(reader.read_i32::<LittleEndian>()?),
                "nsamples" => nsamples = Some(reader.read_i32::<LittleEndian>()?),
                "nbeams" => nbeams = Some(reader.read_i32::<LittleEndian>()?),
                "ibeam" => ibeam = Some(reader.read_i32::<LittleEndian>()?),
                "nbits" => nbits = Some(reader.read_i32::<LittleEndian>()?),
                "nchans" => nchans = Some(reader.read_i32::<LittleEndian>()?),
                "nifs" => nifs = Some(reader.read_i32::<LittleEndian>()?),

                "fch1" => fch1 = Some(reader.read_f64::<LittleEndian>()?),
                "foff" => foff = Some(reader.read_f64::<LittleEndian>()?),
                "tstart" => tstart = Some(reader.read_f64::<LittleEndian>()?),
                "tsamp" => tsamp = Some(reader.read_f64::<LittleEndian>()?),
                "src_raj" => src_raj = Some(reader.read_f64::<LittleEndian>()?),
                "src_dej" => src_dej = Some(reader.read_f64::<LittleEndian>()?),
                "az_start" => az_start = Some(reader.read_f64::<LittleEndian>()?),
                "za_start" => za_start = Some(reader.read_f64::<LittleEndian>()?),
                "refdm" => refdm = Some(reader.read_f64::<LittleEndian>()?),
                "period" => period = Some(reader.read_f64::<LittleEndian>()?),

                _ => return Err(WaterfallError::UnknownKeyword(keyword)),
            }
        }

        let nbits = nbits.ok_or(WaterfallError::MissingKeyword("nbits"))?;
        let nbits = match nbits {
            8 | 16 | 32 => nbits as u32,
            n if n > 0 => return Err(WaterfallError::UnsupportedNbits(n as u32)),
            n => {
                return Err(WaterfallError::InvalidValue {
                    keyword: "nbits",
                    value: n,
                })
            }
        };
        let nchans = positive("nchans", nchans.ok_or(WaterfallError::MissingKeyword("nchans"))?)?;
        let nifs = positive("nifs", nifs.unwrap_or(1))?;

        let header = Self {
            source_name,
            rawdatafile,
            telescope_id,
            machine_id,
            data_type,
            barycentric,
            pulsarcentric,
            nsamples,
            nbeams,
            ibeam,
            nbits,
            nchans,
            nifs,
            fch1: fch1.ok_or(WaterfallError::MissingKeyword("fch1"))?,
            foff: foff.ok_or(WaterfallError::MissingKeyword("foff"))?,
            tstart,
            tsamp,
            src_raj,
            src_dej,
            az_start,
            za_start,
            refdm,
            period,
        };
        match header.spectrum_num_bytes() {
            Some(_) => Ok(header),
            None => Err(header.too_large()),
        }
    }

    pub(super) fn write<W: Write>(&self, writer: &mut W) -> Result<(), WaterfallError> {
        write_string(writer, HEADER_START)?;

        for (keyword, value) in [
            ("source_name", &self.source_name),
            ("rawdatafile", &self.rawdatafile),
        ] {
            if let Some(v) = value {
                write_string(writer, keyword)?;
                write_string(writer, v)?;
            }
        }

        for (keyword, value) in [
            ("telescope_id", self.telescope_id),
            ("machine_id", self.machine_id),
            ("data_type", self.data_type),
            ("barycentric", self.barycentric),
            ("pulsarcentric", self.pulsarcentric),
            ("nsamples", self.nsamples),
            ("nbeams", self.nbeams),
            ("ibeam", self.ibeam),
            ("nbits", Some(self.nbits as i32)),
            ("nchans", Some(self.nchans as i32)),
            ("nifs", Some(self.nifs as i32)),
        ] {
            if let Some(v) = value {
                write_string(writer, keyword)?;
                writer.write_i32::<LittleEndian>(v)?;
            }
        }

        for (keyword, value) in [
            ("fch1", Some(self.fch1)),
            ("foff", Some(self.foff)),
            ("tstart", self.tstart),
            ("tsamp", self.tsamp),
            ("src_raj", self.src_raj),
            ("src_dej", self.src_dej),
            ("az_start", self.az_start),
            ("za_start", self.za_start),
            ("refdm", self.refdm),
            ("period", self.period),
        ] {
            if let Some(v) = value {
                write_string(writer, keyword)?;
                writer.write_f64::<LittleEndian>(v)?;
            }
        }

        write_string(writer, HEADER_END)?;
        Ok(())
    }
}

/// Read a filterbank file. The returned array has the shape (time, IF,
/// channel).
pub(super) fn read(file: &Path) -> Result<(FilterbankHeader, Array3<f64>), WaterfallError> {
    let file_str = file.display().to_string();
    let mut reader = BufReader::new(File::open(file)?);
    let header = FilterbankHeader::read(&mut reader, &file_str)?;
    debug!("{file_str} header: {header:?}");

    let mut bytes = vec![];
    reader.read_to_end(&mut bytes)?;
    let spectrum_num_bytes = header
        .spectrum_num_bytes()
        .ok_or_else(|| header.too_large())?;
    let num_timesteps = bytes.len() / spectrum_num_bytes;
    let leftover = bytes.len() % spectrum_num_bytes;
    if leftover != 0 {
        warn!("{file_str} ends with an incomplete spectrum ({leftover} bytes); ignoring it");
    }
    if num_timesteps == 0 {
        return Err(WaterfallError::Empty("timesteps"));
    }
    let bytes = &bytes[..num_timesteps * spectrum_num_bytes];

    let num_samples = num_timesteps * header.nifs * header.nchans;
    let samples: Vec<f64> = match header.nbits {
        8 => bytes.iter().map(|&b| b as f64).collect(),
        16 => {
            let mut v = vec![0; num_samples];
            LittleEndian::read_u16_into(bytes, &mut v);
            v.into_iter().map(|s| s as f64).collect()
        }
        32 => {
            let mut v = vec![0.0; num_samples];
            LittleEndian::read_f32_into(bytes, &mut v);
            v.into_iter().map(|s| s as f64).collect()
        }
        n => return Err(WaterfallError::UnsupportedNbits(n)),
    };
    let data = Array3::from_shape_vec((num_timesteps, header.nifs, header.nchans), samples)
        .map_err(|_| WaterfallError::BadShape {
            thing: "the filterbank data",
            expected: num_samples,
            actual: bytes.len(),
        })?;

    Ok((header, data))
}

/// Write a 32-bit filterbank file. `data` must have the shape (time, IF,
/// channel) and agree with the `nchans` and `nifs` of `header`.
pub fn write(
    file: &Path,
    header: &FilterbankHeader,
    data: ArrayView3<f64>,
) -> Result<(), WaterfallError> {
    let (_, num_ifs, num_chans) = data.dim();
    if num_chans != header.nchans {
        return Err(WaterfallError::BadShape {
            thing: "the channel axis",
            expected: header.nchans,
            actual: num_chans,
        });
    }
    if num_ifs != header.nifs {
        return Err(WaterfallError::BadShape {
            thing: "the IF axis",
            expected: header.nifs,
            actual: num_ifs,
        });
    }
    if header.nbits != 32 {
        return Err(WaterfallError::UnsupportedNbits(header.nbits));
    }

    let mut writer = BufWriter::new(File::create(file)?);
    header.write(&mut writer)?;
    for &sample in data.iter() {
        writer.write_f32::<LittleEndian>(sample as f32)?;
    }
    writer.flush()?;
    Ok(())
}

fn read_string<R: Read>(reader: &mut R) -> Result<String, WaterfallError> {
    let len = reader.read_i32::<LittleEndian>()?;
    if !(1..=MAX_STRING_LEN).contains(&len) {
        return Err(WaterfallError::BadKeywordLength(len));
    }
    let mut buf = vec![0; len as usize];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| WaterfallError::NonUtf8Keyword)
}

fn write_string<W: Write>(writer: &mut W, s: &str) -> Result<(), WaterfallError> {
    writer.write_i32::<LittleEndian>(s.len() as i32)?;
    writer.write_all(s.as_bytes())?;
    Ok(())
}

fn positive(keyword: &'static str, value: i32) -> Result<usize, WaterfallError> {
    if value > 0 {
        Ok(value as usize)
    } else {
        Err(WaterfallError::InvalidValue { keyword, value })
    }
}
