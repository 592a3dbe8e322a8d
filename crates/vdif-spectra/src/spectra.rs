//! Labeled spectral time series assembled from a correlator file.

use std::{
    fs::File,
    io::{BufReader, Read},
    num::NonZeroUsize,
    path::Path,
};

use chrono::{DateTime, Utc};
use num_complex::Complex;
use serde::Serialize;

use crate::{
    error::SpectraError,
    layout::UnitLayout,
    reader::{Unit, UnitReader},
};

/// Complex spectra with dimensions `t` x `ch`, stored row-major.
///
/// Each row carries the coordinates of the unit it came from: the header
/// time, frame index and validity flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectra {
    channels: usize,
    times: Vec<DateTime<Utc>>,
    frame_indices: Vec<u32>,
    valid: Vec<bool>,
    data: Vec<Complex<f64>>,
}

impl Spectra {
    pub fn new(channels: usize) -> Self {
        Self::with_capacity(channels, 0)
    }

    pub fn with_capacity(channels: usize, rows: usize) -> Self {
        Self {
            channels,
            times: Vec::with_capacity(rows),
            frame_indices: Vec::with_capacity(rows),
            valid: Vec::with_capacity(rows),
            data: Vec::with_capacity(rows.checked_mul(channels).unwrap_or(0)),
        }
    }

    /// Appends one row. Fails if `spectrum` does not have [Spectra::channels] values.
    pub fn push(
        &mut self,
        time: DateTime<Utc>,
        frame_index: u32,
        valid: bool,
        spectrum: &[Complex<f64>],
    ) -> Result<(), SpectraError> {
        if spectrum.len() != self.channels {
            return Err(SpectraError::ChannelMismatch {
                expected: self.channels,
                got: spectrum.len(),
            });
        }

        self.times.push(time);
        self.frame_indices.push(frame_index);
        self.valid.push(valid);
        self.data.extend_from_slice(spectrum);
        Ok(())
    }

    /// Appends a decoded unit, timed by its header.
    pub fn push_unit(&mut self, unit: &Unit) -> Result<(), SpectraError> {
        let time = unit
            .header
            .timestamp()
            .ok_or(SpectraError::Timestamp { unit: unit.index })?;

        self.push(
            time,
            unit.header.frame_index(),
            unit.header.is_valid(),
            &unit.spectrum,
        )
    }

    /// Number of rows along `t`.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of columns along `ch`.
    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn times(&self) -> &[DateTime<Utc>] {
        &self.times
    }

    pub fn frame_indices(&self) -> &[u32] {
        &self.frame_indices
    }

    pub fn valid(&self) -> &[bool] {
        &self.valid
    }

    /// The spectrum at row `t`.
    pub fn row(&self, t: usize) -> Option<&[Complex<f64>]> {
        let start = t.checked_mul(self.channels)?;
        let end = start.checked_add(self.channels)?;
        self.data.get(start..end)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Complex<f64>]> {
        self.data.chunks_exact(self.channels.max(1))
    }

    /// Whole scans of `units_per_scan` consecutive rows, each flattened to
    /// `units_per_scan * channels` values. Rows past the last whole scan are left out.
    pub fn scans(&self, units_per_scan: NonZeroUsize) -> impl Iterator<Item = &[Complex<f64>]> {
        // An overflowing scan length is longer than any buffer, so it yields no scans.
        self.data
            .chunks_exact(units_per_scan.get().saturating_mul(self.channels).max(1))
    }

    pub fn summary(&self, units_per_scan: NonZeroUsize) -> SpectraSummary {
        SpectraSummary {
            units: self.len(),
            channels: self.channels,
            scans: self.len() / units_per_scan.get(),
            invalid_units: self.valid.iter().filter(|valid| !**valid).count(),
            first_time: self.times.first().copied(),
            last_time: self.times.last().copied(),
            first_frame_index: self.frame_indices.first().copied(),
            last_frame_index: self.frame_indices.last().copied(),
        }
    }
}

/// Shape and coordinate range of a [Spectra].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpectraSummary {
    pub units: usize,
    pub channels: usize,
    pub scans: usize,
    pub invalid_units: usize,
    pub first_time: Option<DateTime<Utc>>,
    pub last_time: Option<DateTime<Utc>>,
    pub first_frame_index: Option<u32>,
    pub last_frame_index: Option<u32>,
}

/// Reads every unit of `reader` into a [Spectra].
pub fn read_spectra<R: Read>(reader: R, layout: UnitLayout) -> Result<Spectra, SpectraError> {
    read_spectra_with_capacity(reader, layout, 0)
}

fn read_spectra_with_capacity<R: Read>(
    reader: R,
    layout: UnitLayout,
    rows: usize,
) -> Result<Spectra, SpectraError> {
    let mut spectra = Spectra::with_capacity(layout.channels(), rows);
    for unit in UnitReader::new(reader, layout)? {
        spectra.push_unit(&unit?)?;
    }

    Ok(spectra)
}

/// Walks the file at `path` unit by unit and assembles its spectra.
pub fn get_spectra(path: &Path, layout: UnitLayout) -> Result<Spectra, SpectraError> {
    let open_error = |source: std::io::Error| SpectraError::Open {
        path: path.to_path_buf(),
        source,
    };
    layout.validate()?;

    let file = File::open(path).map_err(open_error)?;
    let file_len = file.metadata().map_err(open_error)?.len();
    let unit_bytes = layout.unit_bytes().unwrap_or(usize::MAX).max(1);
    let expected_units = usize::try_from(file_len).unwrap_or(0) / unit_bytes;

    tracing::debug!(path = %path.display(), expected_units, "reading spectra");

    let spectra = read_spectra_with_capacity(BufReader::new(file), layout, expected_units)?;

    tracing::debug!(
        path = %path.display(),
        units = spectra.len(),
        channels = spectra.channels(),
        "read spectra"
    );

    Ok(spectra)
}
