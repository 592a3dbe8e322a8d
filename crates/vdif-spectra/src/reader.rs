//! Unit-by-unit reading of correlator files.
//!
//! A unit is a VDIF header, a correlator head block that is skipped, and a
//! block of interleaved real/imaginary 16-bit correlator samples, all
//! little-endian.

use std::io::{self, ErrorKind, Read};

use byteorder::{ByteOrder, LittleEndian};
use num_complex::Complex;
use vdif::{VdifHeader, bits};

use crate::{error::SpectraError, layout::UnitLayout};

/// One decoded unit of a correlator file.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// Position of the unit in the stream, from 0.
    pub index: usize,
    pub header: VdifHeader,
    pub spectrum: Vec<Complex<f64>>,
}

/// Pairs consecutive (real, imaginary) samples into complex values.
///
/// A trailing unpaired sample is dropped.
pub fn correlator_spectrum(samples: &[i16]) -> Vec<Complex<f64>> {
    samples
        .chunks_exact(2)
        .map(|pair| Complex::new(f64::from(pair[0]), f64::from(pair[1])))
        .collect()
}

/// Iterator over the units of a stream.
///
/// Iteration stops at the end of the stream, at the first error, or at a
/// trailing partial unit, which is logged and skipped.
pub struct UnitReader<R> {
    reader: R,
    layout: UnitLayout,
    next_index: usize,
    trailing_bytes: usize,
    done: bool,
}

impl<R: Read> UnitReader<R> {
    pub fn new(reader: R, layout: UnitLayout) -> Result<Self, SpectraError> {
        layout.validate()?;

        Ok(Self {
            reader,
            layout,
            next_index: 0,
            trailing_bytes: 0,
            done: false,
        })
    }

    pub fn layout(&self) -> &UnitLayout {
        &self.layout
    }

    /// Bytes of an incomplete final unit, once iteration has reached it.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing_bytes
    }

    /// Reads the next unit, `Ok(None)` at the end of the stream.
    pub fn read_unit(&mut self) -> Result<Option<Unit>, SpectraError> {
        if self.done {
            return Ok(None);
        }

        let index = self.next_index;
        let io_error = |source: io::Error| SpectraError::Io {
            unit: index,
            source,
        };

        let mut first = [0u8; 4];
        let read = read_full(&mut self.reader, &mut first).map_err(io_error)?;
        if read < first.len() {
            return Ok(self.finish(read));
        }

        let word0 = LittleEndian::read_u32(&first);
        let header_words = if self.layout.detect_legacy && bits::is_legacy_word(word0) {
            4
        } else {
            self.layout.header_words
        };

        // Legacy units are never larger than the standard unit `validate` sized.
        let unit_len = self
            .layout
            .unit_bytes_with(header_words)
            .ok_or_else(|| SpectraError::InvalidLayout {
                reason: "unit size does not fit in memory addressing".to_string(),
            })?;
        let rest_len = unit_len - first.len();
        let mut rest = vec![0u8; rest_len];
        let read = read_full(&mut self.reader, &mut rest).map_err(io_error)?;
        if read < rest_len {
            return Ok(self.finish(first.len() + read));
        }

        let mut words = vec![0u32; header_words];
        words[0] = word0;
        let header_end = (header_words - 1) * 4;
        LittleEndian::read_u32_into(&rest[..header_end], &mut words[1..]);

        let header = VdifHeader::from_words(&words).map_err(|source| SpectraError::Header {
            unit: index,
            source,
        })?;

        // The correlator head has no parser; skip it.
        let data_start = header_end + self.layout.corr_head_words * 4;
        let mut samples = vec![0i16; self.layout.corr_data_samples];
        LittleEndian::read_i16_into(&rest[data_start..], &mut samples);

        tracing::trace!(
            unit = index,
            frame_index = header.frame_index(),
            legacy = header.is_legacy(),
            "read unit"
        );

        self.next_index += 1;
        Ok(Some(Unit {
            index,
            header,
            spectrum: correlator_spectrum(&samples),
        }))
    }

    fn finish(&mut self, trailing_bytes: usize) -> Option<Unit> {
        self.done = true;
        self.trailing_bytes = trailing_bytes;
        if trailing_bytes > 0 {
            tracing::warn!(
                units = self.next_index,
                trailing_bytes,
                "ignoring incomplete unit at end of stream"
            );
        }
        None
    }
}

impl<R: Read> Iterator for UnitReader<R> {
    type Item = Result<Unit, SpectraError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_unit() {
            Ok(unit) => unit.map(Ok),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Fills `buf` until it is full or the stream ends. Returns the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }

    Ok(filled)
}
