//! Byte layout of one unit: VDIF header, correlator head, correlator data.

use serde::{Deserialize, Serialize};

use crate::error::SpectraError;

/// Sizes of the blocks that make up one unit of a correlator file.
///
/// The defaults describe 1312-byte units: an 8-word VDIF header, a 64-word
/// correlator head and 512 interleaved 16-bit correlator samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitLayout {
    /// Words in a standard VDIF header.
    pub header_words: usize,
    /// Words in the correlator head block, which is skipped.
    pub corr_head_words: usize,
    /// Signed 16-bit samples in the correlator data block, real and imaginary interleaved.
    pub corr_data_samples: usize,
    /// Units integrated into one scan.
    pub units_per_scan: usize,
    /// Read a 4-word header when word 0 carries the legacy flag.
    pub detect_legacy: bool,
}

impl Default for UnitLayout {
    fn default() -> Self {
        Self {
            header_words: 8,
            corr_head_words: 64,
            corr_data_samples: 512,
            units_per_scan: 64,
            detect_legacy: true,
        }
    }
}

impl UnitLayout {
    /// Spectral channels per unit.
    pub fn channels(&self) -> usize {
        self.corr_data_samples / 2
    }

    /// Bytes in a unit with a header of `header_words` words.
    ///
    /// `None` if that does not fit in `usize`.
    pub fn unit_bytes_with(&self, header_words: usize) -> Option<usize> {
        header_words
            .checked_mul(4)?
            .checked_add(self.corr_head_words.checked_mul(4)?)?
            .checked_add(self.corr_data_samples.checked_mul(2)?)
    }

    /// Bytes in a unit with a standard header.
    pub fn unit_bytes(&self) -> Option<usize> {
        self.unit_bytes_with(self.header_words)
    }

    pub fn validate(&self) -> Result<(), SpectraError> {
        let reason = if self.header_words < 4 {
            "a VDIF header has at least 4 words"
        } else if self.corr_data_samples == 0 || self.corr_data_samples % 2 != 0 {
            "correlator data must hold whole real/imaginary pairs"
        } else if self.units_per_scan == 0 {
            "a scan needs at least one unit"
        } else if self.unit_bytes().is_none() {
            "unit size does not fit in memory addressing"
        } else {
            return Ok(());
        };

        Err(SpectraError::InvalidLayout {
            reason: reason.to_string(),
        })
    }
}
