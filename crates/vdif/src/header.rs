//! Decoded VDIF frame headers and the quantities derived from them.
//!
//! A [VdifHeader] is built once from a 4-word (legacy) or 8-word (standard)
//! sequence. All fields are decoded at construction through the VDIF
//! [Layout](crate::layout::Layout); accessors never re-read the words.
//!
//! ```
//! use vdif::header::{StationId, VdifHeader};
//!
//! let words = [
//!     14363767, 469762048, 536871541, 67239932, 58720272, 2896953069, 859832320, 4060288387,
//! ];
//! let header = VdifHeader::from_words(&words).unwrap();
//! assert_eq!(header.frame_length_bytes(), 5032);
//! assert_eq!(header.payload_length_bytes(), 5000);
//! assert_eq!(header.bits_per_sample(), 2);
//! assert_eq!(header.num_samples(), 20000);
//! assert_eq!(header.station_id(), StationId::Numeric(0xFFFC));
//! ```

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::{
    bits,
    errors::ReadError,
    layout::{self, Layout},
};

/// Lowest upper-byte value read as an ASCII station code.
const STATION_CODE_MIN: u16 = 48;
/// Highest upper-byte value read as an ASCII station code (inclusive).
const STATION_CODE_MAX: u16 = 128;

/// Raw header fields, one member per entry of [layout::VDIF_FIELDS].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawFields {
    /// Seconds since the reference epoch.
    pub seconds: u32,
    pub legacy_flag: bool,
    pub invalid_flag: bool,
    /// Frame number within the current second.
    pub frame_index: u32,
    /// Six-month periods since 2000-01-01.
    pub ref_epoch: u8,
    /// Frame length in units of 8 bytes, header included.
    pub frame_length: u32,
    pub log2_num_ch: u8,
    pub version: u8,
    pub station_id: u16,
    pub thread_id: u16,
    /// Bits per sample minus one.
    pub bits_per_sample: u8,
    pub complex_flag: bool,
}

impl TryFrom<&BTreeMap<String, u64>> for RawFields {
    type Error = ReadError;

    fn try_from(values: &BTreeMap<String, u64>) -> Result<Self, Self::Error> {
        let log2_num_ch: u8 = narrow(values, "log2_num_ch")?;
        if log2_num_ch > 31 {
            return Err(ReadError::LayoutMismatch {
                name: "log2_num_ch".to_string(),
            });
        }

        Ok(RawFields {
            seconds: narrow(values, "seconds")?,
            legacy_flag: flag(values, "legacy_flag")?,
            invalid_flag: flag(values, "invalid_flag")?,
            frame_index: narrow(values, "frame_index")?,
            ref_epoch: narrow(values, "ref_epoch")?,
            frame_length: narrow(values, "frame_length")?,
            log2_num_ch,
            version: narrow(values, "version")?,
            station_id: narrow(values, "station_id")?,
            thread_id: narrow(values, "thread_id")?,
            bits_per_sample: narrow(values, "bits_per_sample")?,
            complex_flag: flag(values, "complex_flag")?,
        })
    }
}

fn narrow<T: TryFrom<u64>>(values: &BTreeMap<String, u64>, name: &str) -> Result<T, ReadError> {
    values
        .get(name)
        .and_then(|&value| T::try_from(value).ok())
        .ok_or_else(|| ReadError::LayoutMismatch {
            name: name.to_string(),
        })
}

fn flag(values: &BTreeMap<String, u64>, name: &str) -> Result<bool, ReadError> {
    match values.get(name) {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(ReadError::LayoutMismatch {
            name: name.to_string(),
        }),
    }
}

/// Identifier of the station a frame came from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum StationId {
    /// Two-character code, upper byte first.
    Code(String),
    /// Numeric station id.
    Numeric(u16),
}

impl StationId {
    /// Reads the raw 16-bit field as a two-character code when its upper byte
    /// is in 48..=128, and as a number otherwise.
    pub fn from_raw(raw: u16) -> Self {
        let upper = raw >> 8;
        if (STATION_CODE_MIN..=STATION_CODE_MAX).contains(&upper) {
            let [hi, lo] = raw.to_be_bytes();
            StationId::Code([char::from(hi), char::from(lo)].iter().collect())
        } else {
            StationId::Numeric(raw)
        }
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationId::Code(code) => f.write_str(code),
            StationId::Numeric(id) => write!(f, "{id}"),
        }
    }
}

/// A decoded VDIF frame header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VdifHeader {
    words: Vec<u32>,
    raw: RawFields,
}

impl VdifHeader {
    /// Decodes a 4- or 8-word header with the built-in VDIF layout.
    pub fn from_words(words: &[u32]) -> Result<Self, ReadError> {
        Self::decode_with(layout::vdif(), words)
    }

    /// Decodes a header with a caller-supplied layout that names every VDIF field.
    pub fn decode_with(layout: &Layout, words: &[u32]) -> Result<Self, ReadError> {
        let values = layout.decode(words)?;
        let raw = RawFields::try_from(&values)?;

        tracing::trace!(
            words = words.len(),
            seconds = raw.seconds,
            frame_index = raw.frame_index,
            "decoded VDIF header"
        );

        Ok(VdifHeader {
            words: words.to_vec(),
            raw,
        })
    }

    /// Decodes a 16- or 32-byte little-endian header block.
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, ReadError> {
        if bytes.len() != 16 && bytes.len() != 32 {
            return Err(ReadError::UnalignedBytes(bytes.len()));
        }

        Self::from_words(&bits::words_from_le_bytes(bytes))
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Raw decoded fields, before any derivation.
    pub fn raw(&self) -> &RawFields {
        &self.raw
    }

    pub fn seconds(&self) -> u32 {
        self.raw.seconds
    }

    pub fn frame_index(&self) -> u32 {
        self.raw.frame_index
    }

    pub fn ref_epoch(&self) -> u8 {
        self.raw.ref_epoch
    }

    pub fn version(&self) -> u8 {
        self.raw.version
    }

    pub fn thread_id(&self) -> u16 {
        self.raw.thread_id
    }

    pub fn station_id(&self) -> StationId {
        StationId::from_raw(self.raw.station_id)
    }

    /// Bits per sample, 1..=32.
    pub fn bits_per_sample(&self) -> u32 {
        u32::from(self.raw.bits_per_sample) + 1
    }

    /// Whole frame length in bytes, header included.
    pub fn frame_length_bytes(&self) -> u64 {
        u64::from(self.raw.frame_length) * 8
    }

    pub fn header_length_bytes(&self) -> u64 {
        self.words.len() as u64 * 4
    }

    /// Frame length minus header length. Negative when the frame length
    /// field is smaller than the header itself.
    pub fn payload_length_bytes(&self) -> i64 {
        self.frame_length_bytes() as i64 - self.header_length_bytes() as i64
    }

    pub fn num_channels(&self) -> u64 {
        1u64 << self.raw.log2_num_ch
    }

    /// Samples per channel in the payload.
    ///
    /// Uses flooring integer division at every step, so configurations that
    /// do not pack evenly into 32-bit words lose the remainder.
    pub fn num_samples(&self) -> i64 {
        let per_value = if self.is_complex() { 2 } else { 1 };
        let values_per_word = 32 / i64::from(self.bits_per_sample()) / per_value;
        let payload_words = self.payload_length_bytes().div_euclid(4);

        let values = payload_words * values_per_word;
        values.div_euclid(self.num_channels() as i64)
    }

    pub fn is_legacy(&self) -> bool {
        self.raw.legacy_flag
    }

    pub fn is_complex(&self) -> bool {
        self.raw.complex_flag
    }

    /// Raw invalid-data bit; set means the frame must not be used.
    pub fn invalid_flag(&self) -> bool {
        self.raw.invalid_flag
    }

    /// True when the invalid-data bit is clear.
    pub fn is_valid(&self) -> bool {
        !self.raw.invalid_flag
    }

    /// Start of the reference epoch: 2000-01-01 plus six months per epoch.
    pub fn ref_epoch_start(&self) -> Option<DateTime<Utc>> {
        let epoch = i32::from(self.raw.ref_epoch);
        let month = if epoch % 2 == 0 { 1 } else { 7 };

        NaiveDate::from_ymd_opt(2000 + epoch / 2, month, 1)?
            .and_hms_opt(0, 0, 0)
            .map(|start| start.and_utc())
    }

    /// Frame time to whole-second precision.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        let offset = TimeDelta::try_seconds(i64::from(self.raw.seconds))?;
        self.ref_epoch_start()?.checked_add_signed(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: [u32; 8] = [
        14363767, 469762048, 536871541, 67239932, 58720272, 2896953069, 859832320, 4060288387,
    ];

    fn with_word(index: usize, word: u32) -> [u32; 8] {
        let mut words = WORDS;
        words[index] = word;
        words
    }

    fn header_word3(station_id: u16, thread_id: u16, bits_raw: u32, complex: bool) -> u32 {
        u32::from(station_id)
            | (u32::from(thread_id) << 16)
            | (bits_raw << 26)
            | (u32::from(complex) << 31)
    }

    fn header_word2(frame_length: u32, log2_num_ch: u32, version: u32) -> u32 {
        frame_length | (log2_num_ch << 24) | (version << 29)
    }

    #[test]
    fn test_reference_words() {
        let header = VdifHeader::from_words(&WORDS).unwrap();
        assert_eq!(header.seconds(), 14363767);
        assert_eq!(header.frame_index(), 0);
        assert_eq!(header.ref_epoch(), 28);
        assert_eq!(header.version(), 1);
        assert_eq!(header.thread_id(), 1);
        assert_eq!(header.bits_per_sample(), 2);
        assert_eq!(header.num_channels(), 1);
        assert_eq!(header.frame_length_bytes(), 5032);
        assert_eq!(header.header_length_bytes(), 32);
        assert_eq!(header.payload_length_bytes(), 5000);
        assert_eq!(header.num_samples(), 20000);
        assert_eq!(header.station_id(), StationId::Numeric(0xFFFC));
        assert!(!header.is_legacy());
        assert!(!header.is_complex());
        assert!(header.is_valid());
    }

    #[test]
    fn test_legacy_length_payload() {
        let header = VdifHeader::from_words(&WORDS[..4]).unwrap();
        assert_eq!(header.word_count(), 4);
        assert_eq!(header.payload_length_bytes(), 5016);
        assert_eq!(header.num_samples(), 1254 * 16);
    }

    #[test]
    fn test_too_few_words() {
        assert_eq!(
            VdifHeader::from_words(&WORDS[..2]).unwrap_err(),
            ReadError::OutOfBounds {
                word_index: 3,
                len: 2
            }
        );
    }

    #[test]
    fn test_bits_per_sample() {
        for raw in 0..32 {
            let words = with_word(3, header_word3(0, 0, raw, false));
            let header = VdifHeader::from_words(&words).unwrap();
            assert_eq!(header.raw().bits_per_sample as u32, raw);
            assert_eq!(header.bits_per_sample(), raw + 1);
        }
    }

    #[test]
    fn test_num_channels() {
        for log2 in 0..32 {
            let words = with_word(2, header_word2(629, log2, 1));
            let header = VdifHeader::from_words(&words).unwrap();
            assert_eq!(header.num_channels(), 1u64 << log2);
        }
    }

    #[test]
    fn test_frame_and_payload_length() {
        let words = with_word(2, header_word2(0xFF_FFFF, 0, 0));
        let header = VdifHeader::from_words(&words).unwrap();
        assert_eq!(header.frame_length_bytes(), 0xFF_FFFF * 8);
        assert_eq!(header.payload_length_bytes(), 0xFF_FFFF * 8 - 32);
    }

    #[test]
    fn test_num_samples_truncates() {
        let mut words = WORDS;
        // 40-byte frame, 8-byte payload: two words of five 3-bit complex values over 4 channels.
        words[2] = header_word2(5, 2, 0);
        words[3] = header_word3(0, 0, 2, true);
        let header = VdifHeader::from_words(&words).unwrap();
        assert_eq!(header.payload_length_bytes(), 8);
        assert_eq!(header.num_samples(), 2);
    }

    #[test]
    fn test_num_samples_negative_payload_floors() {
        let mut words = WORDS;
        words[2] = header_word2(0, 4, 0);
        words[3] = header_word3(0, 0, 31, false);
        let header = VdifHeader::from_words(&words).unwrap();
        assert_eq!(header.payload_length_bytes(), -32);
        assert_eq!(header.num_samples(), -1);
    }

    #[test]
    fn test_station_id_boundaries() {
        assert_eq!(
            StationId::from_raw(47 << 8 | 65),
            StationId::Numeric(47 << 8 | 65)
        );
        assert_eq!(
            StationId::from_raw(48 << 8 | 65),
            StationId::Code("0A".to_string())
        );
        assert_eq!(
            StationId::from_raw(128 << 8 | 65),
            StationId::Code("\u{80}A".to_string())
        );
        assert_eq!(
            StationId::from_raw(129 << 8 | 65),
            StationId::Numeric(129 << 8 | 65)
        );
    }

    #[test]
    fn test_station_id_code() {
        let words = with_word(3, header_word3(u16::from_be_bytes(*b"Ef"), 0, 1, false));
        let header = VdifHeader::from_words(&words).unwrap();
        assert_eq!(header.station_id(), StationId::Code("Ef".to_string()));
        assert_eq!(header.station_id().to_string(), "Ef");
    }

    #[test]
    fn test_station_id_display_numeric() {
        assert_eq!(StationId::Numeric(12).to_string(), "12");
    }

    #[test]
    fn test_validity_polarity() {
        let words = with_word(0, WORDS[0] | 1 << 31);
        let header = VdifHeader::from_words(&words).unwrap();
        assert!(header.invalid_flag());
        assert!(!header.is_valid());

        let header = VdifHeader::from_words(&WORDS).unwrap();
        assert!(!header.invalid_flag());
        assert!(header.is_valid());
    }

    #[test]
    fn test_legacy_and_complex_flags() {
        let words = with_word(0, WORDS[0] | 1 << 30);
        let header = VdifHeader::from_words(&words[..4]).unwrap();
        assert!(header.is_legacy());
        assert_eq!(header.seconds(), 14363767);

        let words = with_word(3, header_word3(0, 0, 0, true));
        assert!(VdifHeader::from_words(&words).unwrap().is_complex());
    }

    #[test]
    fn test_timestamp() {
        let header = VdifHeader::from_words(&WORDS).unwrap();
        assert_eq!(
            header.ref_epoch_start().unwrap().to_rfc3339(),
            "2014-01-01T00:00:00+00:00"
        );
        assert_eq!(
            header.timestamp().unwrap().to_rfc3339(),
            "2014-06-16T05:56:07+00:00"
        );
    }

    #[test]
    fn test_odd_ref_epoch_starts_in_july() {
        let words = with_word(1, 29 << 24);
        let header = VdifHeader::from_words(&words).unwrap();
        assert_eq!(
            header.ref_epoch_start().unwrap().to_rfc3339(),
            "2014-07-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_from_le_bytes() {
        let bytes: Vec<u8> = WORDS.iter().flat_map(|word| word.to_le_bytes()).collect();
        assert_eq!(
            VdifHeader::from_le_bytes(&bytes).unwrap(),
            VdifHeader::from_words(&WORDS).unwrap()
        );
        let legacy = VdifHeader::from_le_bytes(&bytes[..16]).unwrap();
        assert_eq!(legacy.word_count(), 4);
        assert_eq!(
            VdifHeader::from_le_bytes(&bytes[..20]).unwrap_err(),
            ReadError::UnalignedBytes(20)
        );
    }

    #[test]
    fn test_layout_missing_field() {
        let layout = Layout::compile(&layout::VDIF_FIELDS[..11]).unwrap();
        assert_eq!(
            VdifHeader::decode_with(&layout, &WORDS).unwrap_err(),
            ReadError::LayoutMismatch {
                name: "complex_flag".to_string()
            }
        );
    }
}
