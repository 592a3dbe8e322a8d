//! Byte builders shared by the unit tests.

use crate::layout::UnitLayout;

pub const WORDS: [u32; 8] = [
    14363767, 469762048, 536871541, 67239932, 58720272, 2896953069, 859832320, 4060288387,
];

/// Header words for frame `frame_index`, `seconds_offset` seconds after [WORDS].
pub fn header_words(frame_index: u32, seconds_offset: u32) -> [u32; 8] {
    let mut words = WORDS;
    words[0] += seconds_offset;
    words[1] = (words[1] & 0xFF00_0000) | frame_index;
    words
}

/// One unit: the given header words, a zeroed correlator head, then `samples`.
pub fn unit_bytes(layout: &UnitLayout, header: &[u32], samples: &[i16]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(layout.unit_bytes_with(header.len()).unwrap_or(0));
    bytes.extend(header.iter().flat_map(|word| word.to_le_bytes()));
    bytes.extend(std::iter::repeat_n(0xAB, layout.corr_head_words * 4));
    bytes.extend(samples.iter().flat_map(|sample| sample.to_le_bytes()));
    bytes
}

/// Correlator samples whose channel `ch` is `(unit + ch, -(ch))`.
pub fn samples(layout: &UnitLayout, unit: i16) -> Vec<i16> {
    (0..layout.channels() as i16)
        .flat_map(|ch| [unit + ch, -ch])
        .collect()
}
