//! Acknowledgement range lists.
//!
//! ```text
//! u16 count
//! count x { bool single, triad min, [triad max if !single] }
//! ```

use std::fmt;

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use super::{BoolField, Field, NumericField, TriadField, UnsignedShortField, check_range};
use crate::{consts::RANGE_MIN_SPAN, cursor::ByteCursor, errors::Result};

/// Inclusive range of datagram sequence numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    /// First sequence number
    pub min_index: u32,
    /// Last sequence number, inclusive
    pub max_index: u32,
}

impl Range {
    /// Range covering `min_index..=max_index`.
    #[must_use]
    pub const fn new(min_index: u32, max_index: u32) -> Self {
        Self { min_index, max_index }
    }

    /// Range covering one sequence number.
    #[must_use]
    pub const fn single(index: u32) -> Self {
        Self::new(index, index)
    }

    /// Whether the range is encoded in its compact single-index form.
    #[must_use]
    pub const fn is_single(&self) -> bool {
        self.min_index == self.max_index
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min_index, self.max_index)
    }
}

/// Count-prefixed list of [`Range`]s.
///
/// # Invariants
///
/// - A decoded non-single range spans at least [`RANGE_MIN_SPAN`]: a wire
///   maximum below `min + RANGE_MIN_SPAN` is raised to it. Encoding writes
///   the maximum as given, so a narrower range does not round-trip.
/// - Encoding validates every index before writing anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RangeListField;

impl Field for RangeListField {
    type Value = Vec<Range>;

    fn decode(&self, cursor: &mut ByteCursor<'_>) -> Result<Vec<Range>> {
        let count = UnsignedShortField.decode(cursor)?;
        let mut ranges = Vec::with_capacity(usize::from(count).min(cursor.remaining() / 4));

        for _ in 0..count {
            let single = BoolField.decode(cursor)?;
            let min_index = TriadField.decode(cursor)?;
            let max_index = if single {
                min_index
            } else {
                TriadField.decode(cursor)?.max(min_index + RANGE_MIN_SPAN)
            };
            ranges.push(Range { min_index, max_index });
        }

        Ok(ranges)
    }

    fn encode(&self, value: &Vec<Range>, dst: &mut impl BufMut) -> Result<()> {
        check_range(value.len() as i128, UnsignedShortField::MIN, UnsignedShortField::MAX)?;
        for range in value {
            check_range(i128::from(range.min_index), TriadField::MIN, TriadField::MAX)?;
            check_range(i128::from(range.max_index), TriadField::MIN, TriadField::MAX)?;
        }

        UnsignedShortField.encode_wide(value.len() as i128, dst)?;
        for range in value {
            BoolField.encode(&range.is_single(), dst)?;
            TriadField.encode(&range.min_index, dst)?;
            if !range.is_single() {
                TriadField.encode(&range.max_index, dst)?;
            }
        }
        Ok(())
    }
}
