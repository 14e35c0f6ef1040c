//! Compact range representation for allocated sub-task ids
//!
//! The job store allocates sub-task ids as a monotonically increasing block
//! per submitted graph, so only the endpoints are kept. Containment is a
//! superset test over `[low, high]`, not exact membership: `encode` does not
//! verify that the allocated set is actually contiguous, and gaps are not
//! detected.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("job store allocated no sub-task ids")]
    EmptyAllocation,
    #[error("task range bounds are inverted: {low} > {high}")]
    Inverted { low: u64, high: u64 },
    #[error("can't parse a task range from {0:?}")]
    Unparseable(String),
}

/// A closed, inclusive, contiguous span of sub-task ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskRange {
    low: u64,
    high: u64,
}

impl TaskRange {
    pub fn new(low: u64, high: u64) -> Result<TaskRange, RangeError> {
        if low > high {
            return Err(RangeError::Inverted { low, high });
        }
        Ok(TaskRange { low, high })
    }

    /// Compress an allocated id set down to its endpoints
    pub fn encode(ids: &BTreeSet<u64>) -> Result<TaskRange, RangeError> {
        let (Some(&low), Some(&high)) = (ids.iter().next(), ids.iter().next_back()) else {
            return Err(RangeError::EmptyAllocation);
        };
        Ok(TaskRange { low, high })
    }

    pub fn low(&self) -> u64 {
        self.low
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    /// Number of sub-task ids the span covers; never zero
    pub fn len(&self) -> u64 {
        self.high - self.low + 1
    }

    pub fn contains(&self, id: u64) -> bool {
        self.low <= id && id <= self.high
    }
}

/// The `"<low>-<high>"` string form consumed by the reconciliation tooling;
/// must round-trip losslessly through [FromStr]
impl fmt::Display for TaskRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

impl FromStr for TaskRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparseable = || RangeError::Unparseable(s.to_string());
        let (low, high) = s.split_once('-').ok_or_else(unparseable)?;
        let low: u64 = low.parse().map_err(|_| unparseable())?;
        let high: u64 = high.parse().map_err(|_| unparseable())?;
        TaskRange::new(low, high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u64]) -> BTreeSet<u64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn encode_covers_every_id_between_min_and_max() {
        let range = TaskRange::encode(&set(&[104, 100, 102])).unwrap();
        assert_eq!(range.low(), 100);
        assert_eq!(range.high(), 104);
        for id in 100..=104 {
            assert!(range.contains(id));
        }
        assert!(!range.contains(99));
        assert!(!range.contains(105));
    }

    #[test]
    fn encode_of_empty_set_fails() {
        assert_eq!(
            TaskRange::encode(&BTreeSet::new()),
            Err(RangeError::EmptyAllocation)
        );
    }

    #[test]
    fn containment_is_a_superset_test() {
        // gaps in the allocated set are not detected
        let range = TaskRange::encode(&set(&[100, 104])).unwrap();
        assert!(range.contains(102));
        assert_eq!(range.len(), 5);
    }

    #[test]
    fn single_id_allocation() {
        let range = TaskRange::encode(&set(&[42])).unwrap();
        assert_eq!((range.low(), range.high()), (42, 42));
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn string_form_round_trips() {
        let range = TaskRange::new(100, 104).unwrap();
        let printed = range.to_string();
        assert_eq!(printed, "100-104");
        assert_eq!(printed.parse::<TaskRange>().unwrap(), range);
    }

    #[test]
    fn malformed_strings_are_rejected() {
        assert!(matches!(
            "100".parse::<TaskRange>(),
            Err(RangeError::Unparseable(_))
        ));
        assert!(matches!(
            "a-b".parse::<TaskRange>(),
            Err(RangeError::Unparseable(_))
        ));
        assert_eq!(
            "104-100".parse::<TaskRange>(),
            Err(RangeError::Inverted { low: 104, high: 100 })
        );
    }
}
