use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    ops::BitOr,
};

/// The days of a week an allocation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DaySet(u8);

impl DaySet {
    pub const MONDAY: Self = DaySet(1 << 0);
    pub const TUESDAY: Self = DaySet(1 << 1);
    pub const WEDNESDAY: Self = DaySet(1 << 2);
    pub const THURSDAY: Self = DaySet(1 << 3);
    pub const FRIDAY: Self = DaySet(1 << 4);
    pub const SATURDAY: Self = DaySet(1 << 5);
    pub const SUNDAY: Self = DaySet(1 << 6);

    pub const WEEKDAYS: Self = DaySet(0b0011111);
    pub const WEEKEND: Self = DaySet(0b1100000);
    pub const ALL: Self = DaySet(0b1111111);
    pub const NONE: Self = DaySet(0);

    /// Single-letter abbreviations, Monday first
    const DAY_CHARS: [char; 7] = ['M', 'T', 'W', 'R', 'F', 'S', 'U'];

    /// Builds a set from one flag per day, Monday first
    pub fn from_flags(flags: [bool; 7]) -> Self {
        flags
            .iter()
            .enumerate()
            .filter(|(_, on)| **on)
            .fold(Self::NONE, |set, (idx, _)| set | DaySet(1 << idx))
    }

    /// One flag per day, Monday first
    pub fn to_flags(self) -> [bool; 7] {
        std::array::from_fn(|idx| self.0 & (1 << idx) != 0)
    }
}

/// Allocations cover the working week unless told otherwise
impl Default for DaySet {
    fn default() -> Self {
        Self::WEEKDAYS
    }
}

impl Display for DaySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let days: String = Self::DAY_CHARS
            .iter()
            .zip(self.to_flags())
            .filter_map(|(c, on)| on.then_some(*c))
            .collect();

        write!(f, "{days}")
    }
}

impl BitOr for DaySet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        DaySet(self.0 | rhs.0)
    }
}
