use crate::error::{ReservationError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A half-open date range `[check_in, check_out)`.
///
/// The check-out day is vacated, so it may be the check-in day of the next
/// stay. Construction guarantees `check_out > check_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self> {
        if check_out <= check_in {
            return Err(ReservationError::InvalidRequest(format!(
                "check-out {check_out} must be after check-in {check_in}"
            )));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn nights(&self) -> u32 {
        // check_out > check_in holds, so the difference is at least one day.
        u32::try_from((self.check_out - self.check_in).num_days()).unwrap_or(u32::MAX)
    }

    pub fn overlaps(&self, other: &StayDates) -> bool {
        overlaps(self.check_in, self.check_out, other.check_in, other.check_out)
    }
}

/// `[a_start, a_end)` and `[b_start, b_end)` overlap iff `a_start < b_end && b_start < a_end`.
pub fn overlaps(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start < b_end && b_start < a_end
}
