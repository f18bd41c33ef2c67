// A pending booking for a room: stay dates and party size

use crate::error::{ReservationError, Result};
use crate::value_objects::HowMany;
use chrono::{Local, NaiveDate};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Reservation {
    start: NaiveDate,
    end: NaiveDate,
    guests: HowMany,
}

impl Reservation {
    /// Fails with `InvalidArgument` unless `end` is strictly after `start`.
    pub fn new(start: NaiveDate, end: NaiveDate, guests: HowMany) -> Result<Self> {
        if end <= start {
            return Err(ReservationError::InvalidArgument(format!(
                "End date {} must be after start date {}",
                end, start
            )));
        }
        Ok(Self { start, end, guests })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn guests(&self) -> HowMany {
        self.guests
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    // Half-open: the departure day is not part of the stay
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    pub fn is_active(&self) -> bool {
        self.is_active_on(Local::now().date_naive())
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Reservation from {} to {} for {} guest(s)",
            self.start, self.end, self.guests
        )
    }
}
