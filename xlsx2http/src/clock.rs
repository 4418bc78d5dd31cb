//! Time source used for naming output files

use chrono::{DateTime, Local};
#[cfg(test)]
use chrono::TimeZone;

/// Supplies the current local time
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock frozen at a single instant
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

#[cfg(test)]
impl FixedClock {
    /// Build from local calendar fields; `None` if the time does not exist locally
    pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<Self> {
        Local
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .single()
            .map(FixedClock)
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
