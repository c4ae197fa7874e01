//! Simulation time model.
//!
//! Two clocks coexist:
//!
//! - [`Tick`]: the integer step counter.  One tick is
//!   `tick_duration_secs` of simulated time (10 s by default).
//! - [`TimeOfDay`]: seconds since midnight of the simulated day.  Schedule
//!   rules ("leave at 07:30", "stay 45 min") and the hazard trigger are
//!   expressed in this unit.
//!
//! [`SimClock`] maps the first onto the second:
//!
//! ```text
//! now = start + current_tick * tick_duration_secs
//! ```
//!
//! Runs cover a single day; `TimeOfDay` values past 24:00 simply keep
//! counting and never wrap.

use std::fmt;

use crate::CoreError;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    #[inline]
    pub fn is_multiple_of(self, n: u64) -> bool {
        n != 0 && self.0 % n == 0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TimeOfDay ─────────────────────────────────────────────────────────────────

/// Seconds since midnight of the simulated day.
///
/// Fractional seconds are kept: schedule jitter is Gaussian and travel times
/// are distance / speed, neither of which lands on whole seconds.
///
/// With the `serde` feature the value (de)serializes as an `"HH:MM[:SS]"`
/// string so scenario files stay human-readable.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct TimeOfDay(pub f64);

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0.0);
    /// Later than any clock reading.  Leave time of a terminal activity.
    pub const NEVER: TimeOfDay = TimeOfDay(f64::INFINITY);

    pub fn hms(hours: u32, minutes: u32, seconds: u32) -> Self {
        TimeOfDay(f64::from(hours * 3_600 + minutes * 60 + seconds))
    }

    pub fn hm(hours: u32, minutes: u32) -> Self {
        Self::hms(hours, minutes, 0)
    }

    #[inline]
    pub fn secs(self) -> f64 {
        self.0
    }

    /// `self + secs`.
    #[inline]
    pub fn plus(self, secs: f64) -> TimeOfDay {
        TimeOfDay(self.0 + secs)
    }

    /// Signed seconds from `earlier` to `self`.
    #[inline]
    pub fn since(self, earlier: TimeOfDay) -> f64 {
        self.0 - earlier.0
    }

    /// Parse `"HH:MM"` or `"HH:MM:SS"`.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let bad = || CoreError::InvalidTime(s.to_string());
        let mut parts = s.trim().split(':');
        let mut field = |max: u32| -> Result<Option<u32>, CoreError> {
            match parts.next() {
                None => Ok(None),
                Some(p) => {
                    let v: u32 = p.parse().map_err(|_| bad())?;
                    if v >= max { Err(bad()) } else { Ok(Some(v)) }
                }
            }
        };
        let h = field(48)?.ok_or_else(bad)?;
        let m = field(60)?.ok_or_else(bad)?;
        let sec = field(60)?.unwrap_or(0);
        if parts.next().is_some() {
            return Err(bad());
        }
        Ok(Self::hms(h, m, sec))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, CoreError> {
        TimeOfDay::parse(&s)
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> String {
        t.to_string()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.max(0.0).round() as u64;
        let (h, m, s) = (total / 3_600, (total % 3_600) / 60, total % 60);
        if s == 0 {
            write!(f, "{h:02}:{m:02}")
        } else {
            write!(f, "{h:02}:{m:02}:{s:02}")
        }
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Maps ticks onto the simulated time of day.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Time of day at tick 0.
    pub start: TimeOfDay,
    /// Simulated seconds per tick.
    pub tick_duration_secs: u32,
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(start: TimeOfDay, tick_duration_secs: u32) -> Self {
        Self { start, tick_duration_secs, current_tick: Tick::ZERO }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.current_tick.0 as f64 * f64::from(self.tick_duration_secs)
    }

    /// Simulated time of day at `current_tick`.
    #[inline]
    pub fn now(&self) -> TimeOfDay {
        self.start.plus(self.elapsed_secs())
    }

    /// Seconds covered by one tick, as the movement budget.
    #[inline]
    pub fn tick_secs(&self) -> f64 {
        f64::from(self.tick_duration_secs)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.current_tick, self.now())
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-level timing and seeding.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    /// Simulated time of day at tick 0.
    pub start: TimeOfDay,

    /// Seconds per tick.  Default: 10.
    pub tick_duration_secs: u32,

    /// Number of ticks `Model::run` executes.
    pub total_ticks: u64,

    /// Master RNG seed.  A fixed seed reproduces a run exactly, including the
    /// per-tick activation order.
    pub seed: u64,
}

impl SimConfig {
    pub const DEFAULT_TICK_SECS: u32 = 10;

    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.start, self.tick_duration_secs)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            start:              TimeOfDay::hm(8, 0),
            tick_duration_secs: Self::DEFAULT_TICK_SECS,
            total_ticks:        0,
            seed:               0,
        }
    }
}
