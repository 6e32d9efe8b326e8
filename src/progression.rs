//! Step-size policies: what fraction of the drift gap one tick may close.
//!
//! A progression maps elapsed seconds since the previous tick to a step
//! fraction. Longer gaps earn larger steps, but every policy saturates well
//! below 1.0 so a single tick never attempts to close the entire gap — that
//! guards against over-trading on noisy prices and against runaway trades
//! after a long outage.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Default daily step fraction.
pub const DEFAULT_STEP: f64 = 0.03;
/// Default saturation cap.
pub const DEFAULT_CAP: f64 = 0.5;

/// A time-decayed step-size policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Progression {
    /// `min(cap, step * elapsed_days)` — the step grows linearly with the
    /// gap since the last tick and saturates at `cap`.
    CappedDaily { step: f64, cap: f64 },
    /// A constant fraction, independent of elapsed time. Useful for
    /// backtests that tick on a fixed schedule.
    Fixed { fraction: f64 },
}

impl Progression {
    /// Capped daily progression with validated parameters.
    ///
    /// Both `step` and `cap` must lie in `(0, 1]`.
    pub fn capped_daily(step: f64, cap: f64) -> Result<Self> {
        if !(step > 0.0 && step <= 1.0) {
            return Err(Error::Validation(format!(
                "expected 0.0 < step <= 1.0, got {step}"
            )));
        }
        if !(cap > 0.0 && cap <= 1.0) {
            return Err(Error::Validation(format!(
                "expected 0.0 < cap <= 1.0, got {cap}"
            )));
        }
        Ok(Self::CappedDaily { step, cap })
    }

    /// Fixed progression with a validated fraction in `(0, 1]`.
    pub fn fixed(fraction: f64) -> Result<Self> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(Error::Validation(format!(
                "expected 0.0 < fraction <= 1.0, got {fraction}"
            )));
        }
        Ok(Self::Fixed { fraction })
    }

    /// Step fraction for a tick after `gap_seconds` of elapsed time.
    pub fn step_fraction(&self, gap_seconds: f64) -> f64 {
        match *self {
            Self::CappedDaily { step, cap } => {
                let days = gap_seconds / SECONDS_PER_DAY;
                (step * days).min(cap)
            }
            Self::Fixed { fraction } => fraction,
        }
    }

    /// Re-check parameter ranges.
    ///
    /// Serde deserialization bypasses the constructors, so configs loaded
    /// from disk are validated through here.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::CappedDaily { step, cap } => Self::capped_daily(step, cap).map(|_| ()),
            Self::Fixed { fraction } => Self::fixed(fraction).map(|_| ()),
        }
    }
}

impl Default for Progression {
    fn default() -> Self {
        Self::CappedDaily {
            step: DEFAULT_STEP,
            cap: DEFAULT_CAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_gap_zero_step() {
        let p = Progression::default();
        assert_eq!(p.step_fraction(0.0), 0.0);
    }

    #[test]
    fn one_day_equals_step() {
        let p = Progression::capped_daily(0.03, 0.5).unwrap();
        let step = p.step_fraction(SECONDS_PER_DAY);
        assert!((step - 0.03).abs() < 1e-12);
    }

    #[test]
    fn saturates_at_cap() {
        let p = Progression::capped_daily(0.03, 0.5).unwrap();
        // 0.03/day reaches the 0.5 cap after ~16.7 days
        assert_eq!(p.step_fraction(30.0 * SECONDS_PER_DAY), 0.5);
        assert_eq!(p.step_fraction(1e12), 0.5);
    }

    #[test]
    fn monotone_in_gap() {
        let p = Progression::default();
        let mut prev = 0.0;
        for hours in 0..1000 {
            let step = p.step_fraction(hours as f64 * 3600.0);
            assert!(step >= prev, "not monotone at {hours}h");
            prev = step;
        }
    }

    #[test]
    fn rejects_out_of_range_params() {
        assert!(Progression::capped_daily(0.0, 0.5).is_err());
        assert!(Progression::capped_daily(-0.1, 0.5).is_err());
        assert!(Progression::capped_daily(1.5, 0.5).is_err());
        assert!(Progression::capped_daily(0.03, 0.0).is_err());
        assert!(Progression::capped_daily(0.03, 1.1).is_err());
        assert!(Progression::fixed(0.0).is_err());
        assert!(Progression::fixed(2.0).is_err());
    }

    #[test]
    fn fixed_ignores_gap() {
        let p = Progression::fixed(0.1).unwrap();
        assert_eq!(p.step_fraction(0.0), 0.1);
        assert_eq!(p.step_fraction(1e9), 0.1);
    }

    #[test]
    fn validate_catches_hand_built_values() {
        let bad = Progression::Fixed { fraction: 3.0 };
        assert!(bad.validate().is_err());
        let good = Progression::Fixed { fraction: 0.25 };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn serde_roundtrip() {
        let p = Progression::capped_daily(0.05, 0.4).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        let back: Progression = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
