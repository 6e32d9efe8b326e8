//! Observation records: the telemetry side of a tick.
//!
//! `tick_read` produces one [`Observation`] per call. It is purely
//! informational — nothing in the decision path consumes it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::Symbol;

/// A point-in-time reading of portfolio state against the running
/// equilibrium. Per-symbol rows are sorted by symbol.
#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub time: DateTime<Utc>,
    /// Quantity of the base funding asset.
    pub principal: f64,
    /// Total portfolio worth.
    pub worth: f64,
    /// Cash as a percentage of worth.
    pub cash_pct: f64,
    pub symbols: Vec<SymbolObservation>,
}

/// One symbol's row in an observation.
#[derive(Debug, Clone, Serialize)]
pub struct SymbolObservation {
    pub symbol: Symbol,
    pub price: f64,
    pub quantity: f64,
    pub unit_cost: f64,
    /// Position worth as a percentage of total worth.
    pub pct_worth: f64,
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} worth {:.2} | principal {:.2} | cash {:.1}%",
            self.time.format("%Y-%m-%d %H:%M:%S"),
            self.worth,
            self.principal,
            self.cash_pct,
        )?;
        for row in &self.symbols {
            writeln!(
                f,
                "  {:10} P {:>12.4}  Q {:>12.6}  C {:>12.4}  {:>5.1}%",
                row.symbol, row.price, row.quantity, row.unit_cost, row.pct_worth,
            )?;
        }
        Ok(())
    }
}
