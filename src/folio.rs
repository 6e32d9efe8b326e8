//! Collaborator seams: the portfolio and market the manager drives.
//!
//! The rebalancing core never talks to a broker directly. It consumes the
//! narrow [`Folio`] trait for portfolio state and order submission, and
//! implementations consume [`Market`] for pricing. Live adapters and the
//! in-memory paper backend both sit behind these traits.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;

use crate::types::Symbol;

/// A point in time a query refers to: wall-clock now (live trading) or an
/// externally supplied timestamp (simulated/backtest trading).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeRef {
    Now,
    At(DateTime<Utc>),
}

impl TimeRef {
    /// Resolve to a concrete timestamp.
    pub fn resolve(&self) -> DateTime<Utc> {
        match *self {
            TimeRef::Now => Utc::now(),
            TimeRef::At(t) => t,
        }
    }
}

/// Errors surfaced by portfolio/market collaborators.
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    #[error("no price available for {symbol}")]
    Price { symbol: Symbol },

    #[error("order failed for {symbol}: {reason}")]
    Order { symbol: Symbol, reason: String },

    #[error("portfolio backend unavailable: {0}")]
    Unavailable(String),
}

pub type FolioResult<T> = std::result::Result<T, FolioError>;

/// Snapshot of one held position at a point in time.
///
/// Worth figures are monetary, in units of the folio's cash asset:
/// `worth` at last price, `bid_worth` if liquidated at bid, `ask_worth`
/// if the same quantity were acquired at ask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemState {
    pub quantity: f64,
    pub unit_cost: f64,
    pub worth: f64,
    pub bid_worth: f64,
    pub ask_worth: f64,
}

/// The portfolio collaborator contract.
///
/// A folio owns a cash balance, a set of positions, and its own tick
/// clock. Market orders are amount-denominated (monetary, in the cash
/// asset) rather than share-denominated, so fractional quantities are
/// fine. Execution is not guaranteed: an order may fail or partially
/// fill, and reporting that is the implementation's concern.
pub trait Folio {
    /// Total portfolio worth (cash + positions) at `at`.
    fn worth(&self, at: TimeRef) -> FolioResult<f64>;

    /// Name of the cash asset (e.g. "USD").
    fn cash_name(&self) -> &str;

    /// Worth of the cash balance.
    fn cash_worth(&self) -> FolioResult<f64>;

    /// Quantity of the base funding asset originally committed.
    fn principal_quantity(&self) -> f64;

    /// Snapshot of the position in `symbol`, or `None` if no position
    /// exists. A missing position is not an error.
    fn item(&self, symbol: &Symbol, at: TimeRef) -> FolioResult<Option<ItemState>>;

    /// Last traded/marked price for `symbol`.
    fn price(&self, symbol: &Symbol, at: TimeRef) -> FolioResult<f64>;

    /// Advance the internal tick clock to `at` and return the gap in
    /// seconds since the previous tick. With `commit` false the gap is
    /// reported but the clock is not advanced (live dry runs).
    fn tick(&mut self, at: TimeRef, commit: bool) -> FolioResult<f64>;

    /// Monetary value already committed in open (unfilled) orders,
    /// per symbol. Symbols with no open orders may be absent.
    fn open_order_values(&self) -> FolioResult<FxHashMap<Symbol, f64>>;

    /// Submit a market buy for `amount` of the cash asset.
    fn market_buy(&mut self, symbol: &Symbol, amount: f64, at: TimeRef) -> FolioResult<()>;

    /// Submit a market sell for `amount` of the cash asset.
    fn market_sell(&mut self, symbol: &Symbol, amount: f64, at: TimeRef) -> FolioResult<()>;

    /// Timestamp of the last committed tick, if any.
    fn last_tick_time(&self) -> Option<DateTime<Utc>>;
}

/// Pricing source consumed by folio implementations.
pub trait Market {
    /// Last traded price.
    fn last(&self, symbol: &Symbol, at: TimeRef) -> FolioResult<f64>;

    /// Best bid (what a sell would fetch).
    fn bid(&self, symbol: &Symbol, at: TimeRef) -> FolioResult<f64>;

    /// Best ask (what a buy would pay).
    fn ask(&self, symbol: &Symbol, at: TimeRef) -> FolioResult<f64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn time_ref_at_resolves_to_given_instant() {
        let t = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(TimeRef::At(t).resolve(), t);
    }

    #[test]
    fn time_ref_now_is_current() {
        let before = Utc::now();
        let resolved = TimeRef::Now.resolve();
        let after = Utc::now();
        assert!(resolved >= before && resolved <= after);
    }

    #[test]
    fn folio_error_messages() {
        let e = FolioError::Order {
            symbol: Symbol::new("AAPL"),
            reason: "rejected".into(),
        };
        assert_eq!(e.to_string(), "order failed for AAPL: rejected");
    }
}
