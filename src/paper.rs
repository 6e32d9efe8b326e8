//! In-memory paper-trading backend.
//!
//! [`PaperFolio`] implements [`Folio`] with immediate fills: buys execute
//! at ask, sells at bid, and the open-order map is always empty. It backs
//! the demo binary and the test suite; live broker adapters implement the
//! same trait elsewhere.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;

use crate::folio::{Folio, FolioError, FolioResult, ItemState, Market, TimeRef};
use crate::types::Symbol;

/// A static quote table implementing [`Market`].
///
/// Quotes are set per symbol and ignore the query time; backtest drivers
/// update them between ticks.
#[derive(Debug, Clone, Default)]
pub struct QuoteBoard {
    quotes: FxHashMap<Symbol, Quote>,
}

#[derive(Debug, Clone, Copy)]
struct Quote {
    bid: f64,
    ask: f64,
}

impl QuoteBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set (or replace) the quote for a symbol. The last price is the mid.
    pub fn set_quote(&mut self, symbol: Symbol, bid: f64, ask: f64) {
        debug_assert!(bid > 0.0 && ask >= bid, "bad quote {bid}/{ask} for {symbol}");
        self.quotes.insert(symbol, Quote { bid, ask });
    }

    fn get(&self, symbol: &Symbol) -> FolioResult<Quote> {
        self.quotes
            .get(symbol)
            .copied()
            .ok_or(FolioError::Price { symbol: *symbol })
    }
}

impl Market for QuoteBoard {
    fn last(&self, symbol: &Symbol, _at: TimeRef) -> FolioResult<f64> {
        let q = self.get(symbol)?;
        Ok((q.bid + q.ask) / 2.0)
    }

    fn bid(&self, symbol: &Symbol, _at: TimeRef) -> FolioResult<f64> {
        Ok(self.get(symbol)?.bid)
    }

    fn ask(&self, symbol: &Symbol, _at: TimeRef) -> FolioResult<f64> {
        Ok(self.get(symbol)?.ask)
    }
}

/// One held position: fractional quantity plus volume-weighted unit cost.
#[derive(Debug, Clone, Copy)]
struct PaperPosition {
    quantity: f64,
    unit_cost: f64,
}

/// A paper portfolio with a cash balance and immediately-filled orders.
pub struct PaperFolio<M: Market> {
    market: M,
    cash_name: String,
    cash: f64,
    principal: f64,
    positions: FxHashMap<Symbol, PaperPosition>,
    last_tick: Option<DateTime<Utc>>,
}

impl<M: Market> PaperFolio<M> {
    /// Create a paper folio funded with `initial_cash` of the cash asset.
    pub fn new(market: M, initial_cash: f64) -> Self {
        debug_assert!(initial_cash >= 0.0, "initial cash must be non-negative");
        Self {
            market,
            cash_name: "USD".into(),
            cash: initial_cash,
            principal: initial_cash,
            positions: FxHashMap::default(),
            last_tick: None,
        }
    }

    /// Seed a position (for tests and scenario setup).
    pub fn with_position(mut self, symbol: Symbol, quantity: f64, unit_cost: f64) -> Self {
        self.positions.insert(
            symbol,
            PaperPosition {
                quantity,
                unit_cost,
            },
        );
        self
    }

    /// Access the underlying market (e.g. to move quotes between ticks).
    pub fn market_mut(&mut self) -> &mut M {
        &mut self.market
    }

    /// Current cash balance.
    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Quantity held in `symbol` (0.0 when flat).
    pub fn quantity(&self, symbol: &Symbol) -> f64 {
        self.positions.get(symbol).map_or(0.0, |p| p.quantity)
    }
}

impl<M: Market> Folio for PaperFolio<M> {
    fn worth(&self, at: TimeRef) -> FolioResult<f64> {
        let mut total = self.cash;
        for (symbol, pos) in &self.positions {
            total += pos.quantity * self.market.last(symbol, at)?;
        }
        Ok(total)
    }

    fn cash_name(&self) -> &str {
        &self.cash_name
    }

    fn cash_worth(&self) -> FolioResult<f64> {
        Ok(self.cash)
    }

    fn principal_quantity(&self) -> f64 {
        self.principal
    }

    fn item(&self, symbol: &Symbol, at: TimeRef) -> FolioResult<Option<ItemState>> {
        let Some(pos) = self.positions.get(symbol) else {
            return Ok(None);
        };
        Ok(Some(ItemState {
            quantity: pos.quantity,
            unit_cost: pos.unit_cost,
            worth: pos.quantity * self.market.last(symbol, at)?,
            bid_worth: pos.quantity * self.market.bid(symbol, at)?,
            ask_worth: pos.quantity * self.market.ask(symbol, at)?,
        }))
    }

    fn price(&self, symbol: &Symbol, at: TimeRef) -> FolioResult<f64> {
        self.market.last(symbol, at)
    }

    fn tick(&mut self, at: TimeRef, commit: bool) -> FolioResult<f64> {
        let now = at.resolve();
        let gap = match self.last_tick {
            Some(prev) => (now - prev).num_milliseconds() as f64 / 1000.0,
            None => 0.0,
        };
        if gap < 0.0 {
            return Err(FolioError::Unavailable(format!(
                "tick time {now} precedes last tick"
            )));
        }
        if commit {
            self.last_tick = Some(now);
        }
        Ok(gap)
    }

    fn open_order_values(&self) -> FolioResult<FxHashMap<Symbol, f64>> {
        // Fills are immediate, so nothing is ever outstanding
        Ok(FxHashMap::default())
    }

    fn market_buy(&mut self, symbol: &Symbol, amount: f64, at: TimeRef) -> FolioResult<()> {
        if amount <= 0.0 {
            return Err(FolioError::Order {
                symbol: *symbol,
                reason: format!("non-positive buy amount {amount}"),
            });
        }
        if amount > self.cash {
            return Err(FolioError::Order {
                symbol: *symbol,
                reason: format!("insufficient cash: {amount:.2} > {:.2}", self.cash),
            });
        }
        let price = self.market.ask(symbol, at)?;
        let quantity = amount / price;

        let pos = self.positions.entry(*symbol).or_insert(PaperPosition {
            quantity: 0.0,
            unit_cost: 0.0,
        });
        // VWAP the unit cost across the old position and the new fill
        let total_cost = pos.quantity * pos.unit_cost + amount;
        pos.quantity += quantity;
        pos.unit_cost = total_cost / pos.quantity;
        self.cash -= amount;
        Ok(())
    }

    fn market_sell(&mut self, symbol: &Symbol, amount: f64, at: TimeRef) -> FolioResult<()> {
        if amount <= 0.0 {
            return Err(FolioError::Order {
                symbol: *symbol,
                reason: format!("non-positive sell amount {amount}"),
            });
        }
        let price = self.market.bid(symbol, at)?;
        let quantity = amount / price;

        let pos = self.positions.get_mut(symbol).ok_or(FolioError::Order {
            symbol: *symbol,
            reason: "no position to sell".into(),
        })?;
        if quantity > pos.quantity * (1.0 + 1e-9) {
            return Err(FolioError::Order {
                symbol: *symbol,
                reason: format!("sell quantity {quantity} exceeds held {}", pos.quantity),
            });
        }
        pos.quantity = (pos.quantity - quantity).max(0.0);
        self.cash += amount;
        if pos.quantity <= 0.0 {
            self.positions.remove(symbol);
        }
        Ok(())
    }

    fn last_tick_time(&self) -> Option<DateTime<Utc>> {
        self.last_tick
    }
}
