//! The equilibrium portfolio manager.
//!
//! One manager owns one equilibrium and drives one folio through discrete
//! ticks: `tick_read` observes, `tick_write` decides and trades. The two
//! historical variants (simulated-time backtest and wall-clock live) are a
//! single type here, parameterized by [`Mode`], which selects the time
//! semantics, the amount basis, and the error-containment policy.
//!
//! The manager is stateless between ticks apart from the running
//! equilibrium; last-tick bookkeeping lives in the folio.

use log::{error, info, warn};
use rustc_hash::FxHashMap;

use crate::config::ManagerConfig;
use crate::decision::{decide, AmountBasis, Decision};
use crate::equilibrium::{Equilibrium, RatioMap};
use crate::error::Result;
use crate::folio::{Folio, FolioResult, TimeRef};
use crate::observe::{Observation, SymbolObservation};
use crate::types::Symbol;
use crate::Error;

/// Execution mode: time source, sizing basis, and error policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Simulated time supplied by the caller. Per-symbol errors propagate —
    /// a backtest wants to surface bugs, not mask them. Orders are always
    /// executed against the folio.
    Backtest,
    /// Wall-clock time. A failure submitting one symbol's order is logged
    /// and contained so the remaining symbols still trade. Orders are only
    /// submitted when the `execute` flag is set; otherwise the tick is a
    /// dry run that logs what it would have done.
    Live,
}

impl Mode {
    fn amount_basis(self) -> AmountBasis {
        match self {
            Mode::Backtest => AmountBasis::SpreadEdge,
            Mode::Live => AmountBasis::CommittedWorth,
        }
    }
}

/// Manages a portfolio toward a target equilibrium with bounded steps.
#[derive(Debug, Clone)]
pub struct EquilibriumManager {
    mode: Mode,
    config: ManagerConfig,
    equilibrium: Equilibrium,
}

impl EquilibriumManager {
    /// Create a manager from an initial allocation and config.
    ///
    /// Fails if the config or the allocation is invalid.
    pub fn new(mode: Mode, ratios: RatioMap, config: ManagerConfig) -> Result<Self> {
        config.validate()?;
        let equilibrium = Equilibrium::new(ratios, config.cash_ratio)?;
        Ok(Self {
            mode,
            config,
            equilibrium,
        })
    }

    /// Backtest-mode manager (simulated time, strict errors).
    pub fn backtest(ratios: RatioMap, config: ManagerConfig) -> Result<Self> {
        Self::new(Mode::Backtest, ratios, config)
    }

    /// Live-mode manager (wall clock, per-symbol error containment).
    pub fn live(ratios: RatioMap, config: ManagerConfig) -> Result<Self> {
        Self::new(Mode::Live, ratios, config)
    }

    /// Display name: the configured name, or the type name.
    pub fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or("EquilibriumManager")
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn equilibrium(&self) -> &Equilibrium {
        &self.equilibrium
    }

    /// Atomically replace the running equilibrium.
    pub fn set_equilibrium(&mut self, ratios: RatioMap) -> Result<()> {
        self.equilibrium.set_running(ratios, self.config.cash_ratio)
    }

    /// Replace the running equilibrium with a linear combination of
    /// source allocations. See [`Equilibrium::blend`].
    pub fn blend(&mut self, sources: &[RatioMap], coefficients: &[f64]) -> Result<()> {
        self.equilibrium
            .blend(sources, coefficients, self.config.cash_ratio)
    }

    /// Observe portfolio state against the running equilibrium.
    ///
    /// Side-effect-free; the result is telemetry only.
    pub fn tick_read<F: Folio>(&self, folio: &F, at: TimeRef) -> Result<Observation> {
        let time = at.resolve();
        let worth = folio.worth(at)?;
        let cash_pct = if worth > 0.0 {
            100.0 * folio.cash_worth()? / worth
        } else {
            0.0
        };

        let mut symbols = Vec::new();
        for symbol in self.equilibrium.symbols_sorted() {
            let price = folio.price(&symbol, at)?;
            let (quantity, unit_cost, pct_worth) = match folio.item(&symbol, at)? {
                Some(item) => {
                    let pct = if worth > 0.0 {
                        100.0 * item.worth / worth
                    } else {
                        0.0
                    };
                    (item.quantity, item.unit_cost, pct)
                }
                None => (0.0, 0.0, 0.0),
            };
            symbols.push(SymbolObservation {
                symbol,
                price,
                quantity,
                unit_cost,
                pct_worth,
            });
        }

        Ok(Observation {
            time,
            principal: folio.principal_quantity(),
            worth,
            cash_pct,
            symbols,
        })
    }

    /// Run one decision-and-trade cycle. Returns the elapsed seconds
    /// since the folio's previous tick.
    ///
    /// `execute` gates order submission in live mode; backtest mode
    /// always executes.
    pub fn tick_write<F: Folio>(
        &mut self,
        folio: &mut F,
        at: TimeRef,
        execute: bool,
    ) -> Result<f64> {
        let commit = match self.mode {
            Mode::Backtest => true,
            Mode::Live => execute,
        };
        let prev = folio.last_tick_time();
        let gap_seconds = folio.tick(at, commit)?;
        match prev {
            Some(prev) => info!("{}: gap {gap_seconds:.0}s since {prev}", self.name()),
            None => info!("{}: first tick, gap {gap_seconds:.0}s", self.name()),
        }

        let step = self.config.progression.step_fraction(gap_seconds);
        if step > 1.0 {
            return Err(Error::Validation(format!(
                "step fraction too large: {step}"
            )));
        }

        // Totals are captured once; per-symbol decisions are independent
        let total_worth = folio.worth(at)?;
        let open_orders = folio.open_order_values()?;

        for symbol in self.equilibrium.symbols_sorted() {
            let ratio = self.equilibrium.running()[&symbol];
            if let Err(e) =
                self.tick_symbol(folio, symbol, ratio, total_worth, step, &open_orders, at, execute)
            {
                match self.mode {
                    Mode::Live => {
                        error!("{}: {symbol} contributes no trade this tick: {e}", self.name());
                    }
                    Mode::Backtest => return Err(e.into()),
                }
            }
        }

        Ok(gap_seconds)
    }

    /// Evaluate and (maybe) execute one symbol's rebalancing move.
    #[allow(clippy::too_many_arguments)]
    fn tick_symbol<F: Folio>(
        &self,
        folio: &mut F,
        symbol: Symbol,
        ratio: f64,
        total_worth: f64,
        step: f64,
        open_orders: &FxHashMap<Symbol, f64>,
        at: TimeRef,
        execute: bool,
    ) -> FolioResult<()> {
        let item = folio.item(&symbol, at)?;
        let pending = open_orders.get(&symbol).copied().unwrap_or(0.0);
        let held = item.as_ref().map_or(0.0, |it| it.worth);
        let cash_name = folio.cash_name().to_string();

        let decision = decide(
            item.as_ref(),
            pending,
            ratio,
            total_worth,
            step,
            self.mode.amount_basis(),
        );

        info!(
            "{}: {symbol} worth: tar. {:.2} ({:.2}%) | cur. {:.2} | pend. {:.2}",
            self.name(),
            ratio * total_worth,
            ratio * 100.0,
            held + pending,
            pending,
        );

        let submit = matches!(self.mode, Mode::Backtest) || execute;
        match decision {
            Decision::Hold => {
                info!("{}: {symbol} near equilibrium, staying put", self.name());
            }
            Decision::Buy { amount } => {
                if submit {
                    warn!(
                        "{}: attempting market buy: {symbol} | {amount:.6} {cash_name}",
                        self.name()
                    );
                    folio.market_buy(&symbol, amount, at)?;
                    warn!(
                        "{}: placed market buy: {symbol} | {amount:.6} {cash_name}",
                        self.name()
                    );
                } else {
                    info!(
                        "{}: fake market buy: {symbol} | {amount:.6} {cash_name}",
                        self.name()
                    );
                }
            }
            Decision::Sell { amount } => {
                if submit {
                    warn!(
                        "{}: attempting market sell: {symbol} | {amount:.6} {cash_name}",
                        self.name()
                    );
                    folio.market_sell(&symbol, amount, at)?;
                    warn!(
                        "{}: placed market sell: {symbol} | {amount:.6} {cash_name}",
                        self.name()
                    );
                } else {
                    info!(
                        "{}: fake market sell: {symbol} | {amount:.6} {cash_name}",
                        self.name()
                    );
                }
            }
        }
        Ok(())
    }
}
