//! The equilibrium data model: target allocation ratios per symbol.
//!
//! An equilibrium maps each tradable symbol to the fraction of total
//! portfolio worth it should occupy. The running equilibrium is the
//! currently effective target; the initial equilibrium is an immutable
//! snapshot taken at construction. The running map is only ever replaced
//! wholesale — a failed validation leaves it untouched.

use log::info;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::types::Symbol;

/// Target allocation: symbol → fraction of total worth.
pub type RatioMap = FxHashMap<Symbol, f64>;

/// Validate an allocation map against the cash-ratio invariant.
///
/// Every ratio must be non-negative and the total must leave at least
/// `cash_ratio` of worth uncommitted.
pub fn validate_ratios(ratios: &RatioMap, cash_ratio: f64) -> Result<()> {
    let mut total = 0.0;
    for (symbol, &ratio) in ratios {
        if ratio < 0.0 {
            return Err(Error::Validation(format!(
                "expected non-negative ratio for {symbol}, got {ratio}"
            )));
        }
        total += ratio;
    }
    let budget = 1.0 - cash_ratio;
    if total > budget {
        return Err(Error::Validation(format!(
            "total target ratio {total:.4} exceeds {budget:.4} (1 - cash ratio {cash_ratio})"
        )));
    }
    Ok(())
}

/// A validated target allocation with its construction-time snapshot.
#[derive(Debug, Clone)]
pub struct Equilibrium {
    initial: RatioMap,
    running: RatioMap,
}

impl Equilibrium {
    /// Create an equilibrium from an initial allocation.
    ///
    /// The map becomes both the initial snapshot and the running target.
    /// Fails if the allocation violates the cash-ratio invariant.
    pub fn new(ratios: RatioMap, cash_ratio: f64) -> Result<Self> {
        validate_ratios(&ratios, cash_ratio)?;
        Ok(Self {
            initial: ratios.clone(),
            running: ratios,
        })
    }

    /// The immutable construction-time allocation.
    pub fn initial(&self) -> &RatioMap {
        &self.initial
    }

    /// The currently effective allocation.
    pub fn running(&self) -> &RatioMap {
        &self.running
    }

    /// Symbols of the running equilibrium in sorted order.
    pub fn symbols_sorted(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.running.keys().copied().collect();
        symbols.sort();
        symbols
    }

    /// Atomically replace the running allocation.
    ///
    /// Validates first; on failure the running map is left unchanged.
    pub fn set_running(&mut self, ratios: RatioMap, cash_ratio: f64) -> Result<()> {
        validate_ratios(&ratios, cash_ratio)?;
        info!("setting new equilibrium {:?}", sorted_entries(&ratios));
        self.running = ratios;
        Ok(())
    }

    /// Replace the running allocation with a linear combination of source
    /// allocations.
    ///
    /// Each symbol's combined ratio is `Σ(ratio_i * coeff_i) / Σ(coeff_i)`,
    /// computed over symbols with strictly positive ratio in each source.
    /// Every source must individually satisfy the cash-ratio invariant, and
    /// coefficients must be non-negative with a positive sum.
    pub fn blend(
        &mut self,
        sources: &[RatioMap],
        coefficients: &[f64],
        cash_ratio: f64,
    ) -> Result<()> {
        if sources.len() != coefficients.len() {
            return Err(Error::Blend(format!(
                "{} sources but {} coefficients",
                sources.len(),
                coefficients.len()
            )));
        }

        let mut combined: RatioMap = RatioMap::default();
        let mut total_coeff = 0.0;

        for (ratios, &coeff) in sources.iter().zip(coefficients) {
            if coeff < 0.0 {
                return Err(Error::Blend(format!(
                    "expected non-negative coefficient, got {coeff}"
                )));
            }
            validate_ratios(ratios, cash_ratio)?;
            for (&symbol, &ratio) in ratios {
                if ratio > 0.0 {
                    *combined.entry(symbol).or_insert(0.0) += ratio * coeff;
                }
            }
            total_coeff += coeff;
        }

        if total_coeff <= 0.0 {
            return Err(Error::Blend(format!(
                "coefficients sum to {total_coeff}, cannot normalize"
            )));
        }

        for ratio in combined.values_mut() {
            *ratio /= total_coeff;
        }

        self.set_running(combined, cash_ratio)
    }
}

fn sorted_entries(ratios: &RatioMap) -> Vec<(Symbol, f64)> {
    let mut entries: Vec<(Symbol, f64)> = ratios.iter().map(|(s, r)| (*s, *r)).collect();
    entries.sort_by_key(|(s, _)| *s);
    entries
}
