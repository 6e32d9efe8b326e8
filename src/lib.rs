//! # equilib
//!
//! An equilibrium-seeking portfolio rebalancer: declare a target allocation
//! (symbol → fraction of total worth), then drive the portfolio toward it
//! in bounded daily steps instead of snapping to target in one trade.
//!
//! ## Features
//!
//! - **Target equilibria**: validated ratio maps with a reserved cash fraction
//! - **Linear blending**: combine several candidate allocations by weight
//! - **Capped daily progression**: step size accrues with elapsed time, capped
//! - **Spread-aware decisions**: a bid/ask dead-zone suppresses order chatter
//! - **Two modes**: strict simulated-time backtests and fault-contained live ticks
//! - **Paper trading**: an in-memory folio for deterministic backtests
//!
//! ## Quick Start
//!
//! ```
//! use equilib::{
//!     EquilibriumManager, ManagerConfig, PaperFolio, QuoteBoard, Symbol, TimeRef,
//! };
//! use chrono::{TimeZone, Utc};
//!
//! // A market quoting one symbol, and a paper folio holding 1000 cash.
//! let mut board = QuoteBoard::new();
//! board.set_quote(Symbol::new("BTC-USD"), 99.0, 101.0);
//! let mut folio = PaperFolio::new(board, 1000.0);
//!
//! // Seek 20% BTC-USD, default 3%/day step.
//! let ratios = [(Symbol::new("BTC-USD"), 0.20)].into_iter().collect();
//! let mut manager = EquilibriumManager::backtest(ratios, ManagerConfig::default()).unwrap();
//!
//! let day1 = TimeRef::At(Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap());
//! let day2 = TimeRef::At(Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap());
//!
//! manager.tick_write(&mut folio, day1, true).unwrap();
//! manager.tick_write(&mut folio, day2, true).unwrap();
//!
//! let obs = manager.tick_read(&folio, day2).unwrap();
//! println!("{obs}");
//! assert!(folio.quantity(&Symbol::new("BTC-USD")) > 0.0);
//! ```
//!
//! ## Worth Representation
//!
//! Worths and order amounts are [`f64`] in units of the folio's cash asset.
//! Market orders are amount-denominated (spend or raise this much cash),
//! which keeps fractional-quantity assets first-class.
//!
//! ## Modes
//!
//! | Mode | Time | Sizing basis | Symbol errors |
//! |------|------|--------------|---------------|
//! | **Backtest** | caller-supplied | spread edge | propagate |
//! | **Live** | wall clock | committed worth | logged, contained |

pub mod config;
pub mod decision;
pub mod equilibrium;
pub mod error;
pub mod folio;
pub mod manager;
pub mod observe;
pub mod paper;
pub mod persist;
pub mod progression;
pub mod types;

pub use config::ManagerConfig;
pub use decision::{decide, AmountBasis, Decision};
pub use equilibrium::{validate_ratios, Equilibrium, RatioMap};
pub use error::{Error, Result};
pub use folio::{Folio, FolioError, FolioResult, ItemState, Market, TimeRef};
pub use manager::{EquilibriumManager, Mode};
pub use observe::{Observation, SymbolObservation};
pub use paper::{PaperFolio, QuoteBoard};
pub use persist::ManagerState;
pub use progression::Progression;
pub use types::Symbol;
