//! Per-symbol rebalancing decisions.
//!
//! Each tick, every symbol in the running equilibrium gets an independent
//! decision: market buy, market sell, or hold. Amounts are monetary (cash
//! asset units) and always scaled by the tick's step fraction, so a single
//! tick never closes the entire drift gap. The bid/ask spread creates a
//! dead-zone: while the target worth sits between what selling down would
//! fetch (bid) and what buying up would cost (ask), no order is placed,
//! which keeps bid/ask noise from generating order chatter.

use std::fmt;

use crate::folio::ItemState;

/// The order intent for one symbol on one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    Buy { amount: f64 },
    Sell { amount: f64 },
    Hold,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Buy { amount } => write!(f, "market buy {amount:.6}"),
            Decision::Sell { amount } => write!(f, "market sell {amount:.6}"),
            Decision::Hold => write!(f, "hold"),
        }
    }
}

/// Which worth figure anchors the order amount.
///
/// The two policies are deliberately kept separate: they are not
/// equivalent once open orders are outstanding, and which one live
/// trading should use is still an open product question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountBasis {
    /// Measure the drift from the spread edge being crossed: buys from
    /// ask worth, sells from bid worth. Heritage of the simulated-time
    /// variant.
    SpreadEdge,
    /// Measure the drift from current worth including value committed in
    /// open orders. Heritage of the real-time variant.
    CommittedWorth,
}

/// Decide the order intent for one symbol.
///
/// `item` is the current position snapshot (`None` if no position exists —
/// buys are still possible, sells are not). `pending` is the monetary
/// value already committed in open orders for the symbol; it is treated as
/// already-acquired worth so a resting fill does not trigger a duplicate
/// order. `step` is this tick's step fraction.
pub fn decide(
    item: Option<&ItemState>,
    pending: f64,
    target_ratio: f64,
    total_worth: f64,
    step: f64,
    basis: AmountBasis,
) -> Decision {
    let (exists, cur_worth, bid_worth, ask_worth) = match item {
        Some(it) => (
            true,
            it.worth + pending,
            it.bid_worth + pending,
            it.ask_worth + pending,
        ),
        None => (false, pending, pending, pending),
    };

    let target_worth = target_ratio * total_worth;

    // A non-positive amount (zero step, or a quote inversion under the
    // committed-worth basis) is no trade at all
    if target_worth > ask_worth {
        let anchor = match basis {
            AmountBasis::SpreadEdge => ask_worth,
            AmountBasis::CommittedWorth => cur_worth,
        };
        let amount = (target_worth - anchor) * step;
        if amount > 0.0 {
            return Decision::Buy { amount };
        }
        Decision::Hold
    } else if exists && target_worth < bid_worth {
        let anchor = match basis {
            AmountBasis::SpreadEdge => bid_worth,
            AmountBasis::CommittedWorth => cur_worth,
        };
        let amount = (anchor - target_worth) * step;
        if amount > 0.0 {
            return Decision::Sell { amount };
        }
        Decision::Hold
    } else {
        Decision::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(worth: f64, bid_worth: f64, ask_worth: f64) -> ItemState {
        ItemState {
            quantity: 1.0,
            unit_cost: worth,
            worth,
            bid_worth,
            ask_worth,
        }
    }

    #[test]
    fn no_position_buys_toward_target() {
        // {"XYZ": 0.20}, worth 1000, no position, step 0.1 → buy 20
        let decision = decide(None, 0.0, 0.20, 1000.0, 0.1, AmountBasis::SpreadEdge);
        assert_eq!(decision, Decision::Buy { amount: 20.0 });
    }

    #[test]
    fn no_position_never_sells() {
        // target below zero worth is impossible, so absent positions hold
        let decision = decide(None, 0.0, 0.0, 1000.0, 0.1, AmountBasis::SpreadEdge);
        assert_eq!(decision, Decision::Hold);
    }

    #[test]
    fn target_inside_spread_holds() {
        // bid 95, ask 105, target 100 → dead-zone
        let it = item(100.0, 95.0, 105.0);
        let decision = decide(Some(&it), 0.0, 0.10, 1000.0, 0.1, AmountBasis::SpreadEdge);
        assert_eq!(decision, Decision::Hold);

        let decision = decide(Some(&it), 0.0, 0.10, 1000.0, 0.1, AmountBasis::CommittedWorth);
        assert_eq!(decision, Decision::Hold);
    }

    #[test]
    fn buy_amount_scales_with_step() {
        // target = 2 * ask, step 0.5 → amount = 0.5 * (2*ask - ask)
        let it = item(100.0, 99.0, 101.0);
        let decision = decide(Some(&it), 0.0, 0.202, 1000.0, 0.5, AmountBasis::SpreadEdge);
        match decision {
            Decision::Buy { amount } => {
                assert!((amount - 0.5 * (202.0 - 101.0)).abs() < 1e-9);
                // never exceeds the full drift gap
                assert!(amount <= 202.0 - 100.0);
            }
            other => panic!("expected buy, got {other:?}"),
        }
    }

    #[test]
    fn sell_when_over_target() {
        let it = item(300.0, 297.0, 303.0);
        let decision = decide(Some(&it), 0.0, 0.10, 1000.0, 0.1, AmountBasis::SpreadEdge);
        // target 100 < bid 297 → sell (297 - 100) * 0.1
        match decision {
            Decision::Sell { amount } => assert!((amount - 19.7).abs() < 1e-9),
            other => panic!("expected sell, got {other:?}"),
        }
    }

    #[test]
    fn committed_worth_anchors_at_current() {
        let it = item(100.0, 99.0, 101.0);
        let decision = decide(Some(&it), 0.0, 0.30, 1000.0, 0.1, AmountBasis::CommittedWorth);
        // buy (300 - 100) * 0.1 from current worth, not from ask worth
        assert_eq!(decision, Decision::Buy { amount: 20.0 });

        let decision = decide(Some(&it), 0.0, 0.30, 1000.0, 0.1, AmountBasis::SpreadEdge);
        // spread-edge anchors at ask worth instead
        match decision {
            Decision::Buy { amount } => assert!((amount - (300.0 - 101.0) * 0.1).abs() < 1e-9),
            other => panic!("expected buy, got {other:?}"),
        }
    }

    #[test]
    fn pending_orders_suppress_duplicate_buys() {
        // 100 already resting in open buy orders; the adjusted band
        // [199, 201] brackets the 200 target, so no duplicate order goes out
        let it = item(100.0, 99.0, 101.0);
        let decision = decide(Some(&it), 100.0, 0.20, 1000.0, 0.1, AmountBasis::CommittedWorth);
        assert_eq!(decision, Decision::Hold);
    }

    #[test]
    fn pending_orders_shrink_buy_amount() {
        let it = item(100.0, 99.0, 101.0);
        // without pending: buy (300 - 100) * 0.1 = 20
        // with 50 pending: buy (300 - 150) * 0.1 = 15
        let decision = decide(Some(&it), 50.0, 0.30, 1000.0, 0.1, AmountBasis::CommittedWorth);
        match decision {
            Decision::Buy { amount } => assert!((amount - 15.0).abs() < 1e-9),
            other => panic!("expected buy, got {other:?}"),
        }
    }

    #[test]
    fn pending_counts_for_absent_positions_too() {
        // nothing held, but 100 resting in an open buy; target 100 is met
        let decision = decide(None, 100.0, 0.10, 1000.0, 0.1, AmountBasis::CommittedWorth);
        assert_eq!(decision, Decision::Hold);
    }

    #[test]
    fn zero_step_holds() {
        let decision = decide(None, 0.0, 0.20, 1000.0, 0.0, AmountBasis::SpreadEdge);
        assert_eq!(decision, Decision::Hold);
    }

    #[test]
    fn display_formats() {
        assert_eq!(
            format!("{}", Decision::Buy { amount: 20.0 }),
            "market buy 20.000000"
        );
        assert_eq!(format!("{}", Decision::Hold), "hold");
    }
}
