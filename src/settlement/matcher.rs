use crate::core::balance::BalanceSheet;
use crate::core::money::{format_amount, is_negligible, EPSILON};
use crate::core::participant::ParticipantId;
use crate::error::{Result, SettleError};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Line shown in place of an empty settlement list.
pub const NO_DEBTS_MESSAGE: &str = "No debts found!";

/// A single directed payment instruction: `debtor` pays `creditor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub debtor: ParticipantId,
    pub creditor: ParticipantId,
    pub amount: Decimal,
}

impl Settlement {
    pub fn new(debtor: ParticipantId, creditor: ParticipantId, amount: Decimal) -> Self {
        Self {
            debtor,
            creditor,
            amount,
        }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} owes {} ${}",
            self.debtor,
            self.creditor,
            format_amount(self.amount)
        )
    }
}

/// What a settlement run produced.
///
/// An empty transfer list is never represented as `Transfers(vec![])`;
/// it is always [`SettlementOutcome::AllSquare`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "transfers", rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// Nobody owes anybody anything.
    AllSquare,
    /// Transfers that square everyone up, in the order they were found.
    Transfers(Vec<Settlement>),
}

impl SettlementOutcome {
    pub fn from_transfers(transfers: Vec<Settlement>) -> Self {
        if transfers.is_empty() {
            SettlementOutcome::AllSquare
        } else {
            SettlementOutcome::Transfers(transfers)
        }
    }

    pub fn is_all_square(&self) -> bool {
        matches!(self, SettlementOutcome::AllSquare)
    }

    pub fn transfers(&self) -> &[Settlement] {
        match self {
            SettlementOutcome::AllSquare => &[],
            SettlementOutcome::Transfers(transfers) => transfers,
        }
    }

    /// Display lines, with [`NO_DEBTS_MESSAGE`] standing in for no transfers.
    pub fn lines(&self) -> Vec<String> {
        match self {
            SettlementOutcome::AllSquare => vec![NO_DEBTS_MESSAGE.to_string()],
            SettlementOutcome::Transfers(transfers) => {
                transfers.iter().map(ToString::to_string).collect()
            }
        }
    }
}

/// Outstanding magnitude for one side of the match.
#[derive(Debug)]
struct Position {
    participant: ParticipantId,
    remaining: Decimal,
}

/// Greedy debtor/creditor matcher.
///
/// Produces at most `d + c - 1` transfers for `d` debtors and `c`
/// creditors, since every transfer exhausts at least one side.
pub struct SettlementMatcher;

impl SettlementMatcher {
    /// Turn net balances into transfers.
    ///
    /// # Algorithm
    ///
    /// 1. Quantize balances to cents with an exact zero sum.
    /// 2. Split into debtors (below `-EPSILON`) and creditors (above
    ///    `EPSILON`); anything in between is dust and is dropped.
    /// 3. Order both sides by magnitude, largest first. The sort is stable
    ///    and the sheet is ordered by participant, so ties break by name.
    /// 4. Walk both sides, moving `min(debt, credit)` each step and
    ///    advancing every cursor whose remainder is negligible.
    ///
    /// Whatever is left on the side that did not run out must be covered
    /// by dust; anything more is reported as
    /// [`SettleError::InternalImbalance`].
    pub fn settle(sheet: &BalanceSheet) -> Result<SettlementOutcome> {
        let quantized = sheet.quantize()?;

        let mut dust = Decimal::ZERO;
        let mut debtors = Vec::new();
        let mut creditors = Vec::new();
        for (participant, balance) in quantized {
            if balance < -EPSILON {
                debtors.push(Position {
                    participant,
                    remaining: -balance,
                });
            } else if balance > EPSILON {
                creditors.push(Position {
                    participant,
                    remaining: balance,
                });
            } else {
                dust += balance.abs();
            }
        }

        debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
        debug!(
            "Matching {} debtors against {} creditors",
            debtors.len(),
            creditors.len()
        );

        let mut transfers = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];

            let amount = debtor.remaining.min(creditor.remaining);
            debtor.remaining -= amount;
            creditor.remaining -= amount;

            let settlement =
                Settlement::new(debtor.participant.clone(), creditor.participant.clone(), amount);
            debug!("{}", settlement);
            transfers.push(settlement);

            if is_negligible(debtor.remaining) {
                dust += debtor.remaining;
                i += 1;
            }
            if is_negligible(creditor.remaining) {
                dust += creditor.remaining;
                j += 1;
            }
        }

        let leftover: Decimal = debtors[i..]
            .iter()
            .chain(&creditors[j..])
            .map(|p| p.remaining)
            .sum();
        if leftover > dust + EPSILON {
            warn!(
                "Unsettled remainder {} exceeds dropped dust {}",
                leftover, dust
            );
            return Err(SettleError::InternalImbalance {
                residual: leftover - dust,
            });
        }

        Ok(SettlementOutcome::from_transfers(transfers))
    }
}
