//! # Schedule Projector
//!
//! Remaining balance and buyout amounts at any point of a rental schedule,
//! plus the ledger operations the rentals dashboard performs on a live
//! contract.
//!
//! ## Contract Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ┌──────────┐  record_payment  ┌──────────┐  last payment  ┌─────────┐ │
//! │  │ Pending  │─────────────────►│  Active  │───────────────►│Completed│ │
//! │  └────┬─────┘                  └────┬─────┘                └─────────┘ │
//! │       │                             │                          ▲       │
//! │       │        complete_buyout      │                          │       │
//! │       └─────────────────────────────┴──────────────────────────┘       │
//! │       │                             │                                  │
//! │       │          cancel             ▼                                  │
//! │       └────────────────────────►┌──────────┐                           │
//! │                                 │Cancelled │                           │
//! │                                 └──────────┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{div_round_half_up, Money};
use crate::types::{ContractStatus, Rate, RentalContract, RentalTerm};
use crate::validation::{validate_elapsed_months, validate_non_negative, validate_rate_bps};

/// Days between two rental payments.
pub const BILLING_CYCLE_DAYS: u64 = 30;

/// Balance left after `elapsed` payments. Zero once the term is reached.
pub(crate) fn remaining_balance(monthly_rate: Money, term: RentalTerm, elapsed: u32) -> Money {
    if elapsed >= term.months() {
        return Money::zero();
    }
    let total = monthly_rate * term.months();
    let paid = monthly_rate * elapsed;
    (total - paid).max_zero()
}

/// Amount still owed on a rental after `elapsed_months` payments.
///
/// `elapsed_months >= term` is the fully paid case and returns exactly zero.
///
/// ## Errors
/// `InvalidArgument` for a negative price, rate or elapsed count, or a term
/// outside 3..=24.
///
/// ```rust
/// use rto_core::money::Money;
/// use rto_core::schedule::compute_buyout_amount;
///
/// let owed = compute_buyout_amount(
///     Money::from_cents(120000),
///     Money::from_cents(11500),
///     12,
///     6,
/// ).unwrap();
/// assert_eq!(owed.cents(), 69000);
/// ```
pub fn compute_buyout_amount(
    purchase_price: Money,
    monthly_rate: Money,
    term_months: u32,
    elapsed_months: i64,
) -> CoreResult<Money> {
    validate_non_negative("purchase price", purchase_price)?;
    validate_non_negative("monthly rate", monthly_rate)?;
    let elapsed = validate_elapsed_months(elapsed_months)?;
    let term = RentalTerm::new(term_months)?;
    Ok(remaining_balance(monthly_rate, term, elapsed))
}

/// Price to settle `remaining_balance` today with `discount` waived.
///
/// ```rust
/// use rto_core::money::Money;
/// use rto_core::schedule::compute_early_buyout_price;
/// use rto_core::types::Rate;
///
/// let price = compute_early_buyout_price(Money::from_cents(69000), Rate::from_bps(1000)).unwrap();
/// assert_eq!(price.cents(), 62100);
/// ```
pub fn compute_early_buyout_price(remaining_balance: Money, discount: Rate) -> CoreResult<Money> {
    validate_non_negative("remaining balance", remaining_balance)?;
    validate_rate_bps("early buyout discount", discount.bps())?;
    Ok(remaining_balance.apply_discount(discount))
}

// =============================================================================
// Buyout Quote
// =============================================================================

/// What an early buyout costs right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BuyoutQuote {
    pub elapsed_months: u32,
    pub remaining_balance: Money,
    pub discount: Rate,
    pub early_buyout_price: Money,
    /// `remaining_balance - early_buyout_price`
    pub savings: Money,
}

impl BuyoutQuote {
    pub(crate) fn new(elapsed_months: u32, remaining_balance: Money, discount: Rate) -> Self {
        let early_buyout_price = remaining_balance.apply_discount(discount);
        BuyoutQuote {
            elapsed_months,
            remaining_balance,
            discount,
            early_buyout_price,
            savings: remaining_balance - early_buyout_price,
        }
    }
}

// =============================================================================
// Payment Calendar
// =============================================================================

/// One month of a rental payment calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScheduledPayment {
    /// 1-based payment number.
    pub number: u32,
    #[ts(as = "String")]
    pub due_date: NaiveDate,
    pub amount: Money,
    /// Balance left once this payment is made.
    pub balance_after: Money,
    pub paid: bool,
}

fn add_cycles(start: NaiveDate, cycles: u32) -> CoreResult<NaiveDate> {
    start
        .checked_add_days(Days::new(BILLING_CYCLE_DAYS * u64::from(cycles)))
        .ok_or_else(|| {
            CoreError::InvalidArgument(ValidationError::InvalidFormat {
                field: "start date".to_string(),
                reason: "schedule runs past the supported calendar".to_string(),
            })
        })
}

// =============================================================================
// Contract Ledger
// =============================================================================

impl RentalContract {
    #[inline]
    pub fn remaining_payments(&self) -> u32 {
        self.term.months() - self.elapsed_months
    }

    /// `monthly_rate × term`
    #[inline]
    pub fn total_cost(&self) -> Money {
        self.monthly_rate * self.term.months()
    }

    #[inline]
    pub fn amount_paid(&self) -> Money {
        self.monthly_rate * self.elapsed_months
    }

    #[inline]
    pub fn remaining_balance(&self) -> Money {
        remaining_balance(self.monthly_rate, self.term, self.elapsed_months)
    }

    /// Share of payments made, as a whole percent rounded half up.
    pub fn progress_percent(&self) -> u32 {
        let percent = div_round_half_up(
            i128::from(self.elapsed_months) * 100,
            i128::from(self.term.months()),
        );
        percent as u32
    }

    /// Early buyout quote at the current point of the schedule.
    pub fn buyout_quote(&self, discount: Rate) -> BuyoutQuote {
        BuyoutQuote::new(self.elapsed_months, self.remaining_balance(), discount)
    }

    /// Records one monthly payment and returns the amount charged.
    ///
    /// ## Errors
    /// - `InvalidContractStatus` if the contract is completed or cancelled
    /// - `NoRemainingPayments` if every payment is already in
    pub fn record_payment(&mut self) -> CoreResult<Money> {
        if !self.status.is_open() {
            return Err(CoreError::InvalidContractStatus {
                status: self.status.to_string(),
            });
        }
        if self.remaining_payments() == 0 {
            return Err(CoreError::NoRemainingPayments);
        }

        self.elapsed_months += 1;
        self.status = if self.remaining_payments() == 0 {
            ContractStatus::Completed
        } else {
            ContractStatus::Active
        };
        Ok(self.monthly_rate)
    }

    /// Settles the contract early and returns what was charged.
    pub fn complete_buyout(&mut self, discount: Rate) -> CoreResult<BuyoutQuote> {
        if !self.status.is_open() {
            return Err(CoreError::InvalidContractStatus {
                status: self.status.to_string(),
            });
        }
        validate_rate_bps("early buyout discount", discount.bps())?;

        let quote = self.buyout_quote(discount);
        self.elapsed_months = self.term.months();
        self.status = ContractStatus::Completed;
        Ok(quote)
    }

    /// The day the last billing cycle ends.
    pub fn end_date(&self, start: NaiveDate) -> CoreResult<NaiveDate> {
        add_cycles(start, self.term.months())
    }

    /// Due date of the next unpaid installment, if any.
    pub fn next_payment_date(&self, start: NaiveDate) -> CoreResult<Option<NaiveDate>> {
        if !self.status.is_open() || self.remaining_payments() == 0 {
            return Ok(None);
        }
        add_cycles(start, self.elapsed_months).map(Some)
    }

    /// Full payment calendar. The first payment is due on `start`.
    pub fn payment_schedule(&self, start: NaiveDate) -> CoreResult<Vec<ScheduledPayment>> {
        (1..=self.term.months())
            .map(|number| {
                Ok(ScheduledPayment {
                    number,
                    due_date: add_cycles(start, number - 1)?,
                    amount: self.monthly_rate,
                    balance_after: remaining_balance(self.monthly_rate, self.term, number),
                    paid: number <= self.elapsed_months,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contract() -> RentalContract {
        RentalContract::new(Money::from_cents(120000), Money::from_cents(11500), 12).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_buyout_amount_endpoints() {
        let price = Money::from_cents(120000);
        let rate = Money::from_cents(11500);
        assert_eq!(compute_buyout_amount(price, rate, 12, 0).unwrap().cents(), 138000);
        assert_eq!(compute_buyout_amount(price, rate, 12, 12).unwrap(), Money::zero());
        assert_eq!(compute_buyout_amount(price, rate, 12, 40).unwrap(), Money::zero());
    }

    #[test]
    fn test_buyout_amount_rejects_negatives() {
        let price = Money::from_cents(120000);
        let rate = Money::from_cents(11500);
        assert!(compute_buyout_amount(price, rate, 12, -1).is_err());
        assert!(compute_buyout_amount(Money::from_cents(-1), rate, 12, 0).is_err());
        assert!(compute_buyout_amount(price, Money::from_cents(-1), 12, 0).is_err());
        assert!(compute_buyout_amount(price, rate, 30, 0).is_err());
    }

    #[test]
    fn test_early_buyout_price() {
        assert_eq!(
            compute_early_buyout_price(Money::from_cents(69000), Rate::from_bps(1000))
                .unwrap()
                .cents(),
            62100
        );
        assert_eq!(
            compute_early_buyout_price(Money::from_cents(69000), Rate::zero()).unwrap().cents(),
            69000
        );
        assert!(compute_early_buyout_price(Money::from_cents(-1), Rate::zero()).is_err());
        assert!(compute_early_buyout_price(Money::zero(), Rate::from_bps(10_001)).is_err());
    }

    #[test]
    fn test_record_payment_walks_lifecycle() {
        let mut contract = contract();
        assert_eq!(contract.status(), ContractStatus::Pending);

        assert_eq!(contract.record_payment().unwrap().cents(), 11500);
        assert_eq!(contract.status(), ContractStatus::Active);
        assert_eq!(contract.remaining_payments(), 11);
        assert_eq!(contract.amount_paid().cents(), 11500);

        for _ in 0..11 {
            contract.record_payment().unwrap();
        }
        assert_eq!(contract.status(), ContractStatus::Completed);
        assert!(contract.remaining_balance().is_zero());
        assert!(matches!(
            contract.record_payment(),
            Err(CoreError::InvalidContractStatus { .. })
        ));
    }

    #[test]
    fn test_progress_percent() {
        let mut contract = contract();
        assert_eq!(contract.progress_percent(), 0);
        contract.record_payment().unwrap();
        // 1/12 = 8.33% → 8
        assert_eq!(contract.progress_percent(), 8);
        for _ in 0..5 {
            contract.record_payment().unwrap();
        }
        assert_eq!(contract.progress_percent(), 50);
    }

    #[test]
    fn test_complete_buyout() {
        let mut contract = RentalContract::resume(
            Money::from_cents(120000),
            Money::from_cents(11500),
            12,
            6,
            ContractStatus::Active,
        )
        .unwrap();

        let quote = contract.complete_buyout(Rate::from_bps(1000)).unwrap();
        assert_eq!(quote.remaining_balance.cents(), 69000);
        assert_eq!(quote.early_buyout_price.cents(), 62100);
        assert_eq!(quote.savings.cents(), 6900);
        assert_eq!(contract.status(), ContractStatus::Completed);
        assert_eq!(contract.remaining_payments(), 0);

        assert!(contract.complete_buyout(Rate::from_bps(1000)).is_err());
    }

    #[test]
    fn test_cancelled_contract_rejects_buyout() {
        let mut contract = contract();
        contract.cancel().unwrap();
        assert!(matches!(
            contract.complete_buyout(Rate::zero()),
            Err(CoreError::InvalidContractStatus { .. })
        ));
    }

    #[test]
    fn test_payment_schedule() {
        let mut contract = RentalContract::new(
            Money::from_cents(120000),
            Money::from_cents(42000),
            3,
        )
        .unwrap();
        contract.record_payment().unwrap();

        let start = date(2024, 1, 15);
        let schedule = contract.payment_schedule(start).unwrap();
        assert_eq!(schedule.len(), 3);

        assert_eq!(schedule[0].due_date, start);
        assert_eq!(schedule[1].due_date, date(2024, 2, 14));
        assert_eq!(schedule[2].due_date, date(2024, 3, 15));

        assert_eq!(schedule[0].balance_after.cents(), 84000);
        assert_eq!(schedule[2].balance_after, Money::zero());
        assert!(schedule[0].paid);
        assert!(!schedule[1].paid);

        assert_eq!(contract.end_date(start).unwrap(), date(2024, 4, 14));
        assert_eq!(contract.next_payment_date(start).unwrap(), Some(date(2024, 2, 14)));
    }
}
