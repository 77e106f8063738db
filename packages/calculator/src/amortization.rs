//! Level-payment amortization schedules.
//!
//! Derives a loan's outstanding balance at any date from its principal,
//! annual interest rate and term, for loans whose servicing data does not
//! carry a current balance. Amounts are rounded to cents per payment.

use chrono::{Months, NaiveDate};

/// Errors from schedule generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmortizationError {
    /// Principal, rate, or term is out of range.
    #[error("Invalid loan terms: {0}")]
    InvalidTerms(String),

    /// A payment date falls outside the supported calendar.
    #[error("Payment {payment} date is out of range")]
    DateOutOfRange {
        /// 1-based payment number.
        payment: u32,
    },
}

/// One monthly payment.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    /// 1-based payment number.
    pub number: u32,
    /// Due date, one calendar month after the previous payment.
    pub date: NaiveDate,
    /// Principal plus interest.
    pub amount: f64,
    pub principal: f64,
    pub interest: f64,
    /// Balance left after this payment.
    pub remaining_balance: f64,
}

/// Full repayment schedule for one loan.
#[derive(Debug, Clone, PartialEq)]
pub struct AmortizationSchedule {
    /// Amount borrowed.
    pub principal: f64,
    /// Level monthly payment.
    pub monthly_payment: f64,
    /// Payments in date order.
    pub payments: Vec<Payment>,
}

impl AmortizationSchedule {
    /// Sum of interest over the whole schedule.
    #[must_use]
    pub fn total_interest(&self) -> f64 {
        round_cents(self.payments.iter().map(|p| p.interest).sum())
    }

    /// Outstanding balance after every payment due on or before `as_of`.
    ///
    /// Before the first payment this is the full principal.
    #[must_use]
    pub fn balance_as_of(&self, as_of: NaiveDate) -> f64 {
        self.payments
            .iter()
            .take_while(|p| p.date <= as_of)
            .last()
            .map_or(self.principal, |p| p.remaining_balance)
    }
}

/// Builds a level-payment schedule. `annual_rate` is a fraction
/// (`0.055` for 5.5%).
///
/// # Errors
///
/// Returns [`AmortizationError::InvalidTerms`] if the principal is not
/// positive, the rate is negative, or the term is zero.
pub fn generate_schedule(
    principal: f64,
    annual_rate: f64,
    term_months: u32,
    origination_date: NaiveDate,
) -> Result<AmortizationSchedule, AmortizationError> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(AmortizationError::InvalidTerms(format!(
            "principal must be greater than 0, got {principal}"
        )));
    }
    if !annual_rate.is_finite() || annual_rate < 0.0 {
        return Err(AmortizationError::InvalidTerms(format!(
            "rate must not be negative, got {annual_rate}"
        )));
    }
    if term_months == 0 {
        return Err(AmortizationError::InvalidTerms(
            "term must be at least one month".to_string(),
        ));
    }

    let monthly_rate = annual_rate / 12.0;
    let monthly_payment = if annual_rate > 0.0 {
        let growth = (1.0 + monthly_rate).powf(f64::from(term_months));
        principal * monthly_rate * growth / (growth - 1.0)
    } else {
        principal / f64::from(term_months)
    };

    let mut payments = Vec::with_capacity(term_months as usize);
    let mut remaining = principal;

    for number in 1..=term_months {
        let interest = remaining * monthly_rate;
        let principal_paid = (monthly_payment - interest).min(remaining);
        remaining = (remaining - principal_paid).max(0.0);

        let date = origination_date
            .checked_add_months(Months::new(number))
            .ok_or(AmortizationError::DateOutOfRange { payment: number })?;

        payments.push(Payment {
            number,
            date,
            amount: round_cents(interest + principal_paid),
            principal: round_cents(principal_paid),
            interest: round_cents(interest),
            remaining_balance: round_cents(remaining),
        });

        if remaining <= 0.0 {
            break;
        }
    }

    Ok(AmortizationSchedule {
        principal,
        monthly_payment: round_cents(monthly_payment),
        payments,
    })
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn level_payment_matches_annuity_formula() {
        let schedule = generate_schedule(35_000.0, 0.055, 60, date(2023, 1, 15)).unwrap();

        // 35000 at 5.5% over 60 months: 668.55 per month
        assert!((schedule.monthly_payment - 668.55).abs() < 0.01);
        assert_eq!(schedule.payments.len(), 60);
        assert_eq!(schedule.payments[0].date, date(2023, 2, 15));
        assert!((schedule.payments[0].interest - 160.42).abs() < 0.01);
        assert!(schedule.payments.last().unwrap().remaining_balance.abs() < 0.01);
    }

    #[test]
    fn zero_rate_splits_principal_evenly() {
        let schedule = generate_schedule(12_000.0, 0.0, 12, date(2023, 1, 1)).unwrap();
        assert!((schedule.monthly_payment - 1_000.0).abs() < f64::EPSILON);
        assert!(schedule.total_interest().abs() < f64::EPSILON);
        assert!((schedule.payments[5].remaining_balance - 6_000.0).abs() < 1e-9);
    }

    #[test]
    fn balance_as_of_counts_payments_due_by_that_date() {
        let schedule = generate_schedule(12_000.0, 0.0, 12, date(2023, 1, 1)).unwrap();

        assert!((schedule.balance_as_of(date(2023, 1, 31)) - 12_000.0).abs() < f64::EPSILON);
        assert!((schedule.balance_as_of(date(2023, 2, 1)) - 11_000.0).abs() < 1e-9);
        assert!((schedule.balance_as_of(date(2023, 12, 31)) - 1_000.0).abs() < 1e-9);
        assert!(schedule.balance_as_of(date(2030, 1, 1)).abs() < 1e-9);
    }

    #[test]
    fn month_end_origination_clamps_payment_dates() {
        let schedule = generate_schedule(1_000.0, 0.0, 2, date(2023, 1, 31)).unwrap();
        assert_eq!(schedule.payments[0].date, date(2023, 2, 28));
        assert_eq!(schedule.payments[1].date, date(2023, 3, 31));
    }

    #[test]
    fn rejects_invalid_terms() {
        let start = date(2023, 1, 1);
        assert!(matches!(
            generate_schedule(0.0, 0.05, 12, start),
            Err(AmortizationError::InvalidTerms(_))
        ));
        assert!(matches!(
            generate_schedule(1_000.0, -0.01, 12, start),
            Err(AmortizationError::InvalidTerms(_))
        ));
        assert!(matches!(
            generate_schedule(1_000.0, 0.05, 0, start),
            Err(AmortizationError::InvalidTerms(_))
        ));
    }
}
