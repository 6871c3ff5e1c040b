mod errors;

use rust_decimal::Decimal;

use crate::models::{CategorySpend, FinancialSummary, TransactionRecord, TransactionType};
use crate::types::round2;

pub use errors::AggregateError;

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Folds a record set into income, expense, balance and savings-rate totals.
///
/// Records whose type is neither INCOME nor EXPENSE contribute to neither total.
/// The fold is commutative, so the result does not depend on record order.
///
/// # Errors
/// Returns `AggregateError::Overflow` when a total or the savings rate leaves the `Decimal` range.
pub fn summarize(records: &[TransactionRecord]) -> Result<FinancialSummary, AggregateError> {
    let (total_income, total_expenses) = records.iter().try_fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expenses), record| match record.kind {
            TransactionType::Income => income.checked_add(record.amount)
                .map(|income| (income, expenses))
                .ok_or_else(|| AggregateError::overflow("total income")),
            TransactionType::Expense => expenses.checked_add(record.amount)
                .map(|expenses| (income, expenses))
                .ok_or_else(|| AggregateError::overflow("total expenses")),
            TransactionType::Other => Ok((income, expenses))
        }
    )?;

    let balance = total_income.checked_sub(total_expenses)
        .ok_or_else(|| AggregateError::overflow("balance"))?;

    Ok(FinancialSummary {
        total_income,
        total_expenses,
        balance,
        savings_rate: savings_rate(balance, total_income)?
    })
}

fn savings_rate(balance: Decimal, total_income: Decimal) -> Result<Decimal, AggregateError> {
    if total_income <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    balance.checked_div(total_income)
        .and_then(|ratio| ratio.checked_mul(PERCENT))
        .map(round2)
        .ok_or_else(|| AggregateError::overflow("savings rate"))
}

/// Totals the EXPENSE records of one category.
pub fn category_spend(category: &str, records: &[TransactionRecord]) -> Result<CategorySpend, AggregateError> {
    let mut matching = records.iter()
        .filter(|record| record.kind == TransactionType::Expense && record.category == category);

    let (total_spent, transaction_count) = matching.try_fold((Decimal::ZERO, 0), |(total, count), record| {
        total.checked_add(record.amount)
            .map(|total| (total, count + 1))
            .ok_or_else(|| AggregateError::overflow("category spend"))
    })?;

    Ok(CategorySpend {
        category: category.to_string(),
        total_spent,
        transaction_count
    })
}
