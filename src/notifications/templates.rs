//! Message bodies for the two notification kinds. Output is meant for people, not parsers.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{AttributeType, CategorySpend, FinancialSummary, OutboundMessage};
use crate::types::{Currency, Percentage};

const SIGN_OFF: &str = "Best regards,\nFinance Tracker Team";

pub fn monthly_report(summary: &FinancialSummary, transaction_count: usize, email: &str, generated_on: NaiveDate) -> OutboundMessage {
    let body = format!(
        "Hello,\n\
         \n\
         Here is your monthly financial report:\n\
         \n\
         Total Income: {}\n\
         Total Expenses: {}\n\
         Balance: {}\n\
         Savings Rate: {}\n\
         \n\
         Total Transactions: {transaction_count}\n\
         \n\
         This report was generated on {}.\n\
         \n\
         {SIGN_OFF}",
        Currency(summary.total_income),
        Currency(summary.total_expenses),
        Currency(summary.balance),
        Percentage(summary.savings_rate),
        generated_on.format("%Y-%m-%d")
    );

    OutboundMessage::new("Your Monthly Financial Report", body)
        .with_attribute("email", AttributeType::String, email)
}

pub fn budget_alert(spend: &CategorySpend, exceeded: Decimal, email: &str) -> OutboundMessage {
    let category = &spend.category;
    let body = format!(
        "Hello,\n\
         \n\
         BUDGET ALERT\n\
         \n\
         You have exceeded your budget for {category} by {}.\n\
         \n\
         Category: {category}\n\
         Total Spent: {}\n\
         Number of Transactions: {}\n\
         \n\
         Consider reviewing your spending in this category.\n\
         \n\
         {SIGN_OFF}",
        Currency(exceeded),
        Currency(spend.total_spent),
        spend.transaction_count
    );

    OutboundMessage::new(format!("Budget Alert: {category}"), body)
        .with_attribute("email", AttributeType::String, email)
        .with_attribute("category", AttributeType::String, category.as_str())
        .with_attribute("exceeded", AttributeType::Number, exceeded.normalize().to_string())
}
