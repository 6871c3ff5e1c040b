use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::router::RouterError;

/// The three operations this service answers.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Operation {
    CalculateFinancialSummary,
    SendMonthlyReport,
    SendBudgetAlert
}

impl Operation {
    pub fn takes_arguments(&self) -> bool {
        !matches!(self, Operation::CalculateFinancialSummary)
    }
}

impl FromStr for Operation {
    type Err = RouterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "calculateFinancialSummary" => Ok(Operation::CalculateFinancialSummary),
            "sendMonthlyReport" => Ok(Operation::SendMonthlyReport),
            "sendBudgetAlert" => Ok(Operation::SendBudgetAlert),
            other => Err(RouterError::unknown_operation(Some(other)))
        }
    }
}

/// Raw argument object. Fields are decoded one at a time by the operation that
/// reads them, so a malformed field only rejects operations that use it.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Map<String, Value>
}

#[derive(Debug, Clone)]
pub struct OperationRequest {
    pub operation: Operation,
    pub arguments: Arguments
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MonthlyReportRequest {
    pub email: String
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BudgetAlertRequest {
    pub email: String,
    pub category: String,
    pub exceeded: Decimal
}

impl Arguments {
    pub fn from_value(value: &Value) -> Result<Self, RouterError> {
        match value {
            Value::Object(values) => Ok(Self { values: values.clone() }),
            _ => Err(RouterError::invalid_argument("Invalid arguments: expected an object"))
        }
    }

    /// Trimmed string argument; absent, null and blank all read as `None`.
    pub fn text(&self, key: &str) -> Result<Option<String>, RouterError> {
        match self.field(key) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.trim()).filter(|text| !text.is_empty()).map(str::to_string)),
            Some(_) => Err(RouterError::invalid_argument(&format!("Invalid argument {key}: expected a string")))
        }
    }

    /// Decimal argument given either as a JSON number or a numeric string.
    pub fn decimal(&self, key: &str) -> Result<Option<Decimal>, RouterError> {
        self.field(key)
            .map(|value| <Decimal as Deserialize>::deserialize(value).map_err(|error| {
                RouterError::invalid_argument(&format!("Invalid argument {key}: {error}"))
            }))
            .transpose()
    }

    pub fn monthly_report(&self) -> Result<MonthlyReportRequest, RouterError> {
        Ok(MonthlyReportRequest {
            email: required(self.text("email")?, "Email is required")?
        })
    }

    pub fn budget_alert(&self) -> Result<BudgetAlertRequest, RouterError> {
        let email = required(self.text("email")?, "Email is required")?;
        let category = required(self.text("category")?, "Category is required")?;
        let exceeded = required(self.decimal("exceeded")?, "Exceeded amount is required")?;

        Ok(BudgetAlertRequest { email, category, exceeded })
    }

    fn field(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|value| !value.is_null())
    }
}

fn required<T>(value: Option<T>, reason: &str) -> Result<T, RouterError> {
    value.ok_or_else(|| RouterError::invalid_argument(reason))
}

/// Reads the operation name and arguments from whichever layout the gateway used.
///
/// The name comes from `info.fieldName`, then `fieldName`. Arguments come from
/// `arguments`, then `args`; a missing or null argument object is treated as empty.
pub fn normalize(event: &Value) -> Result<OperationRequest, RouterError> {
    let name = event.pointer("/info/fieldName")
        .and_then(Value::as_str)
        .or_else(|| event.get("fieldName").and_then(Value::as_str));

    let operation = match name {
        Some(name) => name.parse::<Operation>()?,
        None => return Err(RouterError::unknown_operation(None))
    };

    if !operation.takes_arguments() {
        return Ok(OperationRequest { operation, arguments: Arguments::default() });
    }

    let raw_arguments = ["arguments", "args"].iter()
        .filter_map(|key| event.get(*key))
        .find(|value| !value.is_null());

    let arguments = match raw_arguments {
        Some(value) => Arguments::from_value(value)?,
        None => Arguments::default()
    };

    Ok(OperationRequest { operation, arguments })
}
