use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// A fully validated transaction, ready for the bulk-create endpoint.
///
/// Candidate rows hold raw user-editable strings right up to commit time;
/// a `NormalizedTransaction` only exists once every field has survived strict
/// validation, so the batch handed to the collaborator is well-formed by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
    pub category: String,
}

impl NormalizedTransaction {
    pub fn new(date: NaiveDate, description: &str, amount: Money, category: &str) -> Self {
        NormalizedTransaction {
            date,
            description: description.to_string(),
            amount,
            category: category.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn serializes_wire_shape() {
        let tx = NormalizedTransaction::new(
            NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            "Coffee Shop",
            Money::from_decimal(Decimal::from_str("-4.5").unwrap()),
            "Dining",
        );
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["date"], "2024-01-05");
        assert_eq!(value["description"], "Coffee Shop");
        assert_eq!(value["amount"], "-4.5");
        assert_eq!(value["category"], "Dining");
    }
}
