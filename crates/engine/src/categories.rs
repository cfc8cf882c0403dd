//! Expense categories and the per-category breakdown.

use serde::{Deserialize, Serialize};

use crate::{EngineError, Money, ResultEngine};

/// Expense category (closed set).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Transport,
    Accommodation,
    Food,
    Activity,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        Self::Transport,
        Self::Accommodation,
        Self::Food,
        Self::Activity,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Accommodation => "accommodation",
            Self::Food => "food",
            Self::Activity => "activity",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "transport" => Ok(Self::Transport),
            "accommodation" => Ok(Self::Accommodation),
            "food" => Ok(Self::Food),
            "activity" => Ok(Self::Activity),
            "other" => Ok(Self::Other),
            other => Err(EngineError::Validation(format!(
                "invalid expense category: {other}"
            ))),
        }
    }
}

/// Per-category totals in cents.
///
/// The struct shape guarantees the breakdown always carries exactly the five
/// fixed keys; [`CategoryBreakdown::from_json`] rejects anything else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryBreakdown {
    pub transport: Money,
    pub accommodation: Money,
    pub food: Money,
    pub activity: Money,
    pub other: Money,
}

impl CategoryBreakdown {
    #[must_use]
    pub fn get(&self, category: ExpenseCategory) -> Money {
        match category {
            ExpenseCategory::Transport => self.transport,
            ExpenseCategory::Accommodation => self.accommodation,
            ExpenseCategory::Food => self.food,
            ExpenseCategory::Activity => self.activity,
            ExpenseCategory::Other => self.other,
        }
    }

    /// Adds `amount` to the given category's total.
    pub fn add(&mut self, category: ExpenseCategory, amount: Money) -> ResultEngine<()> {
        let slot = match category {
            ExpenseCategory::Transport => &mut self.transport,
            ExpenseCategory::Accommodation => &mut self.accommodation,
            ExpenseCategory::Food => &mut self.food,
            ExpenseCategory::Activity => &mut self.activity,
            ExpenseCategory::Other => &mut self.other,
        };
        *slot = slot
            .checked_add(amount)
            .ok_or_else(|| EngineError::Aggregate("category total overflows".to_string()))?;
        Ok(())
    }

    /// Sum over the five categories.
    #[must_use]
    pub fn total(&self) -> Money {
        ExpenseCategory::ALL
            .into_iter()
            .fold(Money::ZERO, |acc, category| acc + self.get(category))
    }

    /// All values must be non-negative; anything else is a malformed row.
    pub fn validate(&self) -> ResultEngine<()> {
        for category in ExpenseCategory::ALL {
            if self.get(category).is_negative() {
                return Err(EngineError::Validation(format!(
                    "category_breakdown value for {} must not be negative",
                    category.as_str()
                )));
            }
        }
        Ok(())
    }

    /// Parses the stored JSON column, enforcing the fixed key set and
    /// non-negative values.
    pub fn from_json(raw: &str) -> ResultEngine<Self> {
        let breakdown: CategoryBreakdown = serde_json::from_str(raw).map_err(|err| {
            EngineError::Validation(format!("malformed category_breakdown: {err}"))
        })?;
        breakdown.validate()?;
        Ok(breakdown)
    }

    pub fn to_json(&self) -> ResultEngine<String> {
        serde_json::to_string(self)
            .map_err(|err| EngineError::Aggregate(format!("cannot encode breakdown: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_keeps_all_five_keys() {
        let mut breakdown = CategoryBreakdown::default();
        breakdown
            .add(ExpenseCategory::Food, Money::new(1500))
            .unwrap();
        let raw = breakdown.to_json().unwrap();

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 5);
        for category in ExpenseCategory::ALL {
            assert!(object.contains_key(category.as_str()));
        }
        assert_eq!(object["food"], serde_json::json!(1500));
        assert_eq!(object["transport"], serde_json::json!(0));
    }

    #[test]
    fn from_json_rejects_unknown_keys() {
        let raw = r#"{"transport":0,"accommodation":0,"food":0,"activity":0,"other":0,"misc":3}"#;
        assert!(matches!(
            CategoryBreakdown::from_json(raw),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn from_json_rejects_negative_values() {
        let raw = r#"{"transport":-1,"accommodation":0,"food":0,"activity":0,"other":0}"#;
        assert!(matches!(
            CategoryBreakdown::from_json(raw),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn from_json_rejects_missing_keys() {
        let raw = r#"{"transport":0,"food":0}"#;
        assert!(matches!(
            CategoryBreakdown::from_json(raw),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn total_matches_the_sum_of_values() {
        let mut breakdown = CategoryBreakdown::default();
        breakdown
            .add(ExpenseCategory::Food, Money::new(1000))
            .unwrap();
        breakdown
            .add(ExpenseCategory::Food, Money::new(500))
            .unwrap();
        breakdown
            .add(ExpenseCategory::Transport, Money::new(2000))
            .unwrap();
        assert_eq!(breakdown.total(), Money::new(3500));
    }
}
