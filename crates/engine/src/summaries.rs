//! Derived per-trip expense summary.
//!
//! The summary is never edited directly. It is recomputed from the full
//! expense set of its trip inside the same transaction as every expense
//! write; see `ops::summaries::refresh`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{CategoryBreakdown, EngineError, Expense, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub trip_id: Uuid,
    pub total: Money,
    pub category_breakdown: CategoryBreakdown,
    pub generated_at: DateTime<Utc>,
}

impl ExpenseSummary {
    /// Recomputes the summary from scratch over `expenses`, all of which must
    /// belong to `trip_id`. The total is derived from the breakdown, so the
    /// two can never disagree.
    pub fn compute(trip_id: Uuid, expenses: &[Expense]) -> ResultEngine<Self> {
        let mut breakdown = CategoryBreakdown::default();
        for expense in expenses {
            if expense.trip_id != trip_id {
                return Err(EngineError::Aggregate(format!(
                    "expense \"{}\" belongs to another trip",
                    expense.id
                )));
            }
            breakdown.add(expense.category, expense.amount)?;
        }
        Ok(Self {
            trip_id,
            total: breakdown.total(),
            category_breakdown: breakdown,
            generated_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expense_summaries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub trip_id: String,
    pub total_cents: i64,
    pub category_breakdown: String,
    pub generated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trips::Entity",
        from = "Column::TripId",
        to = "super::trips::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Trips,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&ExpenseSummary> for ActiveModel {
    type Error = EngineError;

    fn try_from(summary: &ExpenseSummary) -> Result<Self, Self::Error> {
        Ok(Self {
            trip_id: ActiveValue::Set(summary.trip_id.to_string()),
            total_cents: ActiveValue::Set(summary.total.cents()),
            category_breakdown: ActiveValue::Set(summary.category_breakdown.to_json()?),
            generated_at: ActiveValue::Set(summary.generated_at),
        })
    }
}

impl TryFrom<Model> for ExpenseSummary {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let breakdown = CategoryBreakdown::from_json(&model.category_breakdown)?;
        Ok(Self {
            trip_id: Uuid::parse_str(&model.trip_id)
                .map_err(|_| EngineError::KeyNotFound("trip not exists".to_string()))?,
            total: Money::new(model.total_cents),
            category_breakdown: breakdown,
            generated_at: model.generated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::ExpenseCategory;

    fn expense(trip_id: Uuid, category: ExpenseCategory, cents: i64) -> Expense {
        Expense::new(
            trip_id,
            "alice".to_string(),
            category,
            Money::new(cents),
            None,
            NaiveDate::from_ymd_opt(2026, 7, 3).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn compute_over_no_expenses_is_all_zeros() {
        let trip_id = Uuid::new_v4();
        let summary = ExpenseSummary::compute(trip_id, &[]).unwrap();
        assert_eq!(summary.total, Money::ZERO);
        assert_eq!(summary.category_breakdown, CategoryBreakdown::default());
    }

    #[test]
    fn total_always_equals_breakdown_sum() {
        let trip_id = Uuid::new_v4();
        let expenses = [
            expense(trip_id, ExpenseCategory::Food, 1250),
            expense(trip_id, ExpenseCategory::Food, 750),
            expense(trip_id, ExpenseCategory::Transport, 3000),
            expense(trip_id, ExpenseCategory::Other, 1),
        ];
        let summary = ExpenseSummary::compute(trip_id, &expenses).unwrap();
        assert_eq!(summary.total, Money::new(5001));
        assert_eq!(summary.category_breakdown.food, Money::new(2000));
        assert_eq!(summary.category_breakdown.transport, Money::new(3000));
        assert_eq!(summary.category_breakdown.other, Money::new(1));
        assert_eq!(summary.category_breakdown.total(), summary.total);
    }

    #[test]
    fn recomputation_is_idempotent_up_to_timestamp() {
        let trip_id = Uuid::new_v4();
        let expenses = [
            expense(trip_id, ExpenseCategory::Food, 1250),
            expense(trip_id, ExpenseCategory::Transport, 3000),
        ];
        let first = ExpenseSummary::compute(trip_id, &expenses).unwrap();
        let second = ExpenseSummary::compute(trip_id, &expenses).unwrap();
        assert_eq!(first.total, second.total);
        assert_eq!(first.category_breakdown, second.category_breakdown);
    }

    #[test]
    fn compute_refuses_foreign_expenses() {
        let trip_id = Uuid::new_v4();
        let foreign = expense(Uuid::new_v4(), ExpenseCategory::Food, 100);
        assert!(matches!(
            ExpenseSummary::compute(trip_id, &[foreign]),
            Err(EngineError::Aggregate(_))
        ));
    }
}
