//! Expense primitives.
//!
//! Every expense belongs to exactly one trip; the association is fixed at
//! creation. Amounts are strictly positive [`Money`] values and the expense
//! date must fall inside the owning trip's date range (checked by ops, which
//! hold the trip).

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ExpenseCategory, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub trip_id: Uuid,
    /// Username of whoever created or last revised the expense.
    pub user_id: String,
    pub category: ExpenseCategory,
    pub amount: Money,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(
        trip_id: Uuid,
        user_id: String,
        category: ExpenseCategory,
        amount: Money,
        description: Option<String>,
        date: NaiveDate,
    ) -> ResultEngine<Self> {
        if !amount.is_positive() {
            return Err(EngineError::Validation(
                "amount_cents must be strictly positive".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            trip_id,
            user_id,
            category,
            amount,
            description,
            date,
        })
    }

    /// Checks the expense date against the owning trip's range.
    pub fn check_date_within(&self, start: NaiveDate, end: NaiveDate) -> ResultEngine<()> {
        if self.date < start || self.date > end {
            return Err(EngineError::Validation(
                "date must fall within the trip's date range".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub trip_id: String,
    pub user_id: String,
    pub category: String,
    pub amount_cents: i64,
    pub description: Option<String>,
    pub date: Date,
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
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::trips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trips.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            trip_id: ActiveValue::Set(expense.trip_id.to_string()),
            user_id: ActiveValue::Set(expense.user_id.clone()),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            amount_cents: ActiveValue::Set(expense.amount.cents()),
            description: ActiveValue::Set(expense.description.clone()),
            date: ActiveValue::Set(expense.date),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            trip_id: Uuid::parse_str(&model.trip_id)
                .map_err(|_| EngineError::KeyNotFound("trip not exists".to_string()))?,
            user_id: model.user_id,
            category: ExpenseCategory::try_from(model.category.as_str())?,
            amount: Money::new(model.amount_cents),
            description: model.description,
            date: model.date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_non_positive_amounts() {
        for cents in [0, -1] {
            let result = Expense::new(
                Uuid::new_v4(),
                "alice".to_string(),
                ExpenseCategory::Food,
                Money::new(cents),
                Some("lunch".to_string()),
                date("2026-07-03"),
            );
            assert!(matches!(result, Err(EngineError::Validation(_))));
        }
    }

    #[test]
    fn date_range_check_is_inclusive() {
        let expense = Expense::new(
            Uuid::new_v4(),
            "alice".to_string(),
            ExpenseCategory::Food,
            Money::new(100),
            None,
            date("2026-07-01"),
        )
        .unwrap();
        assert!(expense
            .check_date_within(date("2026-07-01"), date("2026-07-10"))
            .is_ok());
        assert!(expense
            .check_date_within(date("2026-07-02"), date("2026-07-10"))
            .is_err());
    }
}
