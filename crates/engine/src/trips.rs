//! Trip primitives.
//!
//! A `Trip` is the root record expenses hang off; it owns at most one
//! derived [`ExpenseSummary`] and a replaceable set of locations.
//!
//! [`ExpenseSummary`]: crate::summaries::ExpenseSummary

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: Money,
    pub notes: Option<String>,
    /// Attached locations; filled from the join table when loading.
    pub location_ids: Vec<Uuid>,
}

impl Trip {
    /// Builds a new trip, enforcing the store-boundary invariants:
    /// `end_date >= start_date` and a non-negative budget.
    pub fn new(
        user_id: String,
        title: String,
        destination: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        budget: Money,
        notes: Option<String>,
    ) -> ResultEngine<Self> {
        if end_date < start_date {
            return Err(EngineError::Validation(
                "end_date must not precede start_date".to_string(),
            ));
        }
        if budget.is_negative() {
            return Err(EngineError::Validation(
                "budget_cents must not be negative".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            destination,
            start_date,
            end_date,
            budget,
            notes,
            location_ids: Vec::new(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub destination: String,
    pub start_date: Date,
    pub end_date: Date,
    pub budget_cents: i64,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::expenses::Entity")]
    Expenses,
    #[sea_orm(has_many = "super::trip_locations::Entity")]
    TripLocations,
    #[sea_orm(has_one = "super::summaries::Entity")]
    Summary,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::summaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Summary.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Trip> for ActiveModel {
    fn from(trip: &Trip) -> Self {
        Self {
            id: ActiveValue::Set(trip.id.to_string()),
            user_id: ActiveValue::Set(trip.user_id.clone()),
            title: ActiveValue::Set(trip.title.clone()),
            destination: ActiveValue::Set(trip.destination.clone()),
            start_date: ActiveValue::Set(trip.start_date),
            end_date: ActiveValue::Set(trip.end_date),
            budget_cents: ActiveValue::Set(trip.budget.cents()),
            notes: ActiveValue::Set(trip.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Trip {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("trip not exists".to_string()))?,
            user_id: model.user_id,
            title: model.title,
            destination: model.destination,
            start_date: model.start_date,
            end_date: model.end_date,
            budget: Money::new(model.budget_cents),
            notes: model.notes,
            location_ids: Vec::new(),
        })
    }
}
