//! Location primitives.

use chrono::NaiveTime;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    /// Opening and closing hours are stored verbatim; `open_time` is allowed
    /// to be later than `close_time` (overnight venues rely on it).
    pub open_time: NaiveTime,
    pub close_time: NaiveTime,
    pub description: Option<String>,
}

impl Location {
    pub fn new(
        user_id: String,
        title: String,
        open_time: NaiveTime,
        close_time: NaiveTime,
        description: Option<String>,
    ) -> ResultEngine<Self> {
        if title.trim().is_empty() {
            return Err(EngineError::Validation(
                "location title must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            open_time,
            close_time,
            description,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub open_time: Time,
    pub close_time: Time,
    pub description: Option<String>,
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
    #[sea_orm(has_many = "super::trip_locations::Entity")]
    TripLocations,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Location> for ActiveModel {
    fn from(location: &Location) -> Self {
        Self {
            id: ActiveValue::Set(location.id.to_string()),
            user_id: ActiveValue::Set(location.user_id.clone()),
            title: ActiveValue::Set(location.title.clone()),
            open_time: ActiveValue::Set(location.open_time),
            close_time: ActiveValue::Set(location.close_time),
            description: ActiveValue::Set(location.description.clone()),
        }
    }
}

impl TryFrom<Model> for Location {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("location not exists".to_string()))?,
            user_id: model.user_id,
            title: model.title,
            open_time: model.open_time,
            close_time: model.close_time,
            description: model.description,
        })
    }
}
