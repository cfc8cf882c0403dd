use std::collections::HashMap;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Trip, TripNewCmd, TripUpdateCmd, locations,
    policy::{self, Action, ListScope, Principal, ResourceKind},
    trip_locations, trips,
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Creates a trip owned by the actor and returns its id.
    ///
    /// `location_ids` becomes the trip's location set; every id must name an
    /// existing location.
    pub async fn new_trip(&self, actor: &Principal, cmd: TripNewCmd) -> ResultEngine<Uuid> {
        Self::require_permission(actor, Action::Create, ResourceKind::Trip)?;
        let title = normalize_required_text(&cmd.title, "trip title")?;
        let destination = normalize_required_text(&cmd.destination, "destination")?;
        let trip = Trip::new(
            actor.user_id.clone(),
            title,
            destination,
            cmd.start_date,
            cmd.end_date,
            cmd.budget,
            normalize_optional_text(cmd.notes.as_deref()),
        )?;
        with_tx!(self, |db_tx| {
            let model: trips::ActiveModel = (&trip).into();
            model.insert(&db_tx).await?;
            self.replace_trip_locations(&db_tx, trip.id, &cmd.location_ids)
                .await?;
            Ok(trip.id)
        })
    }

    /// Returns a single trip by id, location set included.
    pub async fn trip(&self, actor: &Principal, trip_id: Uuid) -> ResultEngine<Trip> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_trip_action(&db_tx, actor, trip_id, Action::Read)
                .await?;
            let mut trip = Trip::try_from(model)?;
            trip.location_ids = self.trip_location_ids(&db_tx, trip_id).await?;
            Ok(trip)
        })
    }

    /// Lists trips visible to the actor, narrowed by the list-time scope.
    pub async fn trips(&self, actor: &Principal) -> ResultEngine<Vec<Trip>> {
        Self::require_permission(actor, Action::Read, ResourceKind::Trip)?;
        with_tx!(self, |db_tx| {
            let models = match policy::scope(Some(actor), ResourceKind::Trip) {
                ListScope::All => trips::Entity::find().all(&db_tx).await?,
                ListScope::Owner => {
                    trips::Entity::find()
                        .filter(trips::Column::UserId.eq(actor.user_id.clone()))
                        .all(&db_tx)
                        .await?
                }
                ListScope::Nothing => Vec::new(),
            };

            let mut trips_out = Vec::with_capacity(models.len());
            for model in models {
                trips_out.push(Trip::try_from(model)?);
            }

            let ids: Vec<String> = trips_out.iter().map(|t| t.id.to_string()).collect();
            let mut by_trip: HashMap<String, Vec<Uuid>> = HashMap::new();
            if !ids.is_empty() {
                let rows = trip_locations::Entity::find()
                    .filter(trip_locations::Column::TripId.is_in(ids))
                    .all(&db_tx)
                    .await?;
                for row in rows {
                    let location_id = Uuid::parse_str(&row.location_id).map_err(|_| {
                        EngineError::KeyNotFound("location not exists".to_string())
                    })?;
                    by_trip.entry(row.trip_id).or_default().push(location_id);
                }
            }
            for trip in &mut trips_out {
                if let Some(location_ids) = by_trip.remove(&trip.id.to_string()) {
                    trip.location_ids = location_ids;
                }
            }
            Ok(trips_out)
        })
    }

    /// Replaces a trip's scalar fields and, when the command carries
    /// `location_ids`, its location set.
    pub async fn update_trip(&self, actor: &Principal, cmd: TripUpdateCmd) -> ResultEngine<()> {
        let title = normalize_required_text(&cmd.title, "trip title")?;
        let destination = normalize_required_text(&cmd.destination, "destination")?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_trip_action(&db_tx, actor, cmd.trip_id, Action::Update)
                .await?;
            // Revalidates the date/budget invariants; ownership is untouched.
            let updated = Trip::new(
                model.user_id.clone(),
                title,
                destination,
                cmd.start_date,
                cmd.end_date,
                cmd.budget,
                normalize_optional_text(cmd.notes.as_deref()),
            )?;
            let active = trips::ActiveModel {
                id: ActiveValue::Set(model.id),
                title: ActiveValue::Set(updated.title),
                destination: ActiveValue::Set(updated.destination),
                start_date: ActiveValue::Set(updated.start_date),
                end_date: ActiveValue::Set(updated.end_date),
                budget_cents: ActiveValue::Set(updated.budget.cents()),
                notes: ActiveValue::Set(updated.notes),
                ..Default::default()
            };
            active.update(&db_tx).await?;

            if let Some(location_ids) = &cmd.location_ids {
                self.replace_trip_locations(&db_tx, cmd.trip_id, location_ids)
                    .await?;
            }
            Ok(())
        })
    }

    /// Deletes a trip; expenses, the summary and join rows go with it.
    pub async fn delete_trip(&self, actor: &Principal, trip_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_trip_action(&db_tx, actor, trip_id, Action::Delete)
                .await?;
            trips::Entity::delete_by_id(model.id.clone())
                .exec(&db_tx)
                .await?;
            tracing::info!(actor = %actor.user_id, trip_id = %model.id, "trip deleted");
            Ok(())
        })
    }

    pub(super) async fn trip_location_ids(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
    ) -> ResultEngine<Vec<Uuid>> {
        let rows = trip_locations::Entity::find()
            .filter(trip_locations::Column::TripId.eq(trip_id.to_string()))
            .all(db)
            .await?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            ids.push(
                Uuid::parse_str(&row.location_id)
                    .map_err(|_| EngineError::KeyNotFound("location not exists".to_string()))?,
            );
        }
        Ok(ids)
    }

    /// Replaces the join rows for `trip_id` with `location_ids`, verifying
    /// each referenced location exists.
    async fn replace_trip_locations(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
        location_ids: &[Uuid],
    ) -> ResultEngine<()> {
        let mut unique = location_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        for location_id in &unique {
            let exists = locations::Entity::find_by_id(location_id.to_string())
                .one(db)
                .await?
                .is_some();
            if !exists {
                return Err(EngineError::KeyNotFound("location not exists".to_string()));
            }
        }

        trip_locations::Entity::delete_many()
            .filter(trip_locations::Column::TripId.eq(trip_id.to_string()))
            .exec(db)
            .await?;
        for location_id in &unique {
            let row = trip_locations::ActiveModel {
                trip_id: ActiveValue::Set(trip_id.to_string()),
                location_id: ActiveValue::Set(location_id.to_string()),
            };
            row.insert(db).await?;
        }
        Ok(())
    }
}
