use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Location, LocationNewCmd, LocationUpdateCmd, ResultEngine, locations,
    policy::{self, Action, ListScope, Principal, ResourceKind},
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Creates a location owned by the actor and returns its id.
    pub async fn new_location(
        &self,
        actor: &Principal,
        cmd: LocationNewCmd,
    ) -> ResultEngine<Uuid> {
        Self::require_permission(actor, Action::Create, ResourceKind::Location)?;
        let title = normalize_required_text(&cmd.title, "location title")?;
        let location = Location::new(
            actor.user_id.clone(),
            title,
            cmd.open_time,
            cmd.close_time,
            normalize_optional_text(cmd.description.as_deref()),
        )?;
        with_tx!(self, |db_tx| {
            let model: locations::ActiveModel = (&location).into();
            model.insert(&db_tx).await?;
            Ok(location.id)
        })
    }

    /// Returns a single location by id.
    pub async fn location(&self, actor: &Principal, location_id: Uuid) -> ResultEngine<Location> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_location_action(&db_tx, actor, location_id, Action::Read)
                .await?;
            Location::try_from(model)
        })
    }

    /// Lists locations visible to the actor, narrowed by the list-time scope.
    pub async fn locations(&self, actor: &Principal) -> ResultEngine<Vec<Location>> {
        Self::require_permission(actor, Action::Read, ResourceKind::Location)?;
        with_tx!(self, |db_tx| {
            let models = match policy::scope(Some(actor), ResourceKind::Location) {
                ListScope::All => locations::Entity::find().all(&db_tx).await?,
                ListScope::Owner => {
                    locations::Entity::find()
                        .filter(locations::Column::UserId.eq(actor.user_id.clone()))
                        .all(&db_tx)
                        .await?
                }
                ListScope::Nothing => Vec::new(),
            };
            models.into_iter().map(Location::try_from).collect()
        })
    }

    /// Replaces a location's fields. Ownership is untouched.
    pub async fn update_location(
        &self,
        actor: &Principal,
        cmd: LocationUpdateCmd,
    ) -> ResultEngine<()> {
        let title = normalize_required_text(&cmd.title, "location title")?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_location_action(&db_tx, actor, cmd.location_id, Action::Update)
                .await?;
            let updated = Location::new(
                model.user_id.clone(),
                title,
                cmd.open_time,
                cmd.close_time,
                normalize_optional_text(cmd.description.as_deref()),
            )?;
            let active = locations::ActiveModel {
                id: ActiveValue::Set(model.id),
                title: ActiveValue::Set(updated.title),
                open_time: ActiveValue::Set(updated.open_time),
                close_time: ActiveValue::Set(updated.close_time),
                description: ActiveValue::Set(updated.description),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Deletes a location; join rows referencing it cascade away.
    pub async fn delete_location(&self, actor: &Principal, location_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_location_action(&db_tx, actor, location_id, Action::Delete)
                .await?;
            locations::Entity::delete_by_id(model.id.clone())
                .exec(&db_tx)
                .await?;
            tracing::info!(actor = %actor.user_id, location_id = %model.id, "location deleted");
            Ok(())
        })
    }
}
