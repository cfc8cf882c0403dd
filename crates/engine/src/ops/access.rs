//! Authorization plumbing shared by the ops modules.
//!
//! Every `require_*` helper runs both policy layers in order: the type-level
//! gate first (denial is `PermissionDenied`), then the load (absence is
//! `KeyNotFound`), then the instance-level gate against the loaded owner
//! (denial is `PermissionDenied` again). Handlers never compare owners
//! themselves; the owner resolution for expenses goes through
//! [`policy::expense_owner_id`].

use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, expenses, locations,
    policy::{self, Action, Principal, ResourceKind},
    trips, users,
};

use super::Engine;

impl Engine {
    pub(super) fn require_permission(
        actor: &Principal,
        action: Action,
        kind: ResourceKind,
    ) -> ResultEngine<()> {
        if !policy::has_permission(Some(actor), action, kind) {
            return Err(EngineError::PermissionDenied(format!(
                "{} may not {} {}s",
                actor.role.as_str(),
                action.as_str(),
                kind.as_str()
            )));
        }
        Ok(())
    }

    pub(super) fn require_object_permission(
        actor: &Principal,
        action: Action,
        kind: ResourceKind,
        owner_id: &str,
    ) -> ResultEngine<()> {
        if !policy::has_object_permission(Some(actor), action, kind, owner_id) {
            return Err(EngineError::PermissionDenied(format!(
                "{} may not {} this {}",
                actor.role.as_str(),
                action.as_str(),
                kind.as_str()
            )));
        }
        Ok(())
    }

    pub(super) async fn find_trip(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
    ) -> ResultEngine<Option<trips::Model>> {
        trips::Entity::find_by_id(trip_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    /// Loads a trip and checks both policy layers for `action`.
    pub(super) async fn require_trip_action(
        &self,
        db: &DatabaseTransaction,
        actor: &Principal,
        trip_id: Uuid,
        action: Action,
    ) -> ResultEngine<trips::Model> {
        Self::require_permission(actor, action, ResourceKind::Trip)?;
        let model = self
            .find_trip(db, trip_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))?;
        Self::require_object_permission(actor, action, ResourceKind::Trip, &model.user_id)?;
        Ok(model)
    }

    /// Loads a location and checks both policy layers for `action`.
    pub(super) async fn require_location_action(
        &self,
        db: &DatabaseTransaction,
        actor: &Principal,
        location_id: Uuid,
        action: Action,
    ) -> ResultEngine<locations::Model> {
        Self::require_permission(actor, action, ResourceKind::Location)?;
        let model = locations::Entity::find_by_id(location_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("location not exists".to_string()))?;
        Self::require_object_permission(actor, action, ResourceKind::Location, &model.user_id)?;
        Ok(model)
    }

    /// Loads an expense together with its owning trip and checks both policy
    /// layers for `action`. The effective owner depends on the actor's role:
    /// guides are keyed by the trip's owner, everyone else by the expense's
    /// own `user_id`.
    pub(super) async fn require_expense_action(
        &self,
        db: &DatabaseTransaction,
        actor: &Principal,
        expense_id: Uuid,
        action: Action,
    ) -> ResultEngine<(expenses::Model, trips::Model)> {
        Self::require_permission(actor, action, ResourceKind::Expense)?;
        let expense = expenses::Entity::find_by_id(expense_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))?;
        let trip = trips::Entity::find_by_id(expense.trip_id.clone())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))?;
        let owner_id = policy::expense_owner_id(actor.role, &expense.user_id, &trip.user_id);
        Self::require_object_permission(actor, action, ResourceKind::Expense, owner_id)?;
        Ok((expense, trip))
    }

    pub(super) async fn require_user_exists(
        &self,
        db: &DatabaseTransaction,
        username: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(username.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }
}
