use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, ExpenseNewCmd, ExpenseUpdateCmd, ResultEngine, expenses,
    policy::{self, Action, ListScope, Principal, ResourceKind},
    trips,
};

use super::{Engine, normalize_optional_text, with_tx};

impl Engine {
    /// Logs a new expense against a trip and refreshes that trip's summary
    /// in the same transaction.
    ///
    /// The trip is resolved before the ownership check, so a missing trip is
    /// a 404-shaped error while a foreign trip is a denial.
    pub async fn new_expense(&self, actor: &Principal, cmd: ExpenseNewCmd) -> ResultEngine<Uuid> {
        Self::require_permission(actor, Action::Create, ResourceKind::Expense)?;
        with_tx!(self, |db_tx| {
            let trip = self
                .find_trip(&db_tx, cmd.trip_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))?;
            let owner_id = policy::expense_owner_id(actor.role, &actor.user_id, &trip.user_id);
            Self::require_object_permission(actor, Action::Create, ResourceKind::Expense, owner_id)?;

            let expense = Expense::new(
                cmd.trip_id,
                actor.user_id.clone(),
                cmd.category,
                cmd.amount,
                normalize_optional_text(cmd.description.as_deref()),
                cmd.date,
            )?;
            expense.check_date_within(trip.start_date, trip.end_date)?;

            let model: expenses::ActiveModel = (&expense).into();
            model.insert(&db_tx).await?;
            self.refresh_expense_summary(&db_tx, cmd.trip_id).await?;
            Ok(expense.id)
        })
    }

    /// Returns a single expense by id.
    pub async fn expense(&self, actor: &Principal, expense_id: Uuid) -> ResultEngine<Expense> {
        with_tx!(self, |db_tx| {
            let (model, _trip) = self
                .require_expense_action(&db_tx, actor, expense_id, Action::Read)
                .await?;
            Expense::try_from(model)
        })
    }

    /// Lists expenses visible to the actor, optionally narrowed to one trip.
    ///
    /// With an explicit trip filter, a trip outside the actor's scope
    /// answers the same way a missing one does.
    pub async fn expenses(
        &self,
        actor: &Principal,
        trip_filter: Option<Uuid>,
    ) -> ResultEngine<Vec<Expense>> {
        Self::require_permission(actor, Action::Read, ResourceKind::Expense)?;
        with_tx!(self, |db_tx| {
            let scope = policy::scope(Some(actor), ResourceKind::Expense);
            let models = match trip_filter {
                Some(trip_id) => {
                    let trip = self
                        .find_trip(&db_tx, trip_id)
                        .await?
                        .ok_or_else(|| EngineError::KeyNotFound("trip not exists".to_string()))?;
                    match scope {
                        ListScope::All => {}
                        ListScope::Owner if trip.user_id == actor.user_id => {}
                        ListScope::Owner | ListScope::Nothing => {
                            return Err(EngineError::KeyNotFound("trip not exists".to_string()));
                        }
                    }
                    expenses::Entity::find()
                        .filter(expenses::Column::TripId.eq(trip_id.to_string()))
                        .all(&db_tx)
                        .await?
                }
                None => match scope {
                    ListScope::All => expenses::Entity::find().all(&db_tx).await?,
                    ListScope::Owner => {
                        let owned: Vec<String> = trips::Entity::find()
                            .filter(trips::Column::UserId.eq(actor.user_id.clone()))
                            .all(&db_tx)
                            .await?
                            .into_iter()
                            .map(|t| t.id)
                            .collect();
                        if owned.is_empty() {
                            Vec::new()
                        } else {
                            expenses::Entity::find()
                                .filter(expenses::Column::TripId.is_in(owned))
                                .all(&db_tx)
                                .await?
                        }
                    }
                    ListScope::Nothing => Vec::new(),
                },
            };
            models.into_iter().map(Expense::try_from).collect()
        })
    }

    /// Revises an expense in place and refreshes the owning trip's summary
    /// in the same transaction. The trip association never changes; the
    /// `user_id` moves to whoever made the revision.
    pub async fn update_expense(
        &self,
        actor: &Principal,
        cmd: ExpenseUpdateCmd,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (model, trip) = self
                .require_expense_action(&db_tx, actor, cmd.expense_id, Action::Update)
                .await?;
            let trip_id = Uuid::parse_str(&trip.id)
                .map_err(|_| EngineError::KeyNotFound("trip not exists".to_string()))?;

            let revised = Expense::new(
                trip_id,
                actor.user_id.clone(),
                cmd.category,
                cmd.amount,
                normalize_optional_text(cmd.description.as_deref()),
                cmd.date,
            )?;
            revised.check_date_within(trip.start_date, trip.end_date)?;

            let active = expenses::ActiveModel {
                id: ActiveValue::Set(model.id),
                user_id: ActiveValue::Set(revised.user_id),
                category: ActiveValue::Set(revised.category.as_str().to_string()),
                amount_cents: ActiveValue::Set(revised.amount.cents()),
                description: ActiveValue::Set(revised.description),
                date: ActiveValue::Set(revised.date),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            self.refresh_expense_summary(&db_tx, trip_id).await?;
            Ok(())
        })
    }

    /// Deletes an expense and refreshes the owning trip's summary in the
    /// same transaction.
    pub async fn delete_expense(&self, actor: &Principal, expense_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (model, trip) = self
                .require_expense_action(&db_tx, actor, expense_id, Action::Delete)
                .await?;
            let trip_id = Uuid::parse_str(&trip.id)
                .map_err(|_| EngineError::KeyNotFound("trip not exists".to_string()))?;
            expenses::Entity::delete_by_id(model.id.clone())
                .exec(&db_tx)
                .await?;
            self.refresh_expense_summary(&db_tx, trip_id).await?;
            tracing::info!(actor = %actor.user_id, expense_id = %model.id, "expense deleted");
            Ok(())
        })
    }
}
