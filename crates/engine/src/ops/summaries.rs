//! Derived-summary maintenance.
//!
//! `refresh_expense_summary` is the only writer of `expense_summaries`. It
//! runs inside the caller's transaction, after the expense mutation and
//! before commit, so a summary failure rolls the mutation back with it.

use sea_orm::{DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Expense, ExpenseSummary, ResultEngine, expenses,
    policy::{Action, Principal},
    summaries,
};

use super::{Engine, with_tx};

impl Engine {
    /// Returns the stored summary for a trip the actor may read, or `None`
    /// when the trip never saw an expense write.
    pub async fn trip_summary(
        &self,
        actor: &Principal,
        trip_id: Uuid,
    ) -> ResultEngine<Option<ExpenseSummary>> {
        with_tx!(self, |db_tx| {
            self.require_trip_action(&db_tx, actor, trip_id, Action::Read)
                .await?;
            let row = summaries::Entity::find_by_id(trip_id.to_string())
                .one(&db_tx)
                .await?;
            row.map(ExpenseSummary::try_from).transpose()
        })
    }

    /// Recomputes and upserts the summary row for `trip_id` from the full
    /// expense set currently visible under `db`. Never uses a cached total.
    pub(super) async fn refresh_expense_summary(
        &self,
        db: &DatabaseTransaction,
        trip_id: Uuid,
    ) -> ResultEngine<()> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::TripId.eq(trip_id.to_string()))
            .all(db)
            .await?;
        let mut current = Vec::with_capacity(models.len());
        for model in models {
            current.push(Expense::try_from(model)?);
        }
        let summary = ExpenseSummary::compute(trip_id, &current)?;

        let existing = summaries::Entity::find_by_id(trip_id.to_string())
            .one(db)
            .await?;
        let active: summaries::ActiveModel = (&summary).try_into()?;
        if existing.is_some() {
            active.update(db).await?;
        } else {
            active.insert(db).await?;
        }
        Ok(())
    }
}
