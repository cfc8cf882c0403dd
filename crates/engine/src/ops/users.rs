use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, UserNewCmd,
    policy::{Principal, Role},
    users,
};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Registers a new user. Open to anyone; the role defaults to `visitor`
    /// and is immutable afterwards.
    pub async fn register_user(&self, cmd: UserNewCmd) -> ResultEngine<()> {
        let username = normalize_required_text(&cmd.username, "username")?;
        let password = normalize_required_text(&cmd.password, "password")?;
        let role = cmd.role.unwrap_or(Role::Visitor);
        with_tx!(self, |db_tx| {
            let exists = users::Entity::find_by_id(username.clone())
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(username));
            }
            let model = users::ActiveModel {
                username: ActiveValue::Set(username),
                password: ActiveValue::Set(password),
                role: ActiveValue::Set(role.as_str().to_string()),
            };
            model.insert(&db_tx).await?;
            Ok(())
        })
    }

    /// Resolves basic-auth credentials into a [`Principal`].
    ///
    /// Returns `Ok(None)` on unknown username or wrong password; the caller
    /// turns that into a 401, never a 404, so usernames stay unprobeable.
    pub async fn find_principal(
        &self,
        username: &str,
        password: &str,
    ) -> ResultEngine<Option<Principal>> {
        let Some(model) = users::Entity::find_by_id(username.to_string())
            .one(&self.database)
            .await?
        else {
            return Ok(None);
        };
        if model.password != password {
            return Ok(None);
        }
        let role = Role::try_from(model.role.as_str())?;
        Ok(Some(Principal::new(model.username, role)))
    }

    /// Removes a user and, through cascades, everything they own.
    /// Admin only.
    pub async fn delete_user(&self, actor: &Principal, username: &str) -> ResultEngine<()> {
        if actor.role != Role::Admin {
            return Err(EngineError::PermissionDenied(
                "only admins may delete users".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let model = self.require_user_exists(&db_tx, username).await?;
            users::Entity::delete_by_id(model.username.clone())
                .exec(&db_tx)
                .await?;
            tracing::info!(actor = %actor.user_id, username = %model.username, "user deleted");
            Ok(())
        })
    }
}
