//! User API endpoints

use api_types::user::{UserNew, UserView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use engine::{Principal, UserNewCmd};

fn map_role(role: api_types::Role) -> engine::Role {
    match role {
        api_types::Role::Visitor => engine::Role::Visitor,
        api_types::Role::Guide => engine::Role::Guide,
        api_types::Role::Admin => engine::Role::Admin,
    }
}

/// `POST /users/register` - open registration, no credentials required.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let role = payload.role.unwrap_or(api_types::Role::Visitor);
    let mut cmd = UserNewCmd::new(payload.username.clone(), payload.password);
    cmd = cmd.role(map_role(role));
    state.engine.register_user(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserView {
            username: payload.username,
            role,
        }),
    ))
}

/// `DELETE /users/{username}` - admin only; cascades to everything owned.
pub async fn remove(
    Extension(principal): Extension<Principal>,
    State(state): State<ServerState>,
    Path(username): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_user(&principal, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}
