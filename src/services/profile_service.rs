use crate::{
    audit::log_audit,
    dto::users::ProfileUpdate,
    error::{AppError, AppResult},
    models::UserProfile,
    services::auth_service::{hash_password, validate_password, validate_phone},
    session::Session,
    state::AppState,
};

pub async fn view_profile(state: &AppState, login: &str) -> AppResult<UserProfile> {
    let profile: Option<UserProfile> = sqlx::query_as(
        r#"
        SELECT login, phone_number, role, fav_games, num_overdue_games, created_at
        FROM users WHERE login = $1
        "#,
    )
    .bind(login)
    .fetch_optional(&state.pool)
    .await?;

    profile.ok_or(AppError::NotFound)
}

/// Self-service single-column edit of the session's own account.
pub async fn update_profile(
    state: &AppState,
    session: &Session,
    update: ProfileUpdate,
) -> AppResult<()> {
    let (field, value) = match update {
        ProfileUpdate::Password(password) => {
            validate_password(&password)?;
            ("password_hash", hash_password(&password)?)
        }
        ProfileUpdate::PhoneNumber(phone) => {
            validate_phone(&phone)?;
            ("phone_number", phone)
        }
        ProfileUpdate::FavGames(games) => ("fav_games", games),
    };

    // `field` is a column name from the closed enum above, never user input.
    let result = sqlx::query(&format!("UPDATE users SET {field} = $1 WHERE login = $2"))
        .bind(&value)
        .bind(&session.login)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(&session.login),
        "profile_update",
        Some("users"),
        Some(serde_json::json!({ "field": field })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}
