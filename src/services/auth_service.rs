use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;

use crate::{
    audit::log_audit,
    dto::auth::{LoginRequest, RegisterRequest},
    error::{AppError, AppResult},
    models::{MAX_LOGIN_LEN, MAX_PASSWORD_LEN, MAX_PHONE_LEN, User, UserProfile},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn validate_password(password: &str) -> AppResult<()> {
    if password.is_empty() || password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "password must be 1..={MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> AppResult<()> {
    if phone.len() > MAX_PHONE_LEN {
        return Err(AppError::Validation(format!(
            "phone number must be at most {MAX_PHONE_LEN} characters"
        )));
    }
    Ok(())
}

/// Create a new customer account: one `users` row plus the matching
/// `customers` membership row, inserted in a single transaction. A taken
/// login is a `Conflict`, never silently dropped.
pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<UserProfile> {
    let RegisterRequest {
        login,
        password,
        phone_number,
        fav_games,
    } = payload;

    if login.is_empty() || login.len() > MAX_LOGIN_LEN {
        return Err(AppError::Validation(format!(
            "login must be 1..={MAX_LOGIN_LEN} characters"
        )));
    }
    validate_password(&password)?;
    validate_phone(&phone_number)?;

    let exist: Option<(String,)> = sqlx::query_as("SELECT login FROM users WHERE login = $1")
        .bind(login.as_str())
        .fetch_optional(&state.pool)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict("login is already taken".to_string()));
    }

    let password_hash = hash_password(&password)?;

    let mut tx = state.pool.begin().await?;
    let profile: UserProfile = sqlx::query_as(
        r#"
        INSERT INTO users (login, password_hash, phone_number, role, fav_games, num_overdue_games)
        VALUES ($1, $2, $3, 'customer', $4, 0)
        RETURNING login, phone_number, role, fav_games, num_overdue_games, created_at
        "#,
    )
    .bind(login.as_str())
    .bind(password_hash)
    .bind(phone_number.as_str())
    .bind(fav_games.as_str())
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO customers (login) VALUES ($1)")
        .bind(login.as_str())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&profile.login),
        "user_register",
        Some("users"),
        Some(serde_json::json!({ "login": profile.login })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(profile)
}

/// Credential check. Unknown login and wrong password both yield `Ok(None)`;
/// only infrastructure failures are errors.
pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<Option<User>> {
    let LoginRequest { login, password } = payload;
    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE login = $1")
        .bind(login.as_str())
        .fetch_optional(&state.pool)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Ok(None),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    let argon2 = Argon2::default();
    if argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Ok(None);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(&user.login),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "login": user.login })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_and_rejects() {
        let hash = hash_password("pw1").unwrap();
        let parsed = PasswordHash::new(&hash).unwrap();
        let argon2 = Argon2::default();
        assert!(argon2.verify_password(b"pw1", &parsed).is_ok());
        assert!(argon2.verify_password(b"pw2", &parsed).is_err());
    }

    #[test]
    fn password_length_caps() {
        assert!(validate_password("pw1").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password(&"x".repeat(MAX_PASSWORD_LEN + 1)).is_err());
    }
}
