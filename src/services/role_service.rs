use crate::{
    error::{AppError, AppResult},
    models::Role,
    state::AppState,
};

/// Map a login to its role. Membership in `customers` means customer;
/// membership in `workers` means the authoritative `users.role` column picks
/// employee or manager. Exactly one membership row must exist; anything else
/// is data corruption and is reported as such rather than guessed around.
pub async fn resolve_role(state: &AppState, login: &str) -> AppResult<Role> {
    let role_column: Option<(String,)> = sqlx::query_as("SELECT role FROM users WHERE login = $1")
        .bind(login)
        .fetch_optional(&state.pool)
        .await?;
    let role_column = match role_column {
        Some((role,)) => role,
        None => return Err(AppError::NotFound),
    };

    let is_customer: Option<(String,)> =
        sqlx::query_as("SELECT login FROM customers WHERE login = $1")
            .bind(login)
            .fetch_optional(&state.pool)
            .await?;
    let is_worker: Option<(String,)> =
        sqlx::query_as("SELECT login FROM workers WHERE login = $1")
            .bind(login)
            .fetch_optional(&state.pool)
            .await?;

    match (is_customer.is_some(), is_worker.is_some()) {
        (true, false) => {
            if role_column != Role::Customer.as_str() {
                return Err(AppError::Corrupt(format!(
                    "{login} has customer membership but role column {role_column:?}"
                )));
            }
            Ok(Role::Customer)
        }
        (false, true) => match Role::parse(&role_column) {
            Some(role) if role.is_staff() => Ok(role),
            _ => Err(AppError::Corrupt(format!(
                "{login} has worker membership but role column {role_column:?}"
            ))),
        },
        (true, true) => Err(AppError::Corrupt(format!(
            "{login} is listed in both membership tables"
        ))),
        (false, false) => Err(AppError::Corrupt(format!(
            "{login} is listed in neither membership table"
        ))),
    }
}
