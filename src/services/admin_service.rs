use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, TransactionTrait};

use crate::{
    audit::log_audit,
    dto::users::UserUpdate,
    entity::{
        customers::{ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers},
        users::{Column as UserCol, Entity as Users},
        workers::{ActiveModel as WorkerActive, Column as WorkerCol, Entity as Workers},
    },
    error::{AppError, AppResult},
    models::{MAX_LOGIN_LEN, Role},
    services::auth_service::{hash_password, validate_password, validate_phone},
    session::{Session, ensure_manager},
    state::AppState,
};

/// Manager-only edit of an arbitrary account. Login renames and role changes
/// cascade through the membership tables inside one transaction; the other
/// variants are single-column updates with the usual validation.
pub async fn update_user(
    state: &AppState,
    session: &Session,
    target: &str,
    update: UserUpdate,
) -> AppResult<()> {
    ensure_manager(session)?;

    match update {
        UserUpdate::Login(new_login) => change_login(state, session, target, &new_login).await,
        UserUpdate::Role(new_role) => change_role(state, session, target, new_role).await,
        UserUpdate::OverdueGames(count) => {
            if count < 0 {
                return Err(AppError::Validation(
                    "overdue count must not be negative".into(),
                ));
            }
            set_column(state, session, target, "num_overdue_games", count).await
        }
        UserUpdate::Password(password) => {
            validate_password(&password)?;
            let hash = hash_password(&password)?;
            set_column(state, session, target, "password_hash", hash).await
        }
        UserUpdate::FavGames(games) => set_column(state, session, target, "fav_games", games).await,
        UserUpdate::PhoneNumber(phone) => {
            validate_phone(&phone)?;
            set_column(state, session, target, "phone_number", phone).await
        }
    }
}

/// Rename an account: drop the old membership row, rename the `users` row
/// (order history follows via FK cascade), then re-insert the membership row
/// under the new login. All three steps commit or roll back together.
async fn change_login(
    state: &AppState,
    session: &Session,
    target: &str,
    new_login: &str,
) -> AppResult<()> {
    if new_login.is_empty() || new_login.len() > MAX_LOGIN_LEN {
        return Err(AppError::Validation(format!(
            "login must be 1..={MAX_LOGIN_LEN} characters"
        )));
    }

    let txn = state.orm.begin().await?;

    let user = Users::find_by_id(target).one(&txn).await?;
    if user.is_none() {
        return Err(AppError::NotFound);
    }
    let taken = Users::find_by_id(new_login).one(&txn).await?;
    if taken.is_some() {
        return Err(AppError::Conflict("login is already taken".into()));
    }

    let was_worker = Workers::find_by_id(target).one(&txn).await?.is_some();
    if was_worker {
        Workers::delete_many()
            .filter(WorkerCol::Login.eq(target))
            .exec(&txn)
            .await?;
    } else {
        Customers::delete_many()
            .filter(CustomerCol::Login.eq(target))
            .exec(&txn)
            .await?;
    }

    Users::update_many()
        .col_expr(UserCol::Login, Expr::value(new_login))
        .filter(UserCol::Login.eq(target))
        .exec(&txn)
        .await?;

    if was_worker {
        WorkerActive {
            login: Set(new_login.to_string()),
        }
        .insert(&txn)
        .await?;
    } else {
        CustomerActive {
            login: Set(new_login.to_string()),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    audit(
        state,
        session,
        "user_login_change",
        serde_json::json!({ "from": target, "to": new_login }),
    )
    .await;
    Ok(())
}

/// Move an account between roles: the role column and the membership tables
/// change together or not at all.
async fn change_role(
    state: &AppState,
    session: &Session,
    target: &str,
    new_role: Role,
) -> AppResult<()> {
    let txn = state.orm.begin().await?;

    let user = Users::find_by_id(target).one(&txn).await?;
    if user.is_none() {
        return Err(AppError::NotFound);
    }

    Users::update_many()
        .col_expr(UserCol::Role, Expr::value(new_role.as_str()))
        .filter(UserCol::Login.eq(target))
        .exec(&txn)
        .await?;

    // Clear both membership tables, then insert the single row matching the
    // new role; this also repairs a previously corrupted double membership.
    Customers::delete_many()
        .filter(CustomerCol::Login.eq(target))
        .exec(&txn)
        .await?;
    Workers::delete_many()
        .filter(WorkerCol::Login.eq(target))
        .exec(&txn)
        .await?;

    if new_role == Role::Customer {
        CustomerActive {
            login: Set(target.to_string()),
        }
        .insert(&txn)
        .await?;
    } else {
        WorkerActive {
            login: Set(target.to_string()),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    audit(
        state,
        session,
        "user_role_change",
        serde_json::json!({ "login": target, "role": new_role.as_str() }),
    )
    .await;
    Ok(())
}

async fn set_column<T>(
    state: &AppState,
    session: &Session,
    target: &str,
    field: &'static str,
    value: T,
) -> AppResult<()>
where
    T: Send + for<'q> sqlx::Encode<'q, sqlx::Postgres> + sqlx::Type<sqlx::Postgres> + 'static,
{
    // `field` is a column name from the closed match above, never user input.
    let result = sqlx::query(&format!("UPDATE users SET {field} = $1 WHERE login = $2"))
        .bind(value)
        .bind(target)
        .execute(&state.pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    audit(
        state,
        session,
        "user_update",
        serde_json::json!({ "login": target, "field": field }),
    )
    .await;
    Ok(())
}

async fn audit(state: &AppState, session: &Session, action: &str, metadata: serde_json::Value) {
    if let Err(err) = log_audit(
        &state.pool,
        Some(&session.login),
        action,
        Some("users"),
        Some(metadata),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }
}
