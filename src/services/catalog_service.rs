use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};

use crate::{
    audit::log_audit,
    dto::catalog::{CatalogQuery, NewGameRequest, SortOrder, UpdateGameRequest},
    entity::catalog::{ActiveModel, Column, Entity as Catalog, Model as GameModel},
    error::{AppError, AppResult},
    models::Game,
    session::{Session, ensure_manager},
    state::AppState,
};

pub async fn list_games(state: &AppState, query: CatalogQuery) -> AppResult<Vec<Game>> {
    let mut condition = Condition::all();

    if let Some(genre) = query.genre.as_ref().filter(|g| !g.is_empty()) {
        condition = condition.add(Column::Genre.eq(genre.clone()));
    }
    if let Some(under_price) = query.under_price {
        condition = condition.add(Column::Price.lt(under_price));
    }

    let mut finder = Catalog::find().filter(condition);
    finder = match query.sort_order {
        Some(SortOrder::Asc) => finder.order_by_asc(Column::Price),
        Some(SortOrder::Desc) => finder.order_by_desc(Column::Price),
        None => finder.order_by_asc(Column::GameId),
    };

    let games = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(game_from_entity)
        .collect();
    Ok(games)
}

pub async fn get_game(state: &AppState, game_id: &str) -> AppResult<Game> {
    let game = Catalog::find_by_id(game_id)
        .one(&state.orm)
        .await?
        .map(game_from_entity);
    game.ok_or(AppError::NotFound)
}

pub async fn add_game(
    state: &AppState,
    session: &Session,
    payload: NewGameRequest,
) -> AppResult<Game> {
    ensure_manager(session)?;
    if payload.game_id.is_empty() {
        return Err(AppError::Validation("game id must not be empty".into()));
    }
    if payload.price < 0 {
        return Err(AppError::Validation("price must not be negative".into()));
    }

    let exist = Catalog::find_by_id(payload.game_id.as_str())
        .one(&state.orm)
        .await?;
    if exist.is_some() {
        return Err(AppError::Conflict("game id is already taken".into()));
    }

    let active = ActiveModel {
        game_id: Set(payload.game_id),
        game_name: Set(payload.game_name),
        genre: Set(payload.genre),
        price: Set(payload.price),
        description: Set(payload.description),
        image_url: Set(payload.image_url),
    };
    let game = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&session.login),
        "catalog_add",
        Some("catalog"),
        Some(serde_json::json!({ "game_id": game.game_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(game_from_entity(game))
}

/// Full-row update keyed by game id.
pub async fn update_game(
    state: &AppState,
    session: &Session,
    game_id: &str,
    payload: UpdateGameRequest,
) -> AppResult<Game> {
    ensure_manager(session)?;
    if payload.price < 0 {
        return Err(AppError::Validation("price must not be negative".into()));
    }

    let existing = Catalog::find_by_id(game_id).one(&state.orm).await?;
    let existing = match existing {
        Some(g) => g,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    active.game_name = Set(payload.game_name);
    active.genre = Set(payload.genre);
    active.price = Set(payload.price);
    active.description = Set(payload.description);
    active.image_url = Set(payload.image_url);
    let game = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&session.login),
        "catalog_update",
        Some("catalog"),
        Some(serde_json::json!({ "game_id": game.game_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(game_from_entity(game))
}

pub async fn remove_game(state: &AppState, session: &Session, game_id: &str) -> AppResult<()> {
    ensure_manager(session)?;
    let result = Catalog::delete_by_id(game_id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(&session.login),
        "catalog_remove",
        Some("catalog"),
        Some(serde_json::json!({ "game_id": game_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

pub fn game_from_entity(model: GameModel) -> Game {
    Game {
        game_id: model.game_id,
        game_name: model.game_name,
        genre: model.genre,
        price: model.price,
        description: model.description,
        image_url: model.image_url,
    }
}
