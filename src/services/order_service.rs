use chrono::{DateTime, Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{OrderDetails, PlaceOrderRequest},
    entity::{
        catalog::{Column as CatalogCol, Entity as Catalog},
        games_in_order::{
            ActiveModel as LineActive, Column as LineCol, Entity as GamesInOrder,
            Model as LineModel,
        },
        rental_orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as RentalOrders,
            Model as OrderModel,
        },
        tracking_info::{
            ActiveModel as TrackingActive, Column as TrackingCol, Entity as TrackingInfo,
            Model as TrackingModel,
        },
    },
    error::{AppError, AppResult},
    models::{
        INITIAL_TRACKING_LOCATION, INITIAL_TRACKING_STATUS, OrderLine, PLACEHOLDER_COURIER,
        RENTAL_PERIOD_DAYS, RentalOrder, TrackingRecord,
    },
    services::catalog_service::game_from_entity,
    session::Session,
    state::AppState,
};

pub fn due_date(order_timestamp: DateTime<Utc>) -> DateTime<Utc> {
    order_timestamp + Duration::days(RENTAL_PERIOD_DAYS)
}

/// Place a rental order: price lookup, total computation, then the order row,
/// its tracking row, and its line row inserted inside one transaction. Any
/// failure rolls the whole sequence back; a half-created order is never
/// observable.
pub async fn place_order(
    state: &AppState,
    session: &Session,
    payload: PlaceOrderRequest,
) -> AppResult<OrderDetails> {
    let PlaceOrderRequest { game_id, quantity } = payload;
    if quantity <= 0 {
        return Err(AppError::Validation(
            "quantity must be greater than 0".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    let game = Catalog::find()
        .filter(CatalogCol::GameId.eq(game_id.as_str()))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let game = match game {
        Some(g) => g,
        None => return Err(AppError::NotFound),
    };
    if game.price <= 0 {
        return Err(AppError::Validation(
            "game has no rentable price".into(),
        ));
    }

    let total_price = game
        .price
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| AppError::Validation("total price is out of range".into()))?;
    let now = Utc::now();
    let order_id = Uuid::new_v4();

    let order = OrderActive {
        id: Set(order_id),
        login: Set(session.login.clone()),
        no_of_games: Set(quantity),
        total_price: Set(total_price),
        order_timestamp: Set(now.into()),
        due_date: Set(due_date(now).into()),
    }
    .insert(&txn)
    .await?;

    let tracking = TrackingActive {
        id: Set(Uuid::new_v4()),
        rental_order_id: Set(order_id),
        status: Set(INITIAL_TRACKING_STATUS.into()),
        current_location: Set(INITIAL_TRACKING_LOCATION.into()),
        courier_name: Set(PLACEHOLDER_COURIER.into()),
        last_update_date: Set(now.into()),
        additional_comments: Set(String::new()),
    }
    .insert(&txn)
    .await?;

    let line = LineActive {
        id: Set(Uuid::new_v4()),
        rental_order_id: Set(order_id),
        game_id: Set(game.game_id.clone()),
        units_ordered: Set(quantity),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&session.login),
        "order_placed",
        Some("rental_orders"),
        Some(serde_json::json!({ "order_id": order.id, "total_price": total_price })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(OrderDetails {
        order: order_from_entity(order),
        tracking: tracking_from_entity(tracking),
        lines: vec![line_from_entity(line)],
        games: vec![game_from_entity(game)],
    })
}

/// Full rental history for the session's own account, newest first.
pub async fn list_orders(state: &AppState, session: &Session) -> AppResult<Vec<RentalOrder>> {
    order_history(state, session, None).await
}

/// The five most recent rental orders.
pub async fn recent_orders(state: &AppState, session: &Session) -> AppResult<Vec<RentalOrder>> {
    order_history(state, session, Some(5)).await
}

async fn order_history(
    state: &AppState,
    session: &Session,
    limit: Option<u64>,
) -> AppResult<Vec<RentalOrder>> {
    let mut finder = RentalOrders::find()
        .filter(OrderCol::Login.eq(session.login.as_str()))
        .order_by_desc(OrderCol::OrderTimestamp);
    if let Some(limit) = limit {
        finder = finder.limit(limit);
    }

    let orders = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect();
    Ok(orders)
}

/// Everything about one of the session's own orders; other users' order ids
/// read as not found.
pub async fn order_details(
    state: &AppState,
    session: &Session,
    order_id: Uuid,
) -> AppResult<OrderDetails> {
    let order = RentalOrders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(order_id))
                .add(OrderCol::Login.eq(session.login.as_str())),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let tracking = TrackingInfo::find()
        .filter(TrackingCol::RentalOrderId.eq(order.id))
        .one(&state.orm)
        .await?;
    // Every order gets its tracking row in the same transaction; a missing
    // one means the invariant was broken outside this program.
    let tracking = match tracking {
        Some(t) => t,
        None => {
            return Err(AppError::Corrupt(format!(
                "order {order_id} has no tracking record"
            )));
        }
    };

    let lines: Vec<LineModel> = GamesInOrder::find()
        .filter(LineCol::RentalOrderId.eq(order.id))
        .all(&state.orm)
        .await?;

    let game_ids: Vec<String> = lines.iter().map(|l| l.game_id.clone()).collect();
    let games = Catalog::find()
        .filter(CatalogCol::GameId.is_in(game_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(game_from_entity)
        .collect();

    Ok(OrderDetails {
        order: order_from_entity(order),
        tracking: tracking_from_entity(tracking),
        lines: lines.into_iter().map(line_from_entity).collect(),
        games,
    })
}

pub fn order_from_entity(model: OrderModel) -> RentalOrder {
    RentalOrder {
        id: model.id,
        login: model.login,
        no_of_games: model.no_of_games,
        total_price: model.total_price,
        order_timestamp: model.order_timestamp.with_timezone(&Utc),
        due_date: model.due_date.with_timezone(&Utc),
    }
}

pub fn tracking_from_entity(model: TrackingModel) -> TrackingRecord {
    TrackingRecord {
        id: model.id,
        rental_order_id: model.rental_order_id,
        status: model.status,
        current_location: model.current_location,
        courier_name: model.courier_name,
        last_update_date: model.last_update_date.with_timezone(&Utc),
        additional_comments: model.additional_comments,
    }
}

fn line_from_entity(model: LineModel) -> OrderLine {
    OrderLine {
        id: model.id,
        rental_order_id: model.rental_order_id,
        game_id: model.game_id,
        units_ordered: model.units_ordered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_date_is_fourteen_days_out() {
        let now = Utc::now();
        assert_eq!(due_date(now) - now, Duration::days(14));
    }
}
