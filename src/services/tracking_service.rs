use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::tracking::TrackingUpdate,
    entity::{
        rental_orders::Column as OrderCol,
        tracking_info::{ActiveModel as TrackingActive, Entity as TrackingInfo},
    },
    error::{AppError, AppResult},
    models::TrackingRecord,
    services::order_service::tracking_from_entity,
    session::{Session, ensure_staff},
    state::AppState,
};

/// Tracking view is owner-scoped: the record is returned only when the
/// related order belongs to the session's login.
pub async fn view_tracking(
    state: &AppState,
    session: &Session,
    tracking_id: Uuid,
) -> AppResult<TrackingRecord> {
    let tracking = TrackingInfo::find_by_id(tracking_id).one(&state.orm).await?;
    let tracking = match tracking {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let owned = tracking
        .find_related(crate::entity::RentalOrders)
        .filter(OrderCol::Login.eq(session.login.as_str()))
        .one(&state.orm)
        .await?;
    if owned.is_none() {
        return Err(AppError::NotFound);
    }

    Ok(tracking_from_entity(tracking))
}

/// Staff-only single-field update; every edit stamps `last_update_date`.
/// Any employee or manager may edit any record; there is deliberately no
/// ownership tie between the acting staff member and the order.
pub async fn update_tracking(
    state: &AppState,
    session: &Session,
    tracking_id: Uuid,
    update: TrackingUpdate,
) -> AppResult<TrackingRecord> {
    ensure_staff(session)?;

    let existing = TrackingInfo::find_by_id(tracking_id).one(&state.orm).await?;
    let existing = match existing {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let field = update.field_name();
    let mut active: TrackingActive = existing.into();
    match update {
        TrackingUpdate::Status(value) => active.status = Set(value),
        TrackingUpdate::CurrentLocation(value) => active.current_location = Set(value),
        TrackingUpdate::CourierName(value) => active.courier_name = Set(value),
        TrackingUpdate::AdditionalComments(value) => active.additional_comments = Set(value),
    }
    active.last_update_date = Set(Utc::now().into());
    let tracking = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(&session.login),
        "tracking_update",
        Some("tracking_info"),
        Some(serde_json::json!({ "tracking_id": tracking_id, "field": field })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(tracking_from_entity(tracking))
}
