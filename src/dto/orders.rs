use serde::{Deserialize, Serialize};

use crate::models::{Game, OrderLine, RentalOrder, TrackingRecord};

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub game_id: String,
    pub quantity: i32,
}

/// Everything a freshly placed (or looked-up) order consists of, echoed back
/// for confirmation.
#[derive(Debug, Serialize)]
pub struct OrderDetails {
    pub order: RentalOrder,
    pub tracking: TrackingRecord,
    pub lines: Vec<OrderLine>,
    pub games: Vec<Game>,
}
