use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Rentals are due a fixed period after the order timestamp.
pub const RENTAL_PERIOD_DAYS: i64 = 14;

/// Initial tracking state for a freshly placed order.
pub const INITIAL_TRACKING_STATUS: &str = "ordered";
pub const INITIAL_TRACKING_LOCATION: &str = "shop";
pub const PLACEHOLDER_COURIER: &str = "unassigned";

pub const MAX_LOGIN_LEN: usize = 50;
pub const MAX_PASSWORD_LEN: usize = 30;
pub const MAX_PHONE_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Employee,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Employee => "employee",
            Role::Manager => "manager",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "customer" => Some(Role::Customer),
            "employee" => Some(Role::Employee),
            "manager" => Some(Role::Manager),
            _ => None,
        }
    }

    /// Employees and managers may edit tracking records.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Employee | Role::Manager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full account row, hash included. Only the credential path sees this.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub login: String,
    pub password_hash: String,
    pub phone_number: String,
    pub role: String,
    pub fav_games: String,
    pub num_overdue_games: i32,
    pub created_at: DateTime<Utc>,
}

/// What the rest of the program (and the screen) sees of an account.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub login: String,
    pub phone_number: String,
    pub role: String,
    pub fav_games: String,
    pub num_overdue_games: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub game_id: String,
    pub game_name: String,
    pub genre: String,
    /// Integer cents; rendered as dollars.cents for display.
    pub price: i64,
    pub description: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalOrder {
    pub id: Uuid,
    pub login: String,
    pub no_of_games: i32,
    pub total_price: i64,
    pub order_timestamp: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: Uuid,
    pub rental_order_id: Uuid,
    pub game_id: String,
    pub units_ordered: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingRecord {
    pub id: Uuid,
    pub rental_order_id: Uuid,
    pub status: String,
    pub current_location: String,
    pub courier_name: String,
    pub last_update_date: DateTime<Utc>,
    pub additional_comments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Customer, Role::Employee, Role::Manager] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn staff_gate_covers_employee_and_manager() {
        assert!(!Role::Customer.is_staff());
        assert!(Role::Employee.is_staff());
        assert!(Role::Manager.is_staff());
    }
}
