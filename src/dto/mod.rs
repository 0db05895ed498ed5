pub mod auth;
pub mod catalog;
pub mod orders;
pub mod tracking;
pub mod users;
