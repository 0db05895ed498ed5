pub mod admin_service;
pub mod auth_service;
pub mod catalog_service;
pub mod order_service;
pub mod profile_service;
pub mod role_service;
pub mod tracking_service;
