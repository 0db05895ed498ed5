pub mod audit_logs;
pub mod catalog;
pub mod customers;
pub mod games_in_order;
pub mod rental_orders;
pub mod tracking_info;
pub mod users;
pub mod workers;

pub use audit_logs::Entity as AuditLogs;
pub use catalog::Entity as Catalog;
pub use customers::Entity as Customers;
pub use games_in_order::Entity as GamesInOrder;
pub use rental_orders::Entity as RentalOrders;
pub use tracking_info::Entity as TrackingInfo;
pub use users::Entity as Users;
pub use workers::Entity as Workers;
