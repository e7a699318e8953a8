//! HTTP request handlers.

pub mod auth_handler;
pub mod complaint_handler;
pub mod dashboard_handler;
pub mod notice_handler;
pub mod payment_handler;
pub mod property_handler;
pub mod room_handler;
pub mod tenant_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use complaint_handler::complaint_routes;
pub use dashboard_handler::dashboard_routes;
pub use notice_handler::notice_routes;
pub use payment_handler::payment_routes;
pub use property_handler::property_routes;
pub use room_handler::room_routes;
pub use tenant_handler::tenant_routes;
pub use user_handler::user_routes;
