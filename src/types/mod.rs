//! Shared types for request filtering and response envelopes.

mod filters;
mod response;

pub use filters::{
    ComplaintFilter, NoticeFilter, NoticeScope, PaymentFilter, PropertyFilter, RoomFilter,
    TenantFilter,
};
pub use response::{ApiResponse, Created};
