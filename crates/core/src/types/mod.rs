//! Shared domain types.

mod email;
mod id;
mod tags;

pub use email::{Email, EmailError};
pub use id::{CustomerId, EventId, OrderId, OrderItemId, ProductId, TenantId, UserId};
pub use tags::normalize_tags;
