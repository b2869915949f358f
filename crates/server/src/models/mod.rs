//! Local entity models.
//!
//! Entities mirror the external platform's resources, keyed by
//! `(tenant, external id)`. Internal ids are assigned at creation and never
//! change. `New*` structs carry the normalized state an upsert applies.

pub mod customer;
pub mod event;
pub mod order;
pub mod product;
pub mod session;
pub mod tenant;
pub mod user;

pub use customer::{Customer, NewCustomer};
pub use event::{CART_ABANDONED, CustomEvent, NewEvent};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem};
pub use product::{NewProduct, Product};
pub use session::{CurrentUser, keys};
pub use tenant::{NewTenant, Tenant, TenantSummary};
pub use user::{User, UserSummary};
