//! Storefront Engine
//!
//! The storefront engine is the core of a small shop: it places orders against a shared, finite product
//! inventory without ever overselling, and it tracks payment settlement against those orders
//! idempotently. It is transport-agnostic — an HTTP layer (not part of this crate) wraps the APIs here.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`] behind the [`mod@traits`] contracts). SQLite is the
//!    supported backend. You should never need to touch the database directly; the exception is the data
//!    types it stores, which are public in [`mod@db_types`].
//! 2. The engine public API ([`mod@sfe_api`]): order placement ([`OrderFlowApi`]), payment settlement
//!    ([`PaymentFlowApi`]) and the product catalog ([`CatalogApi`]). Each API is generic over the backend
//!    trait it needs, so tests (and alternative stores) plug in through [`mod@traits`].
//!
//! The engine also emits events: when an order is placed or a payment settles, subscribers registered via
//! [`events::EventHooks`] are notified. See the [`mod@events`] module.

pub mod db_types;
pub mod events;
pub mod helpers;
mod sfe_api;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use sfe_api::{CatalogApi, OrderFlowApi, PaymentFlowApi};
pub use traits::{
    CatalogError,
    InventoryManagement,
    OrderManagement,
    OrderPlacementError,
    PaymentApiError,
    PaymentManagement,
    SignatureVerifier,
};
