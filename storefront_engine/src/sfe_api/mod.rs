//! # Storefront engine public API
//!
//! The `sfe_api` module exposes the programmatic API of the engine. The API is modular: clients pick the
//! pieces they need, and each piece is generic over the backend trait it requires.
//!
//! * [`order_flow_api`] — order placement (single and batch) and per-user order queries.
//! * [`payment_api`] — payment intents, the idempotent settlement transition, and gateway-notification
//!   handling.
//! * [`catalog_api`] — product lookup and out-of-band product creation.
//!
//! # API usage
//!
//! The pattern is the same everywhere: construct an API instance by supplying a backend that implements
//! the required trait.
//!
//! ```rust,ignore
//! use storefront_engine::{events::EventProducers, OrderFlowApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/storefront.db", 16).await?;
//! // SqliteDatabase implements OrderManagement
//! let api = OrderFlowApi::new(db, EventProducers::default());
//! let order = api.place_single(user_id, product_id, 3).await?;
//! ```

pub mod catalog_api;
pub mod order_flow_api;
pub mod payment_api;

pub use catalog_api::CatalogApi;
pub use order_flow_api::OrderFlowApi;
pub use payment_api::PaymentFlowApi;
