//! Capability contracts for the storefront engine backends.
//!
//! The engine never talks to a database directly. Each API in [`crate::sfe_api`] is generic over one of the
//! traits defined here, and a backend (currently SQLite, see [`crate::SqliteDatabase`]) implements them.
//! This is also the seam the tests use: a fake that implements a trait is a full stand-in for the store.
//!
//! * [`InventoryManagement`] — product catalog reads and out-of-band product creation.
//! * [`OrderManagement`] — the atomic order-placement unit and order queries.
//! * [`PaymentManagement`] — payment records and the conditional status transitions.
//! * [`SignatureVerifier`] — the injected gateway-authenticity check.
//!
//! Every mutating trait method is a single atomic unit of work: it either commits all of its effects or
//! none of them. Callers never see partial state.

mod inventory_management;
mod order_management;
mod payment_management;
mod signature_verifier;

pub use inventory_management::{CatalogError, InventoryManagement};
pub use order_management::{OrderManagement, OrderPlacementError};
pub use payment_management::{PaymentApiError, PaymentManagement};
pub use signature_verifier::SignatureVerifier;
