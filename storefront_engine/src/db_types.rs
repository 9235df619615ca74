//! Public data types shared between the engine APIs and the database backends.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sfe_common::{Money, DEFAULT_CURRENCY_CODE};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------      Product       -----------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub product_name: String,
    /// Unit price. Authoritative for all totals; clients never supply prices.
    pub price: Money,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_name: String,
    pub price: Money,
    pub stock: i64,
}

impl NewProduct {
    pub fn new<S: Into<String>>(product_name: S, price: Money, stock: i64) -> Self {
        Self { product_name: product_name.into(), price, stock }
    }
}

//--------------------------------------      OrderItem     -----------------------------------------------------------

/// One line of a placement request: which product, and how many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub quantity: i64,
}

impl OrderItem {
    pub fn new(product_id: i64, quantity: i64) -> Self {
        Self { product_id, quantity }
    }
}

//--------------------------------------        Order       -----------------------------------------------------------

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    /// Unit price × quantity, computed server-side inside the placement transaction.
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(user_id: i64, product_id: i64, quantity: i64, total_price: Money) -> Self {
        Self { user_id, product_id, quantity, total_price, created_at: Utc::now() }
    }
}

//--------------------------------------      PaymentNo     -----------------------------------------------------------

/// System-generated payment number. This is the external-facing identifier for a payment; the numeric
/// primary key never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct PaymentNo(pub String);

impl FromStr for PaymentNo {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for PaymentNo {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for PaymentNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PaymentNo {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------    PaymentStatus   -----------------------------------------------------------

/// The payment state machine. `Pending` is the only non-terminal state; the two legal transitions,
/// `Pending → Paid` and `Pending → Failed`, are each applied with a single conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "Pending"),
            PaymentStatus::Paid => write!(f, "Paid"),
            PaymentStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid payment status: {0}")]
pub struct PaymentStatusConversionError(String);

impl FromStr for PaymentStatus {
    type Err = PaymentStatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "Failed" => Ok(Self::Failed),
            s => Err(PaymentStatusConversionError(s.to_string())),
        }
    }
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

//--------------------------------------       Payment      -----------------------------------------------------------

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Payment {
    /// Internal row id. Not part of the external contract.
    pub id: i64,
    pub payment_no: PaymentNo,
    pub user_id: i64,
    pub amount: Money,
    pub currency: String,
    pub status: PaymentStatus,
    /// Which external gateway this payment goes through, e.g. "ALIPAY".
    pub provider: String,
    /// Trade number assigned by the gateway. Set exactly once, on settlement.
    pub provider_trade_no: Option<String>,
    pub return_url: Option<String>,
    pub notify_url: Option<String>,
    /// Opaque payload, e.g. the serialized list of order ids this payment covers.
    pub extra: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: i64,
    pub amount: Money,
    pub currency: String,
    pub provider: String,
    pub return_url: Option<String>,
    pub notify_url: Option<String>,
    pub extra: Option<String>,
}

impl NewPayment {
    pub fn new<S: Into<String>>(user_id: i64, amount: Money, provider: S) -> Self {
        Self {
            user_id,
            amount,
            currency: DEFAULT_CURRENCY_CODE.to_string(),
            provider: provider.into(),
            return_url: None,
            notify_url: None,
            extra: None,
        }
    }

    pub fn with_currency<S: Into<String>>(mut self, currency: S) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_urls<S: Into<String>>(mut self, return_url: S, notify_url: S) -> Self {
        self.return_url = Some(return_url.into());
        self.notify_url = Some(notify_url.into());
        self
    }

    pub fn with_extra<S: Into<String>>(mut self, extra: S) -> Self {
        self.extra = Some(extra.into());
        self
    }
}
