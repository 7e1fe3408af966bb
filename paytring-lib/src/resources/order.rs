//! Order creation and lookup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{lenient_u64, path_segment, require_non_empty, string_or_number, with_key};
use crate::dispatcher::Dispatcher;
use crate::hash::to_payload;
use crate::{PaytringError, Result};

/// Order to create.
///
/// Serializes to the gateway's field names (`receiptId`, `callbackUrl`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Customer name.
    pub cname: String,
    /// Customer email.
    pub email: String,
    /// Customer phone number.
    pub phone: u64,
    /// Amount in minor currency units (paise).
    pub amount: u64,
    /// Merchant-side unique receipt identifier.
    pub receipt_id: String,
    /// URL the gateway redirects to after payment.
    pub callback_url: String,
    /// Free-form metadata. Hashed as a single opaque object value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Map<String, Value>>,
}

impl OrderRequest {
    pub fn new(
        cname: impl Into<String>,
        email: impl Into<String>,
        phone: u64,
        amount: u64,
        receipt_id: impl Into<String>,
        callback_url: impl Into<String>,
    ) -> Self {
        Self {
            cname: cname.into(),
            email: email.into(),
            phone,
            amount,
            receipt_id: receipt_id.into(),
            callback_url: callback_url.into(),
            notes: None,
        }
    }

    /// Attach a note.
    pub fn with_note(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.notes
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    /// Shape checks done before anything is sent.
    pub fn validate(&self) -> Result<()> {
        require_non_empty("cname", &self.cname)?;
        require_non_empty("receiptId", &self.receipt_id)?;
        require_non_empty("callbackUrl", &self.callback_url)?;
        if !self.email.contains('@') {
            return Err(PaytringError::invalid_data(
                "email",
                "must be an email address",
            ));
        }
        if self.amount == 0 {
            return Err(PaytringError::invalid_data("amount", "must be positive"));
        }
        Ok(())
    }
}

/// Order as returned by create, fetch, and fetch-advance.
///
/// Fields the gateway adds beyond the common ones are kept in `extra`;
/// the advance lookup returns considerably more of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub payment_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub amount: Option<u64>,
    #[serde(default, rename = "receiptId")]
    pub receipt_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Order endpoints.
#[derive(Clone, Debug)]
pub struct OrderClient {
    dispatcher: Arc<Dispatcher>,
    api_key: String,
}

impl OrderClient {
    pub const CREATE_ENDPOINT: &'static str = "order/create";
    pub const FETCH_ENDPOINT: &'static str = "order/fetch";
    pub const FETCH_ADVANCE_ENDPOINT: &'static str = "order/fetch/advance";

    pub fn new(dispatcher: Arc<Dispatcher>, api_key: impl Into<String>) -> Self {
        Self {
            dispatcher,
            api_key: api_key.into(),
        }
    }

    /// Create an order and return the gateway's view of it, including the
    /// payment URL to send the customer to.
    ///
    /// Not idempotent: calling twice creates two orders.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, order), fields(receipt_id = %order.receipt_id, amount = order.amount)))]
    pub async fn create(&self, order: &OrderRequest) -> Result<OrderResponse> {
        order.validate()?;
        let payload = with_key(to_payload(order)?, &self.api_key);
        self.dispatcher
            .post_data(Self::CREATE_ENDPOINT, payload)
            .await
    }

    /// Look up an order by id.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn fetch(&self, order_id: &str) -> Result<OrderResponse> {
        let id = path_segment("order_id", order_id)?;
        self.dispatcher
            .get_data(&format!("{}/{}", Self::FETCH_ENDPOINT, id))
            .await
    }

    /// Look up an order by id with extended detail.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self)))]
    pub async fn fetch_advance(&self, order_id: &str) -> Result<OrderResponse> {
        let id = path_segment("order_id", order_id)?;
        self.dispatcher
            .get_data(&format!("{}/{}", Self::FETCH_ADVANCE_ENDPOINT, id))
            .await
    }
}
