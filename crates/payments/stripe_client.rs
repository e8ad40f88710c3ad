use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::domain::value_objects::provider_events::{
    ProviderEvent, ProviderEventKind, ProviderInvoice, ProviderSubscription,
};

type HmacSha256 = Hmac<Sha256>;

const STRIPE_API: &str = "https://api.stripe.com/v1";

/// Signed events older than this are rejected.
pub const WEBHOOK_TOLERANCE_SECS: i64 = 300;

/// Minimal Stripe client built on reqwest.
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
    webhook_secret: Option<String>,
}

#[derive(Debug, Error)]
pub enum WebhookVerificationError {
    #[error("webhook signing secret is not configured")]
    NotConfigured,
    #[error("malformed stripe-signature header: {0}")]
    MalformedHeader(&'static str),
    #[error("webhook signature does not match")]
    SignatureMismatch,
    #[error("webhook timestamp outside tolerance")]
    Expired,
    #[error("invalid webhook payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
pub struct StripeEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub type_: String,
    pub created: Option<i64>,
    pub livemode: Option<bool>,
    pub data: Option<StripeEventData>,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorDetails,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetails {
    #[serde(rename = "type")]
    type_: Option<String>,
    code: Option<String>,
    message: Option<String>,
    param: Option<String>,
}

/// A field Stripe sends either as an id or as the expanded object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StripeExpandable {
    Id(String),
    Object { id: String },
}

impl StripeExpandable {
    pub fn id(&self) -> &str {
        match self {
            StripeExpandable::Id(id) => id,
            StripeExpandable::Object { id } => id,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct StripePrice {
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscription {
    pub id: String,
    pub customer: Option<StripeExpandable>,
    pub status: Option<String>,
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub items: StripeList<StripeSubscriptionItem>,
}

#[derive(Debug, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,
}

impl<T> Default for StripeList<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

#[derive(Debug, Deserialize)]
pub struct StripeSubscriptionItem {
    pub current_period_end: Option<i64>,
    pub price: Option<StripePrice>,
}

impl StripeSubscription {
    /// Returns the subscription period end timestamp, falling back to the first item when needed.
    pub fn period_end(&self) -> Option<i64> {
        self.current_period_end.or_else(|| {
            self.items
                .data
                .first()
                .and_then(|item| item.current_period_end)
        })
    }

    pub fn price_id(&self) -> Option<String> {
        self.items
            .data
            .first()
            .and_then(|item| item.price.as_ref())
            .and_then(|price| price.id.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct StripeInvoice {
    pub id: String,
    pub customer: Option<StripeExpandable>,
    pub status: Option<String>,
    pub total: Option<i64>,
    pub due_date: Option<i64>,
    pub next_payment_attempt: Option<i64>,
    pub created: Option<i64>,
    #[serde(default)]
    pub lines: StripeList<StripeInvoiceLine>,
}

#[derive(Debug, Deserialize)]
pub struct StripeInvoiceLine {
    pub price: Option<StripePrice>,
    pub plan: Option<StripePrice>,
}

impl StripeInvoice {
    pub fn price_id(&self) -> Option<String> {
        let line = self.lines.data.first()?;
        line.price
            .as_ref()
            .and_then(|price| price.id.clone())
            .or_else(|| line.plan.as_ref().and_then(|plan| plan.id.clone()))
    }
}

impl StripeEvent {
    /// Reduces the raw event to what the billing reconciler acts on. Events
    /// without an object, of unknown type, or whose object does not parse are
    /// returned as `Ignored`.
    pub fn into_provider_event(self) -> ProviderEvent {
        let ignored = |event_type: String| ProviderEvent::Ignored { event_type };

        let Some(kind) = ProviderEventKind::from_type(&self.type_) else {
            return ignored(self.type_);
        };
        let Some(object) = self.data.and_then(|data| data.object) else {
            return ignored(self.type_);
        };

        if kind.is_subscription() {
            match serde_json::from_value::<StripeSubscription>(object) {
                Ok(subscription) => ProviderEvent::Subscription {
                    kind,
                    subscription: ProviderSubscription {
                        current_period_end: subscription.period_end(),
                        price_id: subscription.price_id(),
                        customer: subscription.customer.as_ref().map(|c| c.id().to_string()),
                        status: subscription.status,
                        id: subscription.id,
                    },
                },
                Err(_) => ignored(self.type_),
            }
        } else {
            match serde_json::from_value::<StripeInvoice>(object) {
                Ok(invoice) => ProviderEvent::Invoice {
                    kind,
                    invoice: ProviderInvoice {
                        price_id: invoice.price_id(),
                        customer: invoice.customer.as_ref().map(|c| c.id().to_string()),
                        status: invoice.status,
                        total: invoice.total,
                        due_date: invoice.due_date,
                        next_payment_attempt: invoice.next_payment_attempt,
                        created: invoice.created,
                        id: invoice.id,
                    },
                },
                Err(_) => ignored(self.type_),
            }
        }
    }
}

impl StripeClient {
    pub fn new(secret_key: String, webhook_secret: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
            webhook_secret,
        }
    }

    async fn ensure_success(
        resp: reqwest::Response,
        context: &str,
    ) -> Result<reqwest::Response> {
        if resp.status().is_success() {
            return Ok(resp);
        }

        let status = resp.status();
        let request_id = resp
            .headers()
            .get("request-id")
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());

        let body = match resp.text().await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => "<empty response body>".to_string(),
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        let details = serde_json::from_str::<StripeErrorEnvelope>(&body)
            .ok()
            .map(|envelope| envelope.error);

        error!(
            status = %status,
            stripe_request_id = ?request_id,
            stripe_error_type = ?details.as_ref().and_then(|d| d.type_.as_deref()),
            stripe_error_code = ?details.as_ref().and_then(|d| d.code.as_deref()),
            stripe_error_param = ?details.as_ref().and_then(|d| d.param.as_deref()),
            stripe_error_message = ?details.as_ref().and_then(|d| d.message.as_deref()),
            context = %context,
            "stripe api request failed"
        );

        anyhow::bail!(
            "Stripe API request failed: {} (status {}, request_id={:?})",
            context,
            status,
            request_id
        );
    }

    async fn post_form<T>(&self, path: &str, body: &[(String, String)], context: &str) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let resp = self
            .http
            .post(format!("{STRIPE_API}{path}"))
            .header(AUTHORIZATION, format!("Bearer {}", self.secret_key))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(body)
            .send()
            .await?;
        let resp = Self::ensure_success(resp, context).await?;
        Ok(resp.json().await?)
    }

    /// Creates a Stripe customer tagged with the brand id.
    pub async fn create_customer(&self, email: &str, name: &str, brand_id: Uuid) -> Result<String> {
        let body = vec![
            ("email".to_string(), email.to_string()),
            ("name".to_string(), name.to_string()),
            ("metadata[brand_id]".to_string(), brand_id.to_string()),
        ];

        #[derive(Deserialize)]
        struct CustomerResp {
            id: String,
        }

        let parsed: CustomerResp = self.post_form("/customers", &body, "create customer").await?;
        Ok(parsed.id)
    }

    /// Creates a subscription-mode Checkout Session and returns its URL.
    pub async fn create_checkout_session(
        &self,
        price_id: &str,
        customer_id: &str,
        metadata: HashMap<String, String>,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<String> {
        let mut body: Vec<(String, String)> = vec![
            ("mode".to_string(), "subscription".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("line_items[0][price]".to_string(), price_id.to_string()),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("customer".to_string(), customer_id.to_string()),
            ("success_url".to_string(), success_url.to_string()),
            ("cancel_url".to_string(), cancel_url.to_string()),
        ];

        for (key, value) in metadata {
            body.push((format!("metadata[{}]", key), value.clone()));
            body.push((format!("subscription_data[metadata][{}]", key), value));
        }

        #[derive(Deserialize)]
        struct CheckoutResp {
            url: Option<String>,
        }

        let parsed: CheckoutResp = self
            .post_form("/checkout/sessions", &body, "create checkout session")
            .await?;
        parsed
            .url
            .ok_or_else(|| anyhow::anyhow!("Stripe Checkout session URL is missing"))
    }

    /// Creates a billing-portal session and returns its URL.
    pub async fn create_portal_session(&self, customer_id: &str, return_url: &str) -> Result<String> {
        let body = vec![
            ("customer".to_string(), customer_id.to_string()),
            ("return_url".to_string(), return_url.to_string()),
        ];

        #[derive(Deserialize)]
        struct PortalResp {
            url: String,
        }

        let parsed: PortalResp = self
            .post_form("/billing_portal/sessions", &body, "create portal session")
            .await?;
        Ok(parsed.url)
    }

    /// Verifies the webhook signature. https://stripe.com/docs/webhooks/signatures
    pub fn verify_webhook_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> std::result::Result<StripeEvent, WebhookVerificationError> {
        let secret = self
            .webhook_secret
            .as_deref()
            .ok_or(WebhookVerificationError::NotConfigured)?;
        verify_signed_payload(secret, payload, signature_header, Utc::now().timestamp())
    }
}

pub fn verify_signed_payload(
    secret: &str,
    payload: &[u8],
    signature_header: &str,
    now: i64,
) -> std::result::Result<StripeEvent, WebhookVerificationError> {
    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<&str> = Vec::new();

    for part in signature_header.split(',') {
        let part = part.trim();
        if let Some(rest) = part.strip_prefix("t=") {
            timestamp = Some(rest);
        } else if let Some(rest) = part.strip_prefix("v1=") {
            signatures.push(rest);
        }
    }

    let timestamp = timestamp.ok_or(WebhookVerificationError::MalformedHeader("missing t"))?;
    if signatures.is_empty() {
        return Err(WebhookVerificationError::MalformedHeader("missing v1"));
    }
    let issued_at: i64 = timestamp
        .parse()
        .map_err(|_| WebhookVerificationError::MalformedHeader("non-numeric t"))?;

    let mut signed_payload = Vec::with_capacity(timestamp.len() + 1 + payload.len());
    signed_payload.extend_from_slice(timestamp.as_bytes());
    signed_payload.push(b'.');
    signed_payload.extend_from_slice(payload);

    let matched = signatures.iter().any(|candidate| {
        let Ok(provided) = hex::decode(candidate) else {
            return false;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return false;
        };
        mac.update(&signed_payload);
        mac.verify_slice(&provided).is_ok()
    });
    if !matched {
        return Err(WebhookVerificationError::SignatureMismatch);
    }

    if (now - issued_at).abs() > WEBHOOK_TOLERANCE_SECS {
        return Err(WebhookVerificationError::Expired);
    }

    Ok(serde_json::from_slice(payload)?)
}

/// Builds a `stripe-signature` header value for `payload`.
pub fn sign_payload(secret: &str, payload: &[u8], timestamp: i64) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    ))
}
