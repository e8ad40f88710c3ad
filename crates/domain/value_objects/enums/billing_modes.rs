use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Process-wide billing mode, resolved once from configuration at startup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    /// Subscriptions and invoices are written directly by this service.
    SelfManaged,
    /// The payment provider drives the lifecycle through webhook events.
    Managed,
}

impl BillingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingMode::SelfManaged => "self_managed",
            BillingMode::Managed => "managed",
        }
    }
}

impl Display for BillingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
