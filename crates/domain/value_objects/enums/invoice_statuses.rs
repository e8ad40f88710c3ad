use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// `Due` is what the self-managed billing run issues. Provider invoices carry
/// their own lifecycle (draft, open, paid, ...), stored uppercased.
#[derive(Default, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum InvoiceStatus {
    #[default]
    Due,
    Draft,
    Open,
    Paid,
    Void,
    Uncollectible,
    Other(String),
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Due => "DUE",
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Open => "OPEN",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Void => "VOID",
            InvoiceStatus::Uncollectible => "UNCOLLECTIBLE",
            InvoiceStatus::Other(raw) => raw,
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "DUE" => InvoiceStatus::Due,
            "DRAFT" => InvoiceStatus::Draft,
            "OPEN" => InvoiceStatus::Open,
            "PAID" => InvoiceStatus::Paid,
            "VOID" => InvoiceStatus::Void,
            "UNCOLLECTIBLE" => InvoiceStatus::Uncollectible,
            other => InvoiceStatus::Other(other.to_string()),
        }
    }

    pub fn from_provider(status: Option<&str>) -> Self {
        match status {
            Some(raw) if !raw.is_empty() => InvoiceStatus::from_str(&raw.to_ascii_uppercase()),
            _ => InvoiceStatus::Due,
        }
    }
}

impl Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for InvoiceStatus {
    fn from(value: String) -> Self {
        InvoiceStatus::from_str(&value)
    }
}

impl From<InvoiceStatus> for String {
    fn from(value: InvoiceStatus) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_status_is_uppercased() {
        assert_eq!(InvoiceStatus::from_provider(Some("paid")), InvoiceStatus::Paid);
        assert_eq!(
            InvoiceStatus::from_provider(Some("weird")),
            InvoiceStatus::Other("WEIRD".to_string())
        );
    }

    #[test]
    fn missing_provider_status_defaults_to_due() {
        assert_eq!(InvoiceStatus::from_provider(None), InvoiceStatus::Due);
        assert_eq!(InvoiceStatus::from_provider(Some("")), InvoiceStatus::Due);
    }
}
