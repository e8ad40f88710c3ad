use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessDto {
    pub success: bool,
}

impl SuccessDto {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreatedDto {
    pub success: bool,
    pub id: Uuid,
}

impl CreatedDto {
    pub fn new(id: Uuid) -> Self {
        Self { success: true, id }
    }
}

/// Returned to the payment provider once an event has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WebhookReceiptDto {
    pub received: bool,
}
