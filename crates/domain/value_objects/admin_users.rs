use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminLoginDto {
    pub success: bool,
    pub token: String,
}
