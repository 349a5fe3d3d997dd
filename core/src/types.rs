//! Request and response DTOs for the riding-record backend.
//!
//! # Design
//! These types mirror the backend's JSON (camelCase on the wire) but are
//! defined independently of the mock-server crate; integration tests catch
//! schema drift between the two. Every response DTO is `#[serde(default)]`
//! and keeps unnamed fields in `extra`, so a sparse or extended payload
//! still parses and nothing the server sent is dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of `POST /admin/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Body of `POST /admin/batch-generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchGenerateRequest {
    pub usernames: Vec<String>,
}

/// Body of the `/riding-record/*` calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Fields the backend sent that no DTO field names.
pub type Extra = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub success: bool,
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Details extracted from a riding certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordDetails {
    pub boarding_date: Option<String>,
    pub expiry_date: Option<String>,
    pub status: Option<String>,
    pub validity_status: Option<String>,
}

/// One configured account as reported by the admin endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Account {
    pub username: String,
    /// Only `/admin/accounts` includes it, so the UI can trigger generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub display_name: String,
    pub enabled: bool,
    /// `None` when the account has never been checked.
    pub has_record: Option<bool>,
    pub record_details: Option<RecordDetails>,
    pub last_check: Option<String>,
}

impl Default for Account {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: None,
            display_name: String::new(),
            enabled: true,
            has_record: None,
            record_details: None,
            last_check: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Statistics {
    pub total_accounts: u32,
    pub enabled_accounts: u32,
    pub accounts_with_records: u32,
    /// Percentage of enabled accounts with a record, one decimal place.
    pub success_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsResponse {
    pub accounts: Vec<Account>,
    pub statistics: Statistics,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckAllResponse {
    pub success: bool,
    pub statistics: Statistics,
    pub accounts: Vec<Account>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckRecordResponse {
    pub has_record: bool,
    pub message: Option<String>,
    /// True when the backend stored these credentials for the first time.
    pub user_saved: bool,
    pub details: Option<Value>,
    #[serde(flatten)]
    pub extra: Extra,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateRecordResponse {
    pub success: bool,
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}
