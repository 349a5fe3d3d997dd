//! In-memory stand-in for the riding-record backend.
//!
//! Serves the same routes under `/api` with the backend's JSON shapes and
//! status codes. Accounts live in a `RwLock`ed map; generating a record
//! stamps today's date on the account. `MockConfig` adds artificial delays
//! so callers can exercise their timeout budgets.

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_ADMIN_PASSWORD: &str = "PASSWD";

/// Days a generated certificate stays valid.
pub const CERTIFICATE_VALID_DAYS: u64 = 30;

#[derive(Clone, Debug)]
pub struct MockConfig {
    pub admin_password: String,
    pub check_delay: Duration,
    pub generate_delay: Duration,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            check_delay: Duration::ZERO,
            generate_delay: Duration::ZERO,
        }
    }
}

impl MockConfig {
    pub fn from_env() -> Self {
        Self {
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string()),
            ..Self::default()
        }
    }
}

/// Certificate details as the scraper reports them (snake_case).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Certificate {
    pub riding_date: String,
    pub expiry_date: String,
    pub status: String,
    pub expiry_status: String,
}

/// The same details as the admin endpoints present them (camelCase).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RecordView {
    pub boarding_date: String,
    pub expiry_date: String,
    pub status: String,
    pub validity_status: String,
}

impl From<&Certificate> for RecordView {
    fn from(cert: &Certificate) -> Self {
        Self {
            boarding_date: cert.riding_date.clone(),
            expiry_date: cert.expiry_date.clone(),
            status: cert.status.clone(),
            validity_status: cert.expiry_status.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StoredAccount {
    pub password: String,
    pub display_name: String,
    pub enabled: bool,
    pub has_record: Option<bool>,
    pub certificate: Option<Certificate>,
    pub last_check: Option<String>,
}

impl StoredAccount {
    fn new(username: &str, password: &str) -> Self {
        Self {
            password: password.to_string(),
            display_name: username.to_string(),
            enabled: true,
            has_record: None,
            certificate: None,
            last_check: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub display_name: String,
    pub enabled: bool,
    pub has_record: Option<bool>,
    pub record_details: Option<RecordView>,
    pub last_check: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_accounts: u32,
    pub enabled_accounts: u32,
    pub accounts_with_records: u32,
    pub success_rate: f64,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct BatchGenerateRequest {
    #[serde(default)]
    pub usernames: Vec<String>,
}

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Credentials {
    /// Both fields, when present and non-empty.
    fn pair(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self.password.as_deref().filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

pub type Db = Arc<RwLock<BTreeMap<String, StoredAccount>>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<MockConfig>,
    pub db: Db,
}

impl AppState {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config: Arc::new(config),
            db: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }
}

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn failure(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "success": false, "message": message.into() })),
    )
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    router(AppState::new(config))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/admin/login", post(admin_login))
        .route("/api/admin/accounts", get(list_accounts))
        .route("/api/admin/batch-generate", post(batch_generate))
        .route("/api/admin/check-all", post(check_all))
        .route("/api/riding-record/check", post(check_record))
        .route("/api/riding-record/generate", post(generate_record))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Local::now().to_rfc3339(),
        "service": "riding-record-mock",
    }))
}

async fn admin_login(State(state): State<AppState>, Json(input): Json<LoginRequest>) -> ApiResult {
    if input.password.as_deref() == Some(state.config.admin_password.as_str()) {
        Ok(Json(json!({ "success": true, "message": "登录成功" })))
    } else {
        tracing::info!("admin login rejected");
        Err(failure(StatusCode::UNAUTHORIZED, "密码错误"))
    }
}

async fn list_accounts(State(state): State<AppState>) -> Json<Value> {
    let db = state.db.read().await;
    let accounts = account_views(&db, true);
    let statistics = statistics(&accounts);
    Json(json!({ "accounts": accounts, "statistics": statistics }))
}

async fn batch_generate(
    State(state): State<AppState>,
    Json(input): Json<BatchGenerateRequest>,
) -> ApiResult {
    if input.usernames.is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "用户名列表不能为空"));
    }

    let today = Local::now().date_naive();
    let mut db = state.db.write().await;
    let mut results = Vec::with_capacity(input.usernames.len());
    let mut succeeded = 0;
    for username in &input.usernames {
        match db.get_mut(username) {
            Some(account) if account.enabled => {
                stamp_certificate(account, today);
                succeeded += 1;
                results.push(json!({
                    "username": username,
                    "success": true,
                    "message": "乘车记录生成成功！",
                }));
            }
            _ => results.push(json!({
                "username": username,
                "success": false,
                "message": "账号不存在",
            })),
        }
    }
    let failed = results.len() - succeeded;

    Ok(Json(json!({
        "success": true,
        "message": format!("批量生成完成：成功 {succeeded} 个，失败 {failed} 个"),
        "results": results,
    })))
}

async fn check_all(State(state): State<AppState>) -> Json<Value> {
    let now = Local::now().to_rfc3339();
    let mut db = state.db.write().await;
    for account in db.values_mut().filter(|a| a.enabled) {
        account.has_record = Some(account.certificate.is_some());
        account.last_check = Some(now.clone());
    }
    let accounts = account_views(&db, false);
    let statistics = statistics(&accounts);
    Json(json!({ "success": true, "statistics": statistics, "accounts": accounts }))
}

async fn check_record(State(state): State<AppState>, Json(input): Json<Credentials>) -> ApiResult {
    let Some((username, password)) = input.pair() else {
        return Err(failure(StatusCode::BAD_REQUEST, "用户名和密码不能为空"));
    };
    tokio::time::sleep(state.config.check_delay).await;

    let mut db = state.db.write().await;
    let user_saved = !db.contains_key(username);
    let account = db
        .entry(username.to_string())
        .or_insert_with(|| StoredAccount::new(username, password));
    account.password = password.to_string();
    let has_record = account.certificate.is_some();
    account.has_record = Some(has_record);
    account.last_check = Some(Local::now().to_rfc3339());

    let mut message = if has_record { "查询成功" } else { "暂无乘车记录" }.to_string();
    if user_saved {
        message.push_str(&format!(" (用户 {username} 已保存到配置文件)"));
    }
    let mut body = json!({
        "hasRecord": has_record,
        "message": message,
        "userSaved": user_saved,
    });
    if let Some(certificate) = &account.certificate {
        body["details"] = json!(certificate);
    }
    Ok(Json(body))
}

async fn generate_record(
    State(state): State<AppState>,
    Json(input): Json<Credentials>,
) -> ApiResult {
    let Some((username, password)) = input.pair() else {
        return Err(failure(StatusCode::BAD_REQUEST, "用户名和密码不能为空"));
    };
    tracing::info!(%username, delay_ms = state.config.generate_delay.as_millis() as u64, "generating riding record");
    tokio::time::sleep(state.config.generate_delay).await;

    let today = Local::now().date_naive();
    let mut db = state.db.write().await;
    let account = db
        .entry(username.to_string())
        .or_insert_with(|| StoredAccount::new(username, password));
    account.password = password.to_string();
    stamp_certificate(account, today);

    Ok(Json(json!({ "success": true, "message": "乘车记录生成成功！" })))
}

fn stamp_certificate(account: &mut StoredAccount, today: NaiveDate) {
    let expiry = today
        .checked_add_days(Days::new(CERTIFICATE_VALID_DAYS))
        .unwrap_or(today);
    account.certificate = Some(Certificate {
        riding_date: japanese_date(today),
        expiry_date: japanese_date(expiry),
        status: "CERTIFIED!".to_string(),
        expiry_status: expiry_status(expiry, today),
    });
    account.has_record = Some(true);
    account.last_check = Some(Local::now().to_rfc3339());
}

/// `2024年3月9日` style, as printed on the certificate page.
pub fn japanese_date(date: NaiveDate) -> String {
    date.format("%Y年%-m月%-d日").to_string()
}

pub fn expiry_status(expiry: NaiveDate, today: NaiveDate) -> String {
    let days = (expiry - today).num_days();
    if days >= 0 {
        format!("有效（还有{days}天）")
    } else {
        format!("已过期（过期{}天）", -days)
    }
}

fn account_views(db: &BTreeMap<String, StoredAccount>, with_password: bool) -> Vec<AccountView> {
    db.iter()
        .filter(|(_, account)| account.enabled)
        .map(|(username, account)| AccountView {
            username: username.clone(),
            password: with_password.then(|| account.password.clone()),
            display_name: account.display_name.clone(),
            enabled: account.enabled,
            has_record: account.has_record,
            record_details: account.certificate.as_ref().map(RecordView::from),
            last_check: account.last_check.clone(),
        })
        .collect()
}

/// Counts over enabled accounts; the rate is a percentage with one decimal.
pub fn statistics(accounts: &[AccountView]) -> Statistics {
    let enabled = accounts.len() as u32;
    let with_records = accounts
        .iter()
        .filter(|a| a.has_record == Some(true))
        .count() as u32;
    let success_rate = if enabled > 0 {
        (f64::from(with_records) / f64::from(enabled) * 1000.0).round() / 10.0
    } else {
        0.0
    };
    Statistics {
        total_accounts: enabled,
        enabled_accounts: enabled,
        accounts_with_records: with_records,
        success_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(has_record: Option<bool>) -> AccountView {
        AccountView {
            username: "u".to_string(),
            password: None,
            display_name: "u".to_string(),
            enabled: true,
            has_record,
            record_details: None,
            last_check: None,
        }
    }

    #[test]
    fn statistics_of_empty_list_is_zero() {
        let stats = statistics(&[]);
        assert_eq!(stats.total_accounts, 0);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn success_rate_rounds_to_one_decimal() {
        let stats = statistics(&[view(Some(true)), view(Some(false)), view(None)]);
        assert_eq!(stats.enabled_accounts, 3);
        assert_eq!(stats.accounts_with_records, 1);
        assert_eq!(stats.success_rate, 33.3);
    }

    #[test]
    fn japanese_date_drops_leading_zeros() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(japanese_date(date), "2024年3月9日");
    }

    #[test]
    fn expiry_status_counts_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let later = NaiveDate::from_ymd_opt(2024, 4, 8).unwrap();
        assert_eq!(expiry_status(later, today), "有效（还有30天）");
        assert_eq!(expiry_status(today, later), "已过期（过期30天）");
    }

    #[test]
    fn credentials_require_both_fields() {
        let input: Credentials = serde_json::from_str(r#"{"username":"u","password":""}"#).unwrap();
        assert!(input.pair().is_none());
        let input: Credentials = serde_json::from_str(r#"{"username":"u","password":"p"}"#).unwrap();
        assert_eq!(input.pair(), Some(("u", "p")));
    }

    #[test]
    fn record_view_renames_fields() {
        let cert = Certificate {
            riding_date: "2024年3月9日".to_string(),
            expiry_date: "2024年4月8日".to_string(),
            status: "CERTIFIED!".to_string(),
            expiry_status: "有效（还有30天）".to_string(),
        };
        let json = serde_json::to_value(RecordView::from(&cert)).unwrap();
        assert_eq!(json["boardingDate"], "2024年3月9日");
        assert_eq!(json["validityStatus"], "有效（还有30天）");
    }
}
