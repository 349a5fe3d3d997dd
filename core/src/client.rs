//! Call-site operations for the riding-record backend.
//!
//! # Design
//! `RidingClient` owns two dispatchers that share one connection pool: a
//! standard one for admin and query calls, and a generation one with a
//! longer budget for the record-generation workflow. Every operation is a
//! `build_*` method that packs its parameters into an `HttpRequest` and an
//! async method that sends it through the right dispatcher. The async
//! methods return the payload unmodified, deserialized into whatever the
//! caller asks for: `serde_json::Value` for the raw payload, or one of the
//! DTOs in `types`. No validation happens here; the backend owns that.

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::dispatcher::{Dispatcher, GENERATION_FALLBACK, STANDARD_FALLBACK};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::types::{BatchGenerateRequest, Credentials, LoginRequest};

pub const ADMIN_LOGIN_PATH: &str = "/admin/login";
pub const ADMIN_ACCOUNTS_PATH: &str = "/admin/accounts";
pub const ADMIN_BATCH_GENERATE_PATH: &str = "/admin/batch-generate";
pub const ADMIN_CHECK_ALL_PATH: &str = "/admin/check-all";
pub const RECORD_CHECK_PATH: &str = "/riding-record/check";
pub const RECORD_GENERATE_PATH: &str = "/riding-record/generate";

#[derive(Debug, Clone)]
pub struct RidingClient {
    standard: Dispatcher,
    generation: Dispatcher,
}

impl RidingClient {
    /// Client against `base_url` with the default timeout budgets.
    pub fn new(base_url: &str) -> Self {
        Self::from_config(&ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let http = Client::new();
        Self {
            standard: Dispatcher::with_http(
                http.clone(),
                &config.base_url,
                config.timeout,
                STANDARD_FALLBACK,
            ),
            generation: Dispatcher::with_http(
                http,
                &config.base_url,
                config.generate_timeout,
                GENERATION_FALLBACK,
            ),
        }
    }

    pub fn standard(&self) -> &Dispatcher {
        &self.standard
    }

    pub fn generation(&self) -> &Dispatcher {
        &self.generation
    }

    pub fn build_admin_login(&self, password: &str) -> Result<HttpRequest, ApiError> {
        self.standard.request_json(
            HttpMethod::Post,
            ADMIN_LOGIN_PATH,
            &LoginRequest {
                password: password.to_string(),
            },
        )
    }

    pub fn build_list_accounts(&self) -> HttpRequest {
        self.standard.request(HttpMethod::Get, ADMIN_ACCOUNTS_PATH)
    }

    pub fn build_batch_generate(&self, usernames: &[String]) -> Result<HttpRequest, ApiError> {
        self.standard.request_json(
            HttpMethod::Post,
            ADMIN_BATCH_GENERATE_PATH,
            &BatchGenerateRequest {
                usernames: usernames.to_vec(),
            },
        )
    }

    pub fn build_check_all(&self) -> HttpRequest {
        self.standard.request(HttpMethod::Post, ADMIN_CHECK_ALL_PATH)
    }

    pub fn build_check_riding_record(
        &self,
        username: &str,
        password: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.standard
            .request_json(HttpMethod::Post, RECORD_CHECK_PATH, &credentials(username, password))
    }

    pub fn build_generate_riding_record(
        &self,
        username: &str,
        password: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.generation.request_json(
            HttpMethod::Post,
            RECORD_GENERATE_PATH,
            &credentials(username, password),
        )
    }

    pub async fn admin_login<T: DeserializeOwned>(&self, password: &str) -> Result<T, ApiError> {
        self.standard.send(self.build_admin_login(password)?).await
    }

    pub async fn list_accounts<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.standard.send(self.build_list_accounts()).await
    }

    pub async fn batch_generate<T: DeserializeOwned>(
        &self,
        usernames: &[String],
    ) -> Result<T, ApiError> {
        self.standard.send(self.build_batch_generate(usernames)?).await
    }

    pub async fn check_all<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.standard.send(self.build_check_all()).await
    }

    pub async fn check_riding_record<T: DeserializeOwned>(
        &self,
        username: &str,
        password: &str,
    ) -> Result<T, ApiError> {
        self.standard
            .send(self.build_check_riding_record(username, password)?)
            .await
    }

    pub async fn generate_riding_record<T: DeserializeOwned>(
        &self,
        username: &str,
        password: &str,
    ) -> Result<T, ApiError> {
        self.generation
            .send(self.build_generate_riding_record(username, password)?)
            .await
    }
}

fn credentials(username: &str, password: &str) -> Credentials {
    Credentials {
        username: username.to_string(),
        password: password.to_string(),
    }
}
