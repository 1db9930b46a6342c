pub mod dto;
pub mod memory;
pub mod placeholder;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{AgendaPayload, Building, Doctor, Room, ScheduleEntry, Specialty};

pub use memory::InMemoryHospital;

#[derive(Clone, Debug)]
pub struct HospitalConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HospitalConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            timeout: config.api_timeout,
        }
    }
}

/// The hospital data service the dashboard reads from and writes to.
#[async_trait]
pub trait HospitalApi: Send + Sync {
    async fn health(&self) -> Result<(), AppError>;
    async fn fetch_doctors(&self) -> Result<Vec<Doctor>, AppError>;
    async fn fetch_specialties(&self) -> Result<Vec<Specialty>, AppError>;
    async fn fetch_schedule_entries(&self) -> Result<Vec<ScheduleEntry>, AppError>;
    async fn fetch_rooms(&self) -> Result<Vec<Room>, AppError>;
    async fn fetch_buildings(&self) -> Result<Vec<Building>, AppError>;
    async fn create_agenda(&self, payload: &AgendaPayload) -> Result<(), AppError>;
    async fn update_agenda(&self, id: i64, payload: &AgendaPayload) -> Result<(), AppError>;
    async fn delete_agenda(&self, id: i64) -> Result<(), AppError>;
}

pub struct HospitalHttpClient {
    client: Client,
    config: HospitalConfig,
}

impl HospitalHttpClient {
    pub fn new(config: HospitalConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build http client: {}", e);
                AppError::InternalServerError
            })?;
        Ok(Self { client, config })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// Send one request and return the raw body of a 2xx answer. Non-2xx
    /// answers, timeouts and transport failures, including a failure while
    /// reading the body, all become errors.
    async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&AgendaPayload>,
    ) -> Result<String, AppError> {
        let mut request = self
            .client
            .request(method.clone(), self.url(endpoint))
            .header("Accept", "application/json");
        if let Some(payload) = body {
            request = request.json(payload);
        }

        let transport_error = |e: reqwest::Error| {
            tracing::warn!("{} {} failed: {}", method, endpoint, e);
            if e.is_timeout() {
                AppError::Timeout
            } else {
                AppError::Http(e)
            }
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let message = dto::error_message(&text)
                .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));
            tracing::warn!("{} {} returned {}: {}", method, endpoint, status, message);
            return Err(AppError::Upstream(message));
        }

        tracing::debug!("{} {} returned {} ({} bytes)", method, endpoint, status, text.len());
        Ok(text)
    }

    /// A list endpoint must answer with JSON; anything else is an error so
    /// the caller keeps what it already has.
    async fn get_list<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, AppError> {
        let text = self.request(Method::GET, endpoint, None).await?;
        let body: Value = serde_json::from_str(&text).map_err(|e| {
            tracing::warn!("GET {} returned a body that is not JSON: {}", endpoint, e);
            AppError::Upstream(format!("Malformed response from {}: {}", endpoint, e))
        })?;
        dto::unwrap_list(body)
    }

    /// Writes only fail on an explicit `success: false`; an empty or
    /// non-envelope body counts as success.
    async fn write(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&AgendaPayload>,
    ) -> Result<(), AppError> {
        let text = self.request(method, endpoint, body).await?;
        let Ok(response) = serde_json::from_str::<Value>(&text) else {
            return Ok(());
        };
        if let Ok(envelope) = serde_json::from_value::<dto::ApiEnvelope>(response) {
            if !envelope.success {
                return Err(AppError::Upstream(
                    envelope
                        .message
                        .unwrap_or_else(|| "Upstream rejected the change".to_string()),
                ));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl HospitalApi for HospitalHttpClient {
    async fn health(&self) -> Result<(), AppError> {
        self.request(Method::GET, "/health", None).await.map(|_| ())
    }

    async fn fetch_doctors(&self) -> Result<Vec<Doctor>, AppError> {
        self.get_list("/api/medicos").await
    }

    async fn fetch_specialties(&self) -> Result<Vec<Specialty>, AppError> {
        let specialties: Vec<Specialty> = self.get_list("/api/medicos/especialidades").await?;
        Ok(specialties.into_iter().filter(Specialty::is_usable).collect())
    }

    async fn fetch_schedule_entries(&self) -> Result<Vec<ScheduleEntry>, AppError> {
        self.get_list("/api/agnd-agenda").await
    }

    async fn fetch_rooms(&self) -> Result<Vec<Room>, AppError> {
        self.get_list("/api/catalogos/consultorios").await
    }

    async fn fetch_buildings(&self) -> Result<Vec<Building>, AppError> {
        self.get_list("/api/catalogos/edificios").await
    }

    async fn create_agenda(&self, payload: &AgendaPayload) -> Result<(), AppError> {
        self.write(Method::POST, "/api/agnd-agenda", Some(payload)).await
    }

    async fn update_agenda(&self, id: i64, payload: &AgendaPayload) -> Result<(), AppError> {
        self.write(Method::PUT, &format!("/api/agnd-agenda/{}", id), Some(payload))
            .await
    }

    async fn delete_agenda(&self, id: i64) -> Result<(), AppError> {
        self.write(Method::DELETE, &format!("/api/agnd-agenda/{}", id), None)
            .await
    }
}
