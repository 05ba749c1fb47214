//! REST client registry implementation.
//!
//! Speaks the record services' HTTP API: contestants and race classes live
//! in the event service, races and start lists in the race service. Every
//! request carries the caller's bearer token; a 401 from either service
//! surfaces as `RegistryError::Unauthorized` so batch operations can abort.

use async_trait::async_trait;
use log::debug;
use reqwest::header::LOCATION;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::api::{ContestantId, EventId, RaceId, StartEntryId};
use crate::models::{Contestant, Race, RaceTime, Raceclass, StartEntry};
use crate::registry::config::RestSettings;
use crate::registry::repository::{
    ContestantRegistry, ErrorContext, RaceRegistry, RegistryError, RegistryResult,
};

/// Registry backed by the live event and race record services.
pub struct RestRegistry {
    client: Client,
    event_service_url: String,
    race_service_url: String,
    token: String,
}

impl RestRegistry {
    /// Create a client for the configured service endpoints.
    ///
    /// # Arguments
    /// * `settings` - Service base URLs and timeout
    /// * `token` - Bearer token of the logged-in user
    pub fn new(settings: &RestSettings, token: impl Into<String>) -> RegistryResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_sec))
            .build()
            .map_err(|e| {
                RegistryError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            event_service_url: settings.event_service_url.trim_end_matches('/').to_string(),
            race_service_url: settings.race_service_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Map a non-success response to the matching registry error.
    async fn check_response(resp: Response, operation: &str) -> RegistryResult<Response> {
        let status = resp.status();
        debug!("{} - got response {}", operation, status);
        if status.is_success() {
            return Ok(resp);
        }

        let detail = resp
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("detail")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| status.to_string());
        let context = ErrorContext::new(operation);

        Err(match status {
            StatusCode::UNAUTHORIZED => {
                RegistryError::unauthorized(format!("401 Unauthorized - {}", operation))
                    .with_context(context)
            }
            StatusCode::NOT_FOUND => RegistryError::not_found(detail).with_context(context),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                RegistryError::validation(detail).with_context(context)
            }
            _ => RegistryError::internal(format!("Error - {}: {}", status, detail))
                .with_context(context),
        })
    }

    /// Decode a race document, tolerating list endpoints that carry start
    /// entries as bare id strings instead of full records.
    fn race_from_value(mut value: Value) -> RegistryResult<Race> {
        if let Some(entries) = value.get("start_entries").and_then(Value::as_array) {
            if entries.iter().any(Value::is_string) {
                value["start_entries"] = Value::Array(Vec::new());
            }
        }
        serde_json::from_value(value)
            .map_err(|e| RegistryError::internal(format!("Invalid race document: {}", e)))
    }
}

#[async_trait]
impl ContestantRegistry for RestRegistry {
    async fn raceclasses(&self, event_id: &EventId) -> RegistryResult<Vec<Raceclass>> {
        let url = format!("{}/events/{}/raceclasses", self.event_service_url, event_id);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;
        let resp = Self::check_response(resp, "raceclasses").await?;
        Ok(resp.json().await?)
    }

    async fn contestants_by_raceclass(
        &self,
        event_id: &EventId,
        raceclass: &str,
    ) -> RegistryResult<Vec<Contestant>> {
        let url = format!("{}/events/{}/contestants", self.event_service_url, event_id);
        let resp = self
            .client
            .get(&url)
            .query(&[("raceclass", raceclass)])
            .header("Authorization", self.bearer())
            .send()
            .await?;
        let resp = Self::check_response(resp, "contestants_by_raceclass").await?;
        Ok(resp.json().await?)
    }

    async fn contestant_by_id(
        &self,
        event_id: &EventId,
        contestant_id: &ContestantId,
    ) -> RegistryResult<Contestant> {
        let url = format!(
            "{}/events/{}/contestants/{}",
            self.event_service_url, event_id, contestant_id
        );
        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;
        let resp = Self::check_response(resp, "contestant_by_id").await?;
        Ok(resp.json().await?)
    }

    async fn contestant_by_bib(
        &self,
        event_id: &EventId,
        bib: i32,
    ) -> RegistryResult<Option<Contestant>> {
        let url = format!("{}/events/{}/contestants", self.event_service_url, event_id);
        let resp = self
            .client
            .get(&url)
            .query(&[("bib", bib)])
            .header("Authorization", self.bearer())
            .send()
            .await?;
        let resp = Self::check_response(resp, "contestant_by_bib").await?;
        // The service answers bib queries with a list; empty means free
        let mut holders: Vec<Contestant> = resp.json().await?;
        Ok(if holders.is_empty() {
            None
        } else {
            Some(holders.swap_remove(0))
        })
    }

    async fn update_contestant(&self, contestant: &Contestant) -> RegistryResult<()> {
        let url = format!(
            "{}/events/{}/contestants/{}",
            self.event_service_url, contestant.event_id, contestant.id
        );
        let resp = self
            .client
            .put(&url)
            .header("Authorization", self.bearer())
            .json(contestant)
            .send()
            .await?;
        Self::check_response(resp, "update_contestant").await?;
        Ok(())
    }
}

#[async_trait]
impl RaceRegistry for RestRegistry {
    async fn races_for_event(&self, event_id: &EventId) -> RegistryResult<Vec<Race>> {
        let url = format!("{}/races", self.race_service_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("eventId", event_id.value())])
            .header("Authorization", self.bearer())
            .send()
            .await?;
        let resp = Self::check_response(resp, "races_for_event").await?;
        let raw: Vec<Value> = resp.json().await?;
        raw.into_iter().map(Self::race_from_value).collect()
    }

    async fn races_by_raceclass(
        &self,
        event_id: &EventId,
        raceclass: &str,
    ) -> RegistryResult<Vec<Race>> {
        let url = format!("{}/races", self.race_service_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("eventId", event_id.value()), ("raceclass", raceclass)])
            .header("Authorization", self.bearer())
            .send()
            .await?;
        let resp = Self::check_response(resp, "races_by_raceclass").await?;
        let raw: Vec<Value> = resp.json().await?;
        raw.into_iter().map(Self::race_from_value).collect()
    }

    async fn race_by_id(&self, race_id: &RaceId) -> RegistryResult<Race> {
        let url = format!("{}/races/{}", self.race_service_url, race_id);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;
        let resp = Self::check_response(resp, "race_by_id").await?;
        let raw: Value = resp.json().await?;
        Self::race_from_value(raw)
    }

    async fn update_race(&self, race: &Race) -> RegistryResult<()> {
        let url = format!("{}/races/{}", self.race_service_url, race.id);
        let resp = self
            .client
            .put(&url)
            .header("Authorization", self.bearer())
            .json(race)
            .send()
            .await?;
        Self::check_response(resp, "update_race").await?;
        Ok(())
    }

    async fn create_start_entry(&self, entry: &StartEntry) -> RegistryResult<StartEntryId> {
        let url = format!(
            "{}/races/{}/start-entries",
            self.race_service_url, entry.race_id
        );
        let resp = self
            .client
            .post(&url)
            .header("Authorization", self.bearer())
            .json(entry)
            .send()
            .await?;
        let resp = Self::check_response(resp, "create_start_entry").await?;

        // The service hands back the new id in the Location header
        let id = resp
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|location| location.rsplit('/').next())
            .map(str::to_string)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                RegistryError::internal("Missing Location header on start entry create")
            })?;
        Ok(StartEntryId::new(id))
    }

    async fn delete_start_entry(
        &self,
        race_id: &RaceId,
        start_entry_id: &StartEntryId,
    ) -> RegistryResult<()> {
        let url = format!(
            "{}/races/{}/start-entries/{}",
            self.race_service_url, race_id, start_entry_id
        );
        let resp = self
            .client
            .delete(&url)
            .header("Authorization", self.bearer())
            .send()
            .await?;
        Self::check_response(resp, "delete_start_entry").await?;
        Ok(())
    }

    async fn update_start_time(
        &self,
        event_id: &EventId,
        order: u32,
        new_time: &RaceTime,
    ) -> RegistryResult<()> {
        let url = format!("{}/raceplans/update-start-time", self.race_service_url);
        // Only the time-of-day travels on the wire
        let body = serde_json::json!({
            "order": order,
            "new_time": new_time.time_of_day(),
        });
        let resp = self
            .client
            .put(&url)
            .query(&[("eventId", event_id.value())])
            .header("Authorization", self.bearer())
            .json(&body)
            .send()
            .await?;
        Self::check_response(resp, "update_start_time").await?;
        Ok(())
    }
}
