//! Infrastructure implementation of the `FleetBackend` port over HTTP.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use anyhow::Result;
use fleetjoin_common::{DeviceTypeManifest, Fleet, NewFleet, ODataList, WhoAmI};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::application::ports::FleetBackend;
use crate::domain::config::ApiConfig;
use crate::domain::error::ProvisionError;
use crate::domain::fleet::FleetFilter;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// REST client for the fleet-management API. Authenticates with a bearer token.
pub struct HttpFleetBackend {
    client: Client,
    base_url: String,
    dashboard_url: String,
    token: Mutex<Option<String>>,
}

fn failed(operation: &'static str, detail: impl ToString) -> ProvisionError {
    ProvisionError::BackendRequestFailed {
        operation,
        detail: detail.to_string(),
    }
}

impl HttpFleetBackend {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("fleetjoin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| failed("building HTTP client", e))?;
        Ok(Self {
            client,
            base_url: api.url.trim_end_matches('/').to_string(),
            dashboard_url: api.dashboard_url.clone(),
            token: Mutex::new(api.token.clone()),
        })
    }

    /// Token currently used for requests.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{path}", self.base_url));
        match self.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(operation: &'static str, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| failed(operation, e))?;
        let status = response.status();
        tracing::debug!(operation, %status, "backend response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(failed(operation, format!("{status}: {}", body.trim())).into())
    }

    async fn json<T: DeserializeOwned>(operation: &'static str, builder: RequestBuilder) -> Result<T> {
        let response = Self::send(operation, builder).await?;
        Ok(response.json().await.map_err(|e| failed(operation, e))?)
    }
}

impl FleetBackend for HttpFleetBackend {
    async fn device_types(&self) -> Result<Vec<DeviceTypeManifest>> {
        Self::json(
            "listing device types",
            self.request(Method::GET, "/device-types/v1"),
        )
        .await
    }

    async fn device_type_manifest(&self, slug: &str) -> Result<DeviceTypeManifest> {
        let response = self
            .request(Method::GET, &format!("/device-types/v1/{slug}"))
            .send()
            .await
            .map_err(|e| failed("fetching device type manifest", e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ProvisionError::UnknownDeviceType(slug.to_string()).into());
        }
        let response = response
            .error_for_status()
            .map_err(|e| failed("fetching device type manifest", e))?;
        Ok(response
            .json()
            .await
            .map_err(|e| failed("fetching device type manifest", e))?)
    }

    async fn fleets(&self, filter: &FleetFilter) -> Result<Vec<Fleet>> {
        let odata = filter.to_odata();
        tracing::debug!(filter = %odata, "querying fleets");
        let list: ODataList<Fleet> = Self::json(
            "listing fleets",
            self.request(Method::GET, "/v6/application")
                .query(&[("$filter", odata.as_str())]),
        )
        .await?;
        Ok(list.d)
    }

    async fn create_fleet(&self, name: &str, device_type: &str) -> Result<Fleet> {
        let body = NewFleet {
            app_name: name.to_string(),
            device_type: device_type.to_string(),
        };
        Self::json(
            "creating fleet",
            self.request(Method::POST, "/v6/application").json(&body),
        )
        .await
    }

    async fn update_fleet_device_type(&self, fleet_id: u64, device_type: &str) -> Result<()> {
        Self::send(
            "updating fleet device type",
            self.request(Method::PATCH, &format!("/v6/application({fleet_id})"))
                .json(&json!({ "device_type": device_type })),
        )
        .await?;
        Ok(())
    }

    async fn whoami(&self) -> Result<Option<String>> {
        if self.token().is_none() {
            return Ok(None);
        }
        let response = self
            .request(Method::GET, "/user/v1/whoami")
            .send()
            .await
            .map_err(|e| failed("checking identity", e))?;
        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .map_err(|e| failed("checking identity", e))?;
        let who: WhoAmI = response
            .json()
            .await
            .map_err(|e| failed("checking identity", e))?;
        Ok(Some(who.username))
    }

    async fn is_logged_in(&self) -> Result<bool> {
        Ok(self.whoami().await?.is_some())
    }

    async fn authenticate(&self, token: &str) -> Result<String> {
        let previous = self.token();
        self.set_token(Some(token.trim().to_string()));
        match self.whoami().await {
            Ok(Some(username)) => Ok(username),
            Ok(None) => {
                self.set_token(previous);
                Err(ProvisionError::NotAuthenticated.into())
            }
            Err(e) => {
                self.set_token(previous);
                Err(e)
            }
        }
    }

    async fn generate_config(
        &self,
        fleet: &Fleet,
        values: &Map<String, Value>,
    ) -> Result<Map<String, Value>> {
        let mut body = Map::new();
        body.insert("appId".to_string(), json!(fleet.id));
        body.insert("deviceType".to_string(), json!(fleet.device_type));
        body.extend(values.clone());
        Self::json(
            "generating device config",
            self.request(Method::POST, "/download-config").json(&body),
        )
        .await
    }

    async fn platform_url(&self) -> Result<String> {
        Ok(self.dashboard_url.clone())
    }
}
