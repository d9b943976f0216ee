use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client as HttpClient, multipart};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::load_config;
use crate::endpoint::Endpoint;
use crate::error::{BASE_URL_SUFFIX, Error, Failure, Result, check};
use crate::models::{Event, EventBatch, Location, ObservationType, Timeseries, zulu};
use crate::page::{IdRow, Page, UuidRow};

// Per-call timeouts, sized to the service's response characteristics:
// listing observation types is slower than a point lookup, and bulk or
// raster calls are the slowest.
const TIMEOUT_SHORT: Duration = Duration::from_secs(10);
const TIMEOUT_MEDIUM: Duration = Duration::from_secs(15);
const TIMEOUT_LONG: Duration = Duration::from_secs(30);

/// Idle connections kept pooled per host, http and https alike.
const POOL_SIZE: usize = 5;

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base API URL, e.g. `https://demo.lizard.net/api/v4`.
    pub url: String,
    /// API key, sent as the `password` header with `username: __key__`.
    pub key: String,
}

/// Blocking client for a v4 Lizard API root.
///
/// Every method performs exactly one HTTP round trip and blocks until it
/// completes or its timeout elapses. The client holds no cache and no
/// state beyond the session and the base URL.
#[derive(Debug, Clone)]
pub struct Client {
    http: HttpClient,
    base_url: String,
}

/// Outcome of a uuid lookup that can match more than one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UuidLookup {
    /// Exactly one resource matched.
    One(String),
    /// Several resources matched; every uuid on the first page.
    Many(Vec<String>),
}

impl Client {
    /// Creates a client using environment variables and/or `.lizardrc`.
    ///
    /// This is equivalent to `Client::new(None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `url`/`key` arguments
    /// - environment variables `LIZARDAPI_URL` / `LIZARDAPI_KEY`
    /// - config file from `LIZARDAPI_RC`, `./.lizardrc` or `~/.lizardrc`
    pub fn new(url: Option<String>, key: Option<String>) -> Result<Self> {
        let cfg = load_config(url, key)?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("lizardapi-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("lizardapi-rs")),
        );
        default_headers.insert("username", HeaderValue::from_static("__key__"));
        default_headers.insert(
            "password",
            HeaderValue::from_str(&cfg.key).map_err(|_| {
                Error::Config("api key cannot be sent as a header value".to_string())
            })?,
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .pool_max_idle_per_host(POOL_SIZE)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP session: {e}")))?;

        Self::with_session(http, cfg.url)
    }

    /// Wraps an existing session.
    ///
    /// Fails with [`Error::InvalidUrl`] unless `base_url` ends with
    /// `.lizard.net/api/v4`, then probes the root with a GET to verify
    /// the host is reachable. The session is stored as passed in; its
    /// pool settings are whatever it was built with.
    pub fn with_session(http: HttpClient, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !base_url.ends_with(BASE_URL_SUFFIX) {
            return Err(Error::InvalidUrl { url: base_url });
        }

        let client = Self { http, base_url };
        client.probe()?;
        Ok(client)
    }

    /// The validated base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying session.
    pub fn session(&self) -> &HttpClient {
        &self.http
    }

    // Reachability only; the reply's status code is not inspected.
    fn probe(&self) -> Result<()> {
        self.http
            .get(&self.base_url)
            .timeout(TIMEOUT_SHORT)
            .send()
            .map_err(|e| Error::get("api root", e))?;
        Ok(())
    }

    /// Creates an observation type and returns the decoded reply.
    pub fn post_observation_type(&self, observation_type: &ObservationType) -> Result<Value> {
        let url = format!("{}/observationtypes/", self.base_url);
        self.post_json(&url, observation_type, TIMEOUT_MEDIUM)
            .map_err(|e| Error::post("observationtypes", e))
    }

    /// Lists observation types matching the given query parameters.
    pub fn get_observation_types(&self, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/observationtypes/", self.base_url);
        let run = || -> Result<Value, Failure> {
            let resp = check(
                self.http
                    .get(&url)
                    .query(params)
                    .timeout(TIMEOUT_MEDIUM)
                    .send()?,
            )?;
            Ok(resp.json()?)
        };
        run().map_err(|e| Error::get("observationtypes", e))
    }

    /// Resolves a single observation-type id from a raw query string.
    ///
    /// Zero matches and ambiguous matches both resolve to `None`.
    pub fn get_observation_type_id(&self, query: &str) -> Result<Option<i64>> {
        let url = format!("{}/observationtypes/?{}", self.base_url, query);
        let page: Page<IdRow> = self
            .get_page(&url, TIMEOUT_SHORT)
            .map_err(|e| Error::get("observationtypes", e))?;

        match page.count {
            1 => {
                let id = page
                    .results
                    .first()
                    .map(|row| row.id)
                    .ok_or_else(|| Error::get("observationtypes", Failure::Field("results")))?;
                info!("observation type found with id: {}", id);
                Ok(Some(id))
            }
            0 => {
                warn!("no observation type was found");
                Ok(None)
            }
            count if count > 2 => {
                warn!("more than 1 observation type was found");
                Ok(None)
            }
            // A count of exactly 2 yields no match and no warning.
            _ => Ok(None),
        }
    }

    /// Fetches the first results page of any list endpoint.
    ///
    /// No match yields `None` with a warning; the reply's `count` may
    /// exceed the number of results returned, since only the first page
    /// is read.
    pub fn get_objects(&self, endpoint: Endpoint, query: &str) -> Result<Option<Vec<Value>>> {
        let url = format!("{}/{}/?{}", self.base_url, endpoint, query);
        let page: Page<Value> = self
            .get_page(&url, TIMEOUT_SHORT)
            .map_err(|e| Error::get(endpoint.as_str(), e))?;

        if page.count == 0 {
            warn!("no {} was found", endpoint);
            return Ok(None);
        }
        Ok(Some(page.results))
    }

    /// Resolves resource uuids from a raw query string.
    ///
    /// An exact match yields [`UuidLookup::One`]; no match yields `None`
    /// with a warning; more than two matches yield [`UuidLookup::Many`]
    /// with every uuid on the first page.
    pub fn get_object_uuid(&self, endpoint: Endpoint, query: &str) -> Result<Option<UuidLookup>> {
        let url = format!("{}/{}/?{}", self.base_url, endpoint, query);
        let page: Page<UuidRow> = self
            .get_page(&url, TIMEOUT_SHORT)
            .map_err(|e| Error::get(endpoint.as_str(), e))?;

        match page.count {
            1 => {
                let uuid = page
                    .results
                    .into_iter()
                    .next()
                    .map(|row| row.uuid)
                    .ok_or_else(|| Error::get(endpoint.as_str(), Failure::Field("results")))?;
                info!("{} found with uuid: {}", endpoint, uuid);
                Ok(Some(UuidLookup::One(uuid)))
            }
            0 => {
                warn!("no {} was found", endpoint);
                Ok(None)
            }
            count if count > 2 => {
                let uuids = page.results.into_iter().map(|row| row.uuid).collect();
                Ok(Some(UuidLookup::Many(uuids)))
            }
            // A count of exactly 2 yields no match and no warning.
            _ => Ok(None),
        }
    }

    /// Creates a location and returns the new resource's uuid.
    pub fn post_location(&self, location: &Location) -> Result<String> {
        let url = format!("{}/locations/", self.base_url);
        let body = self
            .post_json(&url, location, TIMEOUT_SHORT)
            .map_err(|e| Error::post("locations", e))?;

        let uuid = body
            .get("uuid")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::post("locations", Failure::Field("uuid")))?
            .to_string();
        info!("a location was successfully posted with uuid: {}", uuid);
        Ok(uuid)
    }

    /// Creates a time series; the caller extracts the uuid from the reply.
    pub fn post_timeseries(&self, timeseries: &Timeseries) -> Result<Value> {
        let url = format!("{}/timeseries/", self.base_url);
        let body = self
            .post_json(&url, timeseries, TIMEOUT_SHORT)
            .map_err(|e| Error::post("timeseries", e))?;
        info!("a timeseries was successfully posted");
        Ok(body)
    }

    /// Appends events to one time series.
    pub fn post_timeseries_events(&self, timeseries_uuid: &str, events: &[Event]) -> Result<Value> {
        let url = format!("{}/timeseries/{}/events/", self.base_url, timeseries_uuid);
        let body = self
            .post_json(&url, &events, TIMEOUT_SHORT)
            .map_err(|e| Error::post("events", e))?;
        info!(
            "event data posted successfully to timeseries with uuid: {}",
            timeseries_uuid
        );
        Ok(body)
    }

    /// Posts events for many time series in one call.
    pub fn post_bulk_events(&self, batches: &[EventBatch]) -> Result<Value> {
        let url = format!("{}/timeseries/events/", self.base_url);
        self.post_json(&url, &batches, TIMEOUT_LONG)
            .map_err(|e| Error::post("events", e))
    }

    /// Resolves a raster source uuid by exact name match.
    ///
    /// Anything other than exactly one match yields `None`.
    pub fn get_raster_source_uuid(&self, name: &str) -> Result<Option<String>> {
        let url = format!("{}/rastersources/?name={}", self.base_url, name);
        let page: Page<UuidRow> = self
            .get_page(&url, TIMEOUT_SHORT)
            .map_err(|e| Error::get("rastersources", e))?;

        if page.count == 1 {
            let uuid = page
                .results
                .into_iter()
                .next()
                .map(|row| row.uuid)
                .ok_or_else(|| Error::get("rastersources", Failure::Field("results")))?;
            Ok(Some(uuid))
        } else {
            Ok(None)
        }
    }

    /// Creates a raster source and returns the decoded reply.
    pub fn post_raster_source<T: Serialize>(&self, raster_source: &T) -> Result<Value> {
        let url = format!("{}/rastersources/", self.base_url);
        self.post_json(&url, raster_source, TIMEOUT_LONG)
            .map_err(|e| Error::post("rastersources", e))
    }

    /// Resolves a raster uuid by exact name match, like
    /// [`Client::get_raster_source_uuid`].
    pub fn get_raster_uuid(&self, name: &str) -> Result<Option<String>> {
        let url = format!("{}/rasters/?name={}", self.base_url, name);
        let page: Page<UuidRow> = self
            .get_page(&url, TIMEOUT_LONG)
            .map_err(|e| Error::get("rasters", e))?;

        if page.count == 1 {
            let uuid = page
                .results
                .into_iter()
                .next()
                .map(|row| row.uuid)
                .ok_or_else(|| Error::get("rasters", Failure::Field("results")))?;
            Ok(Some(uuid))
        } else {
            Ok(None)
        }
    }

    /// Creates a raster and returns the decoded reply.
    pub fn post_raster<T: Serialize>(&self, raster: &T) -> Result<Value> {
        let url = format!("{}/rasters/", self.base_url);
        self.post_json(&url, raster, TIMEOUT_LONG)
            .map_err(|e| Error::post("rasters", e))
    }

    /// Uploads a raster file (e.g. a GeoTIFF) to a raster source.
    ///
    /// The body is multipart form data with one `file` part read from
    /// `filepath` and one `timestamp` part. The multipart body carries
    /// its own boundary content type on this request only; the session's
    /// default headers are not touched.
    pub fn upload_raster_file(
        &self,
        filepath: impl AsRef<Path>,
        raster_source_uuid: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Value> {
        let url = format!(
            "{}/rastersources/{}/data/",
            self.base_url, raster_source_uuid
        );
        let path = filepath.as_ref();

        let form = multipart::Form::new()
            .text("timestamp", timestamp.format(zulu::FORMAT).to_string())
            .file("file", path)
            .map_err(|e| {
                Error::post(
                    "rastersources",
                    Failure::File {
                        path: path.to_path_buf(),
                        source: e,
                    },
                )
            })?;

        let run = || -> Result<Value, Failure> {
            let resp = check(
                self.http
                    .post(&url)
                    .multipart(form)
                    .timeout(TIMEOUT_SHORT)
                    .send()?,
            )?;
            Ok(resp.json()?)
        };
        let body = run().map_err(|e| Error::post("rastersources", e))?;
        info!(
            "raster file posted successfully to raster source with uuid: {}",
            raster_source_uuid
        );
        Ok(body)
    }

    /// Reads the status of a background task, `"UNKNOWN"` when the reply
    /// carries none.
    pub fn get_task_status(&self, task_uuid: &str) -> Result<String> {
        let url = format!("{}/tasks/?uuid_in={}", self.base_url, task_uuid);
        let run = || -> Result<Value, Failure> {
            let resp = check(self.http.get(&url).timeout(TIMEOUT_SHORT).send()?)?;
            Ok(resp.json()?)
        };
        let body = run().map_err(|e| Error::get("tasks", e))?;

        // Read off the reply's top level, which for this list endpoint
        // is usually absent.
        Ok(body
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("UNKNOWN")
            .to_string())
    }

    fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Duration,
    ) -> Result<Page<T>, Failure> {
        let resp = check(self.http.get(url).timeout(timeout).send()?)?;
        Ok(resp.json()?)
    }

    fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        timeout: Duration,
    ) -> Result<Value, Failure> {
        let resp = check(self.http.post(url).timeout(timeout).json(body).send()?)?;
        Ok(resp.json()?)
    }
}
