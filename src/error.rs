use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use reqwest::blocking::Response;
use thiserror::Error;

/// Suffix every valid base URL must end with.
pub const BASE_URL_SUFFIX: &str = ".lizard.net/api/v4";

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error type returned by all client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The base URL does not point at a v4 Lizard API root.
    #[error("base url should end with: {BASE_URL_SUFFIX} (got {url})")]
    InvalidUrl { url: String },

    /// Client or session configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// A GET against the named endpoint failed.
    #[error("failed to get {endpoint} data from Lizard: {source}")]
    Get { endpoint: String, source: Failure },

    /// A POST against the named endpoint failed.
    #[error("failed to post {endpoint} data to Lizard: {source}")]
    Post { endpoint: String, source: Failure },
}

impl Error {
    pub(crate) fn get(endpoint: impl Into<String>, source: impl Into<Failure>) -> Self {
        Error::Get {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    pub(crate) fn post(endpoint: impl Into<String>, source: impl Into<Failure>) -> Self {
        Error::Post {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }
}

/// Underlying cause of a failed GET or POST.
#[derive(Debug, Error)]
pub enum Failure {
    /// Transport error, timeout, or undecodable reply.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The service replied with a non-2xx status.
    #[error("{detail}")]
    Status { status: StatusCode, detail: String },

    /// An expected field was missing or malformed in the reply.
    #[error("response field {0:?} missing or malformed")]
    Field(&'static str),

    /// A local file could not be read.
    #[error("could not read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// Lizard error replies carry either {"detail": ...} or {"message": ...}.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) detail: Option<String>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

/// Passes 2xx replies through; folds anything else into a
/// [`Failure::Status`] carrying the body's own error message.
pub(crate) fn check(resp: Response) -> Result<Response, Failure> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().to_string();
    let text = resp.text().unwrap_or_default();
    let server_msg = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.detail.or(b.message))
        .unwrap_or_else(|| text.trim().to_string());

    let hint = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            "; check that the session carries a valid api key (username: __key__, password: <key>)"
        }
        StatusCode::NOT_FOUND => {
            "; the endpoint may not exist on this Lizard instance, or the base url is wrong"
        }
        _ => "",
    };

    Err(Failure::Status {
        status,
        detail: format!("HTTP {} for url ({}): {}{}", status, url, server_msg, hint),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_error_names_the_endpoint() {
        let err = Error::get("observationtypes", Failure::Field("results"));
        assert_eq!(
            err.to_string(),
            "failed to get observationtypes data from Lizard: \
             response field \"results\" missing or malformed"
        );
    }

    #[test]
    fn invalid_url_error_names_the_required_suffix() {
        let err = Error::InvalidUrl {
            url: "https://www.google.com".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains(".lizard.net/api/v4"));
        assert!(msg.contains("https://www.google.com"));
    }

    #[test]
    fn error_body_prefers_detail_over_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"detail": "not found", "message": "ignored"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("not found"));
    }
}
