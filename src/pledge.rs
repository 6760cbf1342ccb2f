//! Remote pledge API client.
//!
//! Pledge records live in the campaign's upstream service; this backend only
//! consumes the numeric identifier it hands back.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// The five conditions a pledger accepts. All must be checked before a
/// submission is forwarded upstream.
pub const PLEDGE_CONDITIONS: [&str; 5] = [
    "I am aware of the harmful effects that drugs have on our society.",
    "I commit to not using drugs or any harmful substances.",
    "I will not encourage anyone to use drugs and will discourage drug use in my community.",
    "I will report any instances of drug use or trafficking to the authorities to help fight drug abuse.",
    "I will support and help those affected by drugs to recover and lead a healthy, normal life.",
];

#[derive(Debug, Error)]
pub enum PledgeError {
    #[error("http: {0}")]
    Http(String),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pledge api error {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("{0}")]
    NotFound(String),
}

fn pledge_api_url() -> String {
    std::env::var("PLEDGE_API_URL")
        .unwrap_or_else(|_| "https://mulearn.org/api/v1/drugfreekerala".to_string())
}

/// Record shape shared by the create and lookup endpoints. `is_error` flags
/// a duplicate submission; the upstream then echoes the already-registered
/// name and email.
#[derive(Debug, Clone, Deserialize)]
pub struct PledgeRecord {
    pub id: u64,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body carried by lookup misses.
#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: Option<String>,
}

pub async fn create_pledge(
    http: &reqwest::Client,
    name: &str,
    email: &str,
) -> Result<PledgeRecord, PledgeError> {
    let url = format!("{}/create/", pledge_api_url());
    let resp = http
        .post(url)
        .header("Accept", "application/json")
        .json(&serde_json::json!({ "name": name, "email": email }))
        .send()
        .await
        .map_err(|e| PledgeError::Http(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(PledgeError::Api { status, body });
    }

    resp.json::<PledgeRecord>()
        .await
        .map_err(|e| PledgeError::Http(e.to_string()))
}

pub async fn lookup_by_email(
    http: &reqwest::Client,
    email: &str,
) -> Result<PledgeRecord, PledgeError> {
    let url = format!(
        "{}/get/?email={}",
        pledge_api_url(),
        urlencoding::encode(email)
    );
    let resp = http
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(|e| PledgeError::Http(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&body)
            .ok()
            .and_then(|m| m.message);
        return match message {
            Some(msg) => Err(PledgeError::NotFound(msg)),
            None if status == StatusCode::NOT_FOUND => {
                Err(PledgeError::NotFound("Certificate not found".to_string()))
            }
            None => Err(PledgeError::Api { status, body }),
        };
    }

    resp.json::<PledgeRecord>()
        .await
        .map_err(|e| PledgeError::Http(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_response() {
        let rec: PledgeRecord = serde_json::from_str(r#"{"id": 42, "is_error": false}"#).unwrap();
        assert_eq!(rec.id, 42);
        assert!(!rec.is_error);
        assert!(rec.name.is_none());
    }

    #[test]
    fn parses_duplicate_response_with_echoed_fields() {
        let rec: PledgeRecord = serde_json::from_str(
            r#"{"id": 7, "is_error": true, "name": "Jane Doe", "email": "jane@example.com"}"#,
        )
        .unwrap();
        assert!(rec.is_error);
        assert_eq!(rec.name.as_deref(), Some("Jane Doe"));
        assert_eq!(rec.email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn missing_flags_default_to_false() {
        let rec: PledgeRecord = serde_json::from_str(r#"{"id": 1}"#).unwrap();
        assert!(!rec.is_error);
    }
}
