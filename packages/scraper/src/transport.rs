//! HTTP access to the portal.
//!
//! The session pipeline builds [`PortalRequest`]s and hands them to a
//! [`Transport`]. Cookies travel explicitly: responses report the
//! `Set-Cookie` pairs they carried and requests forward them as a `Cookie`
//! header, so the whole session state is visible to the pipeline.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use strum_macros::{AsRefStr, Display};

use crate::{PortalConfig, TransportError};

/// HTTP method of a portal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

/// A single request to the portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    /// URL-encoded form fields; only sent with [`Method::Post`].
    pub form: Vec<(String, String)>,
}

impl PortalRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            form: Vec::new(),
        }
    }

    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            ..Self::get(url)
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_owned(), value.into()));
        self
    }

    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.form.push((name.to_owned(), value.into()));
        self
    }

    /// Returns the first header value with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first form value with the given name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The parts of a portal response the pipeline uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalResponse {
    pub status: u16,
    /// `name=value` pairs from every `Set-Cookie` header.
    pub cookies: Vec<String>,
    pub body: String,
}

impl PortalResponse {
    /// A `200 OK` response with the given body and no cookies.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            cookies: Vec::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.cookies.push(cookie.to_owned());
        self
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends portal requests.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs `request` and returns the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response could be obtained.
    async fn fetch(&self, request: PortalRequest) -> Result<PortalResponse, TransportError>;
}

/// [`Transport`] backed by a [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds a client with the configured timeout, user agent, and the
    /// browser-like default headers the portal expects.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Http`] if the client cannot be built.
    pub fn new(config: &PortalConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            "sec-ch-ua",
            HeaderValue::from_static(r#""Not)A;Brand";v="8", "Chromium";v="138""#),
        );
        headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
        headers.insert("sec-ch-ua-platform", HeaderValue::from_static(r#""Windows""#));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, request: PortalRequest) -> Result<PortalResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url).form(&request.form),
        };

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidHeader(format!("name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::InvalidHeader(format!("value '{value}': {e}")))?;
            builder = builder.header(name, value);
        }

        log::debug!("{} {}", request.method, request.url);

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(cookie_pair)
            .collect();
        let body = response.text().await?;

        Ok(PortalResponse {
            status,
            cookies,
            body,
        })
    }
}

/// Extracts the leading `name=value` pair from a `Set-Cookie` header.
fn cookie_pair(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?.trim();
    if pair.contains('=') {
        Some(pair.to_owned())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_cookie_name_and_value() {
        assert_eq!(
            cookie_pair("XSRF-TOKEN=abc%3D; expires=Tue, 01 Jan 2030 00:00:00 GMT; path=/").as_deref(),
            Some("XSRF-TOKEN=abc%3D")
        );
        assert_eq!(cookie_pair("garbage"), None);
    }

    #[test]
    fn looks_up_headers_case_insensitively() {
        let request = PortalRequest::post("https://portal.example/x")
            .with_header("X-Requested-With", "XMLHttpRequest")
            .with_field("_token", "tok");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.header("x-requested-with"), Some("XMLHttpRequest"));
        assert_eq!(request.field("_token"), Some("tok"));
        assert_eq!(request.field("missing"), None);
    }

    #[test]
    fn classifies_status_codes() {
        assert!(PortalResponse::ok("").is_success());
        let mut response = PortalResponse::ok("");
        response.status = 503;
        assert!(!response.is_success());
    }
}
