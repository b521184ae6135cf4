//! Blocking HTTP fetch for the JSON bodies we describe.
//!
//! Only `http`/`https` URLs are accepted, loopback and private hosts are
//! refused unless explicitly allowed, and bodies are capped both by the
//! declared `Content-Length` and by what is actually read.

use std::io::Read;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use indexmap::IndexMap;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use url::{Host, Url};

use crate::error::{Error, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const MAX_RESPONSE_BYTES: u64 = 10 * 1024 * 1024;

const ACCEPT_VALUE: &str = "application/json, text/plain, */*";
const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Patch => Self::PATCH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_response_bytes: u64,
    pub user_agent: String,
    /// Permit loopback/private/link-local targets.
    pub allow_local: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            max_response_bytes: MAX_RESPONSE_BYTES,
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            allow_local: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FetchRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: IndexMap<String, String>,
    pub body: Option<String>,
}

/// Parse and vet `raw` against the protocol allow-list and local-host policy.
pub fn validate_url(raw: &str, config: &FetchConfig) -> Result<Url> {
    let url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::InvalidProtocol { scheme: url.scheme().to_string() });
    }
    if !config.allow_local && is_local_host(&url) {
        return Err(Error::LocalAddress { host: url.host_str().unwrap_or_default().to_string() });
    }
    Ok(url)
}

fn is_local_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => is_local_v4(ip),
        Some(Host::Ipv6(ip)) => is_local_v6(ip),
        None => false,
    }
}

fn check_redirect(next: &Url, hops: usize) -> std::result::Result<(), String> {
    if hops >= MAX_REDIRECTS {
        return Err(format!("too many redirects ({hops})"));
    }
    if is_local_host(next) {
        return Err(format!("redirect to local address {next} refused"));
    }
    Ok(())
}

fn is_local_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private()
}

fn is_local_v6(ip: Ipv6Addr) -> bool {
    // fe80::/10 is link-local
    ip.is_loopback() || (ip.segments()[0] & 0xffc0) == 0xfe80
}

pub fn fetch_json(request: &FetchRequest, config: &FetchConfig) -> Result<Value> {
    let url = validate_url(&request.url, config)?;

    let mut builder = Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str());
    if config.allow_local {
        // local targets never go through a proxy
        builder = builder.no_proxy();
    } else {
        // every hop is held to the same local-host policy as the first URL
        builder = builder.redirect(Policy::custom(|attempt| {
            match check_redirect(attempt.url(), attempt.previous().len()) {
                Ok(()) => attempt.follow(),
                Err(reason) => attempt.error(reason),
            }
        }));
    }
    let client = builder.build()?;

    let mut req = client
        .request(request.method.into(), url.clone())
        .header(ACCEPT, ACCEPT_VALUE);
    for (name, value) in &request.headers {
        req = req.header(name.as_str(), value.as_str());
    }
    if let Some(body) = &request.body {
        req = req.body(body.clone());
    }

    info!(method = ?request.method, url = %url, "fetching");
    let response = req.send().map_err(|e| classify(e, config))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        });
    }
    if let Some(size) = response.content_length() {
        if size > config.max_response_bytes {
            return Err(Error::ResponseTooLarge { size, limit: config.max_response_bytes });
        }
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let bytes = read_capped(response, config.max_response_bytes)?;
    debug!(bytes = bytes.len(), content_type = %content_type, "response received");
    decode_body(&content_type, &bytes)
}

fn classify(err: reqwest::Error, config: &FetchConfig) -> Error {
    if err.is_redirect() {
        if let Some(url) = err.url().filter(|url| is_local_host(url)) {
            return Error::LocalAddress { host: url.host_str().unwrap_or_default().to_string() };
        }
    }
    if err.is_timeout() {
        Error::Timeout { timeout_ms: config.timeout.as_millis() as u64 }
    } else if err.is_connect() {
        Error::Network(err.to_string())
    } else {
        Error::Http(err)
    }
}

fn read_capped(reader: impl Read, limit: u64) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(limit.saturating_add(1)).read_to_end(&mut buf)?;
    let size = buf.len() as u64;
    if size > limit {
        return Err(Error::ResponseTooLarge { size, limit });
    }
    Ok(buf)
}

/// JSON content types are parsed, `text/*` stays text, anything else is
/// parsed when possible and kept as text otherwise.
pub fn decode_body(content_type: &str, bytes: &[u8]) -> Result<Value> {
    if content_type.contains("application/json") {
        return Ok(serde_json::from_slice(bytes)?);
    }
    if content_type.contains("text/") {
        return Ok(Value::String(String::from_utf8_lossy(bytes).into_owned()));
    }
    Ok(serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned())))
}
