use std::io::ErrorKind;
use std::time::Duration;

use gamejolt_core::{Error, ResponseEnvelope, Result, Transport};

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sent on every request so the service can tell this client apart.
pub const USER_AGENT: &str = concat!("gamejolt-client/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP transport backed by ureq.
///
/// ureq advertises and decodes gzip bodies itself; deflate is not requested.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::config::Config::builder()
                .timeout_global(Some(timeout))
                .http_status_as_error(false)
                .build(),
        );
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl Transport for UreqTransport {
    fn execute(&self, url: &str) -> Result<ResponseEnvelope> {
        let resp = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| Error::Transport(describe_ureq_error(url, e)))?;

        let status = resp.status().as_u16();
        if status != gamejolt_core::STATUS_OK {
            return Ok(ResponseEnvelope::status(status));
        }

        let body = resp
            .into_body()
            .read_to_vec()
            .map_err(|e| Error::Transport(format!("read response: {}", e)))?;
        Ok(ResponseEnvelope { status, body })
    }
}

/// One line naming the host and the kind of failure. The URL itself is
/// never echoed, since its query carries the user token.
fn describe_ureq_error(url: &str, err: ureq::Error) -> String {
    let host = host_of(url);
    match err {
        ureq::Error::Timeout(_) => format!("{} did not answer in time", host),
        ureq::Error::HostNotFound => format!("no such host: {}", host),
        ureq::Error::Io(e) => match e.kind() {
            ErrorKind::ConnectionRefused => format!("{} refused the connection", host),
            ErrorKind::TimedOut => format!("{} did not answer in time", host),
            _ => format!("I/O error talking to {}: {}", host, e),
        },
        ureq::Error::Tls(reason) => format!("TLS handshake with {} failed: {}", host, reason),
        other => {
            let mut msg = other.to_string();
            if let Some((_, query)) = url.split_once('?') {
                msg = msg.replace(query, "<query>");
            }
            format!("request to {} failed: {}", host, msg)
        }
    }
}

/// Scheme and authority only; query strings carry tokens.
fn host_of(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(u) => u.origin().ascii_serialization(),
        Err(_) => "server".to_string(),
    }
}
