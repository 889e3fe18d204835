// src/core/net.rs
// Blocking HTTP(S) GET behind a trait, so fetchers can be driven offline.

use std::io;
use std::time::Duration;

use tracing::debug;

use crate::config::consts::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS, USER_AGENT};
use crate::error::FetchError;

/// The one network capability the fetchers need.
/// Created by the entry point and shared by every fetcher for the whole run.
pub trait HttpClient: Send + Sync {
    /// Body of a 2xx response as text.
    fn get(&self, url: &str) -> Result<String, FetchError>;
}

/// Production client: one `ureq::Agent` (connection pool + cookies) with a
/// browser-like user agent and bounded connect/read times.
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new(user_agent: &str, connect_timeout: Duration, read_timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(user_agent)
            .timeout_connect(connect_timeout)
            .timeout_read(read_timeout)
            .build();
        Self { agent }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new(
            USER_AGENT,
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            Duration::from_secs(READ_TIMEOUT_SECS),
        )
    }
}

impl HttpClient for UreqClient {
    fn get(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {url}");
        match self.agent.get(url).call() {
            Ok(resp) => resp.into_string().map_err(|e| from_io(url, &e)),
            Err(ureq::Error::Status(status, _)) => Err(FetchError::Status { url: s!(url), status }),
            Err(ureq::Error::Transport(t)) => Err(from_transport(url, &t)),
        }
    }
}

fn from_io(url: &str, e: &io::Error) -> FetchError {
    if is_timeout(e.kind()) {
        FetchError::Timeout { url: s!(url) }
    } else {
        FetchError::Transport { url: s!(url), message: e.to_string() }
    }
}

fn from_transport(url: &str, t: &ureq::Transport) -> FetchError {
    let timed_out = std::error::Error::source(t)
        .and_then(|src| src.downcast_ref::<io::Error>())
        .is_some_and(|e| is_timeout(e.kind()));
    if timed_out {
        FetchError::Timeout { url: s!(url) }
    } else {
        FetchError::Transport { url: s!(url), message: t.to_string() }
    }
}

fn is_timeout(kind: io::ErrorKind) -> bool {
    // Read deadlines surface as WouldBlock on some platforms.
    matches!(kind, io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}
