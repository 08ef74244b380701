// src/api.rs
use anyhow::{anyhow, bail, Context};
use reqwest::blocking::{Client, Response};
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::state::{RemoteState, SaveReceipt, StateUpdate};

pub const STATE_PATH: &str = "/api/state";

/// The remote store for the strip state.
pub trait StateBackend: Send + Sync {
    fn fetch(&self) -> anyhow::Result<RemoteState>;
    fn store(&self, update: &StateUpdate) -> anyhow::Result<SaveReceipt>;
}

pub struct HttpBackend {
    client: Client,
    url: String,
}

impl HttpBackend {
    pub fn connect(api_base: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("led-panel/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        let url = format!("{}{}", api_base.trim_end_matches('/'), STATE_PATH);
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl StateBackend for HttpBackend {
    fn fetch(&self) -> anyhow::Result<RemoteState> {
        let resp = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .with_context(|| format!("GET {}", self.url))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("HTTP {}", status.as_u16());
        }
        read_json(resp)
    }

    fn store(&self, update: &StateUpdate) -> anyhow::Result<SaveReceipt> {
        let body = serde_json::to_string(update)?;
        let resp = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .with_context(|| format!("POST {}", self.url))?;
        let status = resp.status();
        // The body is read before the status is checked so the backend's
        // `error` message can be reported.
        let out: Value = read_json(resp)?;
        if !status.is_success() {
            let msg = out
                .get("error")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(anyhow!(msg));
        }
        serde_json::from_value(out).context("decode save response")
    }
}

fn read_json<T: DeserializeOwned>(resp: Response) -> anyhow::Result<T> {
    let text = resp.text().context("read response body")?;
    serde_json::from_str(&text).context("parse response json")
}
