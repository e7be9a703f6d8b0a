use anyhow::Context;
use log::{debug, warn};
use reqwest::blocking::Client;
use std::time::Duration;
use tococore::feed::ContractionRecord;

/// Forwards completed contractions to the persistence collaborator.
///
/// The collaborator's schema is its own; this sink only POSTs the record
/// fields the core knows about. A failed insert is logged and the record
/// abandoned; there is no retry.
pub struct RecordSink {
    client: Client,
    endpoint: Option<String>,
}

impl RecordSink {
    pub fn new(endpoint: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .context("building persistence client")?;
        Ok(Self { client, endpoint })
    }

    /// Sink that keeps records in memory only.
    pub fn disabled() -> Self {
        Self {
            client: Client::new(),
            endpoint: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    pub fn record(&self, record: &ContractionRecord) {
        let endpoint = match self.endpoint.as_deref() {
            Some(endpoint) => endpoint,
            None => return,
        };

        match self.client.post(endpoint).json(record).send() {
            Ok(response) if response.status().is_success() => {
                debug!("record inserted ({} s contraction)", record.duration_seconds);
            }
            Ok(response) => {
                warn!("record insert rejected: HTTP {}", response.status());
            }
            Err(err) => {
                warn!("record insert failed: {}", err);
            }
        }
    }
}
