//! Blocking HTTP client for the PuppetDB v4 query API.
//!
//! One fetch per fact family per run, no retries; retry/backoff policy
//! belongs to whoever invokes the report. An empty fragment array is a
//! fatal condition, never valid output.

use std::fs;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::TlsMaterial;
use crate::errors::{ReportError, ReportResult};
use crate::models::FactFragment;

const FACT_CONTENTS_PATH: &str = "/pdb/query/v4/fact-contents";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct PuppetDbClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl PuppetDbClient {
    /// Build a client for `base_url`, with mutual TLS when `tls` is given.
    pub fn new(base_url: &str, tls: Option<&TlsMaterial>) -> ReportResult<Self> {
        let mut builder = reqwest::blocking::Client::builder().timeout(REQUEST_TIMEOUT);

        if let Some(tls) = tls {
            let mut identity_pem = fs::read(&tls.cert)?;
            identity_pem.extend(fs::read(&tls.key)?);
            let identity = reqwest::Identity::from_pem(&identity_pem)
                .map_err(|e| ReportError::Config(format!("invalid client certificate/key: {e}")))?;
            let ca = reqwest::Certificate::from_pem(&fs::read(&tls.ca_cert)?)
                .map_err(|e| ReportError::Config(format!("invalid CA certificate: {e}")))?;
            builder = builder.identity(identity).add_root_certificate(ca);
        }

        let http = builder
            .build()
            .map_err(|e| ReportError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the fact-contents endpoint this client queries.
    pub fn endpoint(&self) -> String {
        format!("{}{FACT_CONTENTS_PATH}", self.base_url)
    }

    /// Execute one fact-contents query and parse the fragment array.
    pub fn fact_contents(&self, query: &str) -> ReportResult<Vec<FactFragment>> {
        let url = self.endpoint();
        debug!("querying {url} with {query}");

        let response = self
            .http
            .get(&url)
            .query(&[("query", query)])
            .send()
            .map_err(|e| ReportError::Transport {
                url: url.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReportError::Transport {
                url,
                message: format!("server returned {status}"),
            });
        }

        let fragments: Vec<FactFragment> =
            response.json().map_err(|e| ReportError::Transport {
                url: url.clone(),
                message: format!("invalid response body: {e}"),
            })?;
        if fragments.is_empty() {
            return Err(ReportError::EmptyResponse { url });
        }

        info!("fetched {} fact fragments from {url}", fragments.len());
        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_trims_trailing_slash() {
        let client = PuppetDbClient::new("https://puppetdb.example.com:8081/", None).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://puppetdb.example.com:8081/pdb/query/v4/fact-contents"
        );
    }
}
