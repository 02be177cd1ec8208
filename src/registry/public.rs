use crate::config::RegistryConfig;
use crate::error::OracleError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use tracing::{debug, trace};

/// Registry client for registry.npmjs.org and pypi.org (or mirrors of them).
pub struct PublicRegistry {
    client: Client,
    npm_url: Url,
    pypi_url: Url,
}

impl PublicRegistry {
    /// Creates a client from registry settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a registry URL does not parse as a base URL or the
    /// HTTP client cannot be built.
    pub fn new(config: &RegistryConfig) -> Result<Self, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(OracleError::Client)?;

        Ok(Self {
            client,
            npm_url: base_url(&config.npm_url)?,
            pypi_url: base_url(&config.pypi_url)?,
        })
    }

    /// `{npm_url}/{name}`
    pub fn npm_package_url(&self, name: &str) -> Url {
        join_segments(&self.npm_url, &[name])
    }

    /// `{pypi_url}/pypi/{name}/json`
    pub fn pypi_package_url(&self, name: &str) -> Url {
        join_segments(&self.pypi_url, &["pypi", name, "json"])
    }

    async fn query(&self, name: &str, url: Url) -> Result<bool, OracleError> {
        trace!("Checking registry: {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| OracleError::Network {
                name: name.to_string(),
                source,
            })?;

        let available = availability_from_status(name, response.status())?;
        debug!(package = name, available, "Registry answered");
        Ok(available)
    }
}

#[async_trait]
impl super::RegistryOracle for PublicRegistry {
    async fn is_npm_package_available(&self, name: &str) -> Result<bool, OracleError> {
        self.query(name, self.npm_package_url(name)).await
    }

    async fn is_pypi_package_available(&self, name: &str) -> Result<bool, OracleError> {
        self.query(name, self.pypi_package_url(name)).await
    }
}

/// Maps a registry lookup status to availability.
///
/// 404 means nobody owns the name. Any success status means the name is
/// taken. Everything else is an unexpected answer and an error.
pub fn availability_from_status(name: &str, status: StatusCode) -> Result<bool, OracleError> {
    if status == StatusCode::NOT_FOUND {
        Ok(true)
    } else if status.is_success() {
        Ok(false)
    } else {
        Err(OracleError::Protocol {
            name: name.to_string(),
            status,
        })
    }
}

fn base_url(raw: &str) -> Result<Url, OracleError> {
    let url = Url::parse(raw).map_err(|e| OracleError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(OracleError::InvalidUrl {
            url: raw.to_string(),
            reason: "not a base URL".to_string(),
        });
    }

    Ok(url)
}

fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // base_url() rejects cannot-be-a-base URLs, so this always succeeds
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
