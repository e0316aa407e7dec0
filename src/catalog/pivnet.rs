//! Blocking HTTP client for the Pivotal Network release catalog
//!
//! Only the endpoints the check needs are covered. Requests are not retried:
//! any failure aborts the check and the pipeline re-runs it later.

use crate::catalog::Catalog;
use crate::core::config::Source;
use crate::core::error::{CatalogError, ConfigError, ResourceResult};
use crate::release::{Release, ReleaseDependency, ReleaseId, ReleaseType};
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Legacy API tokens are exactly this long; anything longer is a UAA refresh token
const LEGACY_TOKEN_LEN: usize = 20;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for [`PivnetClient`]
#[derive(Debug, Clone)]
pub struct PivnetConfig {
  pub endpoint: String,
  pub api_token: String,
  pub skip_ssl_verification: bool,
  pub user_agent: String,
  pub timeout: Duration,
}

impl PivnetConfig {
  /// Build settings from the resource source
  pub fn from_source(source: &Source, binary_version: &str) -> Self {
    Self {
      endpoint: source.endpoint().to_string(),
      api_token: source.api_token.clone(),
      skip_ssl_verification: source.skip_ssl_verification,
      user_agent: user_agent(binary_version, "check", &source.product_slug),
      timeout: DEFAULT_TIMEOUT,
    }
  }
}

/// User agent sent with every catalog request
pub fn user_agent(binary_version: &str, container_type: &str, product_slug: &str) -> String {
  format!(
    "product-stemcell-resource/{} ({}--{})",
    binary_version, container_type, product_slug
  )
}

/// Catalog client over `reqwest::blocking`
pub struct PivnetClient {
  http: Client,
  base_url: String,
  authorization: String,
}

impl PivnetClient {
  /// Create a client and resolve the authorization header
  ///
  /// Refresh tokens are exchanged for an access token up front, so this makes
  /// one request when the configured token is not a legacy token.
  pub fn connect(config: PivnetConfig) -> ResourceResult<Self> {
    let base_url = base_url(&config.endpoint)?;

    let http = Client::builder()
      .timeout(config.timeout)
      .user_agent(config.user_agent.clone())
      .danger_accept_invalid_certs(config.skip_ssl_verification)
      .build()
      .map_err(|e| CatalogError::Transport {
        url: base_url.clone(),
        message: e.to_string(),
      })?;

    let authorization = if is_legacy_token(&config.api_token) {
      format!("Token {}", config.api_token)
    } else {
      let url = format!("{}/api/v2/authentication/access_tokens", base_url);
      tracing::debug!("Exchanging refresh token for access token");
      let body = serde_json::json!({ "refresh_token": config.api_token });
      let token: AccessTokenResponse = send(http.post(&url).json(&body), &url)?;
      format!("Bearer {}", token.access_token)
    };

    Ok(Self {
      http,
      base_url,
      authorization,
    })
  }

  fn get<T: DeserializeOwned>(&self, path: &str) -> ResourceResult<T> {
    let url = format!("{}/api/v2{}", self.base_url, path);
    tracing::debug!(%url, "GET");
    let request = self
      .http
      .get(&url)
      .header(reqwest::header::AUTHORIZATION, &self.authorization)
      .header(reqwest::header::ACCEPT, "application/json");
    send(request, &url)
  }
}

impl Catalog for PivnetClient {
  fn release_types(&self) -> ResourceResult<Vec<ReleaseType>> {
    let response: ReleaseTypesResponse = self.get("/releases/release_types")?;
    Ok(response.release_types)
  }

  fn releases_for_product(&self, product_slug: &str) -> ResourceResult<Vec<Release>> {
    let response: ReleasesResponse = self.get(&format!("/products/{}/releases", product_slug))?;
    Ok(response.releases)
  }

  fn release_dependencies(&self, product_slug: &str, release_id: ReleaseId) -> ResourceResult<Vec<ReleaseDependency>> {
    let response: DependenciesResponse = self.get(&format!(
      "/products/{}/releases/{}/dependencies",
      product_slug, release_id
    ))?;
    Ok(response.into_dependencies())
  }

  fn release_by_version(&self, product_slug: &str, version: &str) -> ResourceResult<Release> {
    self
      .releases_for_product(product_slug)?
      .into_iter()
      .find(|r| r.version == version)
      .ok_or_else(|| {
        CatalogError::ReleaseNotFound {
          product_slug: product_slug.to_string(),
          version: version.to_string(),
        }
        .into()
      })
  }
}

fn send<T: DeserializeOwned>(request: RequestBuilder, url: &str) -> ResourceResult<T> {
  let response = request.send().map_err(|e| CatalogError::Transport {
    url: url.to_string(),
    message: e.to_string(),
  })?;

  let status = response.status();
  if !status.is_success() {
    let body = response.text().unwrap_or_default();
    return Err(
      CatalogError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body: body.trim().to_string(),
      }
      .into(),
    );
  }

  response.json::<T>().map_err(|e| {
    CatalogError::Decode {
      url: url.to_string(),
      message: e.to_string(),
    }
    .into()
  })
}

fn is_legacy_token(token: &str) -> bool {
  token.len() <= LEGACY_TOKEN_LEN
}

fn base_url(endpoint: &str) -> ResourceResult<String> {
  let trimmed = endpoint.trim().trim_end_matches('/');
  if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) || trimmed.contains(char::is_whitespace) {
    return Err(
      ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
      }
      .into(),
    );
  }
  Ok(trimmed.to_string())
}

#[derive(Deserialize)]
struct AccessTokenResponse {
  access_token: String,
}

#[derive(Deserialize)]
struct ReleaseTypesResponse {
  release_types: Vec<ReleaseType>,
}

#[derive(Deserialize)]
struct ReleasesResponse {
  releases: Vec<Release>,
}

#[derive(Deserialize)]
struct DependenciesResponse {
  #[serde(default)]
  dependencies: Vec<DependencyEntry>,
}

#[derive(Deserialize)]
struct DependencyEntry {
  release: DependentRelease,
}

#[derive(Deserialize)]
struct DependentRelease {
  id: ReleaseId,
  version: String,
  product: DependentProduct,
}

#[derive(Deserialize)]
struct DependentProduct {
  slug: String,
}

impl DependenciesResponse {
  fn into_dependencies(self) -> Vec<ReleaseDependency> {
    self
      .dependencies
      .into_iter()
      .map(|entry| ReleaseDependency {
        release_id: entry.release.id,
        version: entry.release.version,
        product_slug: entry.release.product.slug,
      })
      .collect()
  }
}
