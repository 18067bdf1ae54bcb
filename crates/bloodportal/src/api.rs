//! Access to the remote donor/donation store.
//!
//! [`DonorApi`] is the seam the portal talks through; [`HttpApi`] is the
//! reqwest implementation used by the binary.

use std::fmt;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, trace};

use crate::config::{parse_base_url, ApiConfig};
use crate::error::{Error, Result};
use crate::model::{DeleteDonor, Donation, Donor, NewDonation, NewDonor, StatusReply};

const APPLICATION_JSON: &str = "application/json";

/// Path of the donor collection.
pub const DONORS_PATH: &str = "/api/donors";
/// Path of the delete-donor intent.
pub const DELETE_DONOR_PATH: &str = "/api/donors/delete";
/// Path of the donation collection.
pub const DONATIONS_PATH: &str = "/api/donations";

/// Operations the remote store offers.
///
/// Reads return the whole collection; writes return the server's status
/// reply. Implementations do not retry.
#[async_trait::async_trait]
pub trait DonorApi: Send + Sync {
    /// Fetch every donor.
    async fn list_donors(&self) -> Result<Vec<Donor>>;

    /// Fetch every donation, with donor summaries where the server embeds them.
    async fn list_donations(&self) -> Result<Vec<Donation>>;

    /// Register a new donor.
    async fn create_donor(&self, donor: &NewDonor) -> Result<StatusReply>;

    /// Remove a donor by id.
    async fn delete_donor(&self, id: &str) -> Result<StatusReply>;

    /// Record a new donation.
    async fn create_donation(&self, donation: &NewDonation) -> Result<StatusReply>;
}

/// [`DonorApi`] over HTTP/JSON.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpApi {
    /// Build a client for the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be constructed.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        config.validate()?;
        let base_url = parse_base_url(&config.base_url)?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::ClientBuild)?;

        Ok(Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// The base URL requests are sent to, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn perform_get_request<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.as_str())
            .header(ACCEPT, APPLICATION_JSON)
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;

        Self::decode(url, response).await
    }

    async fn perform_post_request<R: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        request: &R,
    ) -> Result<T> {
        let url = self.url(path);
        let body = serde_json::to_string(request)?;
        debug!(%url, "POST");
        trace!(%body, "request body");

        let response = self
            .client
            .post(url.as_str())
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON)
            .body(body)
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;

        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(url: String, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        debug!(%url, %status, "response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http { url, status, body });
        }

        response
            .json()
            .await
            .map_err(|source| Error::Decode { url, source })
    }
}

#[async_trait::async_trait]
impl DonorApi for HttpApi {
    async fn list_donors(&self) -> Result<Vec<Donor>> {
        self.perform_get_request(DONORS_PATH).await
    }

    async fn list_donations(&self) -> Result<Vec<Donation>> {
        self.perform_get_request(DONATIONS_PATH).await
    }

    async fn create_donor(&self, donor: &NewDonor) -> Result<StatusReply> {
        self.perform_post_request(DONORS_PATH, donor).await
    }

    async fn delete_donor(&self, id: &str) -> Result<StatusReply> {
        let request = DeleteDonor { id: id.to_string() };
        self.perform_post_request(DELETE_DONOR_PATH, &request).await
    }

    async fn create_donation(&self, donation: &NewDonation) -> Result<StatusReply> {
        self.perform_post_request(DONATIONS_PATH, donation).await
    }
}
