use std::sync::Arc;
use tracing::{debug, instrument};

use crate::apis::{decode_payload, SeriesEndpoint};
use crate::app::ports::HttpClientPort;
use crate::error::{Result, SeriesError};
use crate::types::RawPayload;

/// Fetches one series payload and decodes it according to the endpoint format.
///
/// A single attempt per call; failures surface as [`SeriesError::Fetch`] with
/// the series key attached.
#[derive(Clone)]
pub struct FetchUseCase {
    http: Arc<dyn HttpClientPort>,
}

impl FetchUseCase {
    pub fn new(http: Arc<dyn HttpClientPort>) -> Self {
        Self { http }
    }

    #[instrument(skip(self, endpoint), fields(key = %endpoint.key))]
    pub async fn fetch(&self, endpoint: &SeriesEndpoint) -> Result<RawPayload> {
        let key = endpoint.key;
        let resp = self
            .http
            .get(&endpoint.url)
            .await
            .map_err(|message| SeriesError::Fetch { key, message })?;

        if !resp.is_success() {
            return Err(SeriesError::Fetch {
                key,
                message: format!("HTTP {} from {}", resp.status, endpoint.url),
            });
        }
        debug!(
            "Fetched {} bytes ({}) from {}",
            resp.bytes.len(),
            resp.content_type,
            endpoint.url
        );

        decode_payload(key, endpoint.format, &resp.bytes)
    }
}
