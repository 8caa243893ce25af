use crate::errors::{Error, Result};
use crate::http_client::{HaveHttpClient, HttpClient};
use crate::hyper_client::HyperClient;
use crate::image::{ImageRecord, SearchResult};
use crate::options::{search_query, IndexConfig};
use http::header::{HeaderValue, ACCEPT, USER_AGENT};
use http::{HeaderMap, Response};
use log::*;

/// Handle to the mirror index service
#[derive(Debug)]
pub struct MirrorIndex<C = HyperClient> {
    /// http client
    client: C,
    /// http headers used for any requests
    headers: HeaderMap,
}

/// Decode a search response
///
/// A response flagged with `"error": true` is rejected whatever it lists.
pub(crate) fn api_result(res: Response<Vec<u8>>) -> Result<Vec<ImageRecord>> {
    if !res.status().is_success() {
        return Err(Error::UnexpectedStatus {
            status: res.status(),
        });
    }
    let result: SearchResult = serde_json::from_slice(res.body())?;
    if result.error {
        return Err(Error::Remote);
    }
    if usize::try_from(result.count).ok() != Some(result.results.len()) {
        warn!(
            "index declared {} images but sent {}",
            result.count,
            result.results.len()
        );
    }
    Ok(result.results)
}

impl MirrorIndex<HyperClient> {
    pub fn connect(config: &IndexConfig) -> Result<Self> {
        let client = HyperClient::connect(config)?;
        debug!("using mirror index at {}", client.base());
        let mut index = Self::with_client(client);
        if let Ok(agent) = HeaderValue::from_str(&config.user_agent) {
            index.headers.insert(USER_AGENT, agent);
        }
        Ok(index)
    }
}

impl<C> MirrorIndex<C>
where
    C: HttpClient<Err = Error> + Sync,
{
    pub fn with_client(client: C) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Self { client, headers }
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Search mirrors whose name contains `term`
    ///
    /// # API
    /// GET {endpoint}?search={term}
    pub async fn search_images(&self, term: &str) -> Result<Vec<ImageRecord>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(Error::EmptySearchTerm);
        }
        let res = self
            .http_client()
            .get(self.headers(), &search_query(term))
            .await?;
        let records = api_result(res)?;
        debug!("index returned {} images for {:?}", records.len(), term);
        Ok(records)
    }
}

impl<C: HttpClient> HaveHttpClient for MirrorIndex<C> {
    type Client = C;
    fn http_client(&self) -> &Self::Client {
        &self.client
    }
}
