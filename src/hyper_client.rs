use crate::errors::{Error, Result};
use crate::http_client::HttpClient;
use crate::options::IndexConfig;
use http::header::LOCATION;
use http::{HeaderMap, Request, Response};
use hyper::body::HttpBody;
use hyper::Uri;
use log::{debug, warn};
use std::str::FromStr;

const MAX_REDIRECTS: usize = 10;

#[allow(clippy::enum_variant_names)]
#[derive(Clone, Debug)]
enum Client {
    HttpClient(hyper::Client<hyper::client::HttpConnector>),
    #[cfg(feature = "ssl-rustls")]
    HttpsClient(hyper::Client<hyper_rustls::HttpsConnector<hyper::client::HttpConnector>>),
    #[cfg(all(feature = "ssl", not(feature = "ssl-rustls")))]
    HttpsClient(hyper::Client<hyper_tls::HttpsConnector<hyper::client::HttpConnector>>),
}

impl Client {
    fn request(&self, req: Request<hyper::Body>) -> hyper::client::ResponseFuture {
        match self {
            Client::HttpClient(http_client) => http_client.request(req),
            #[cfg(any(feature = "ssl-rustls", feature = "ssl"))]
            Client::HttpsClient(https_client) => https_client.request(req),
        }
    }
}

/// Http client using hyper
#[derive(Debug, Clone)]
pub struct HyperClient {
    /// http client
    client: Client,
    /// base address every request path is appended to
    base: Uri,
    /// maximum accepted response body
    max_body_bytes: usize,
}

fn join_uri(uri: &Uri, path: &str) -> Result<Uri> {
    let joined = format!("{uri}{path}");
    Uri::from_str(&joined).map_err(|err| Error::InvalidUri {
        var: joined,
        source: err,
    })
}

/// Resolve a `Location` header against the uri that produced it.
fn resolve_location(base: &Uri, location: &str) -> Result<Uri> {
    let target = Uri::from_str(location).map_err(|err| Error::InvalidUri {
        var: location.to_owned(),
        source: err,
    })?;
    let mut parts = http::uri::Parts::from(target);
    let base_parts = http::uri::Parts::from(base.clone());
    if parts.scheme.is_none() {
        parts.scheme = base_parts.scheme;
    }
    if parts.authority.is_none() {
        parts.authority = base_parts.authority;
    }
    Uri::from_parts(parts).map_err(|err| Error::Http(err.into()))
}

fn request_builder(
    method: &http::Method,
    uri: &Uri,
    headers: &HeaderMap,
) -> http::request::Builder {
    let mut request = Request::builder().method(method).uri(uri);
    for (name, value) in headers.iter() {
        request = request.header(name, value);
    }
    request
}

async fn get_with_redirect(
    client: &Client,
    uri: Uri,
    headers: &HeaderMap,
) -> Result<Response<hyper::Body>> {
    let mut uri = uri;
    let mut redirects = 0;
    loop {
        let request =
            request_builder(&http::Method::GET, &uri, headers).body(hyper::Body::empty())?;
        let resp = client.request(request).await?;
        if !resp.status().is_redirection() {
            return Ok(resp);
        }
        if redirects == MAX_REDIRECTS {
            warn!("giving up on {} after {} redirects", uri, MAX_REDIRECTS);
            return Ok(resp);
        }
        let location = resp
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let Some(location) = location else {
            return Ok(resp);
        };
        let next = resolve_location(&uri, &location)?;
        debug!("redirect {} -> {}", uri, next);
        uri = next;
        redirects += 1;
    }
}

async fn fetch_body(resp: Response<hyper::Body>, limit: usize) -> Result<Response<Vec<u8>>> {
    let (parts, mut body) = resp.into_parts();
    let mut buf = Vec::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk?;
        if buf.len() + chunk.len() > limit {
            return Err(Error::BodyTooLarge { limit });
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(Response::from_parts(parts, buf))
}

impl HyperClient {
    fn new(client: Client, base: Uri, max_body_bytes: usize) -> Self {
        Self {
            client,
            base,
            max_body_bytes,
        }
    }

    /// Build a client for `config.endpoint`, picking a connector by scheme.
    pub fn connect(config: &IndexConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim_end_matches('/');
        let base = Uri::from_str(endpoint).map_err(|err| Error::InvalidUri {
            var: endpoint.to_owned(),
            source: err,
        })?;
        if base.query().is_some() {
            return Err(Error::Usage(format!(
                "endpoint must not contain a query: {endpoint}"
            )));
        }
        match base.scheme_str() {
            Some("http") => Ok(Self::connect_with_http(base, config.max_body_bytes)),
            Some("https") => Self::connect_with_ssl(base, config.max_body_bytes),
            _ => Err(Error::UnsupportedScheme {
                endpoint: endpoint.to_owned(),
            }),
        }
    }

    fn connect_with_http(base: Uri, max_body_bytes: usize) -> Self {
        Self::new(Client::HttpClient(hyper::Client::new()), base, max_body_bytes)
    }

    #[cfg(feature = "ssl-rustls")]
    fn connect_with_ssl(base: Uri, max_body_bytes: usize) -> Result<Self> {
        let https = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_or_http()
            .enable_http1()
            .build();
        let client = hyper::Client::builder().build::<_, hyper::Body>(https);
        Ok(Self::new(Client::HttpsClient(client), base, max_body_bytes))
    }

    #[cfg(all(feature = "ssl", not(feature = "ssl-rustls")))]
    fn connect_with_ssl(base: Uri, max_body_bytes: usize) -> Result<Self> {
        let https = hyper_tls::HttpsConnector::new();
        let client = hyper::Client::builder().build::<_, hyper::Body>(https);
        Ok(Self::new(Client::HttpsClient(client), base, max_body_bytes))
    }

    #[cfg(not(any(feature = "ssl", feature = "ssl-rustls")))]
    fn connect_with_ssl(base: Uri, _max_body_bytes: usize) -> Result<Self> {
        Err(Error::UnsupportedScheme {
            endpoint: base.to_string(),
        })
    }

    pub fn base(&self) -> &Uri {
        &self.base
    }
}

#[async_trait::async_trait]
impl HttpClient for HyperClient {
    type Err = Error;

    async fn get(&self, headers: &HeaderMap, path: &str) -> Result<Response<Vec<u8>>> {
        let url = join_uri(&self.base, path)?;
        debug!("GET {}", url);
        let res = get_with_redirect(&self.client, url, headers).await?;
        fetch_body(res, self.max_body_bytes).await
    }
}
