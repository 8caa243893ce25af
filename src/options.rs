//! Options for connecting to the mirror index and running the engine

/// The public mirror index queried by default.
pub static DEFAULT_ENDPOINT: &str = "https://docker.aityp.com/api/v1/image";

/// Container engine used when none is given.
pub static DEFAULT_ENGINE: &str = "docker";

/// Upper bound of a search response body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Settings for one invocation
///
/// The search term is appended to `endpoint` as `?search=<term>`, so the
/// endpoint must not carry a query of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub endpoint: String,
    pub engine: String,
    pub max_body_bytes: usize,
    pub user_agent: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            engine: DEFAULT_ENGINE.to_owned(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            user_agent: concat!("dimages/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn endpoint<S: Into<String>>(&mut self, endpoint: S) -> &mut Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn engine<S: Into<String>>(&mut self, engine: S) -> &mut Self {
        self.engine = engine.into();
        self
    }

    pub fn max_body_bytes(&mut self, limit: usize) -> &mut Self {
        self.max_body_bytes = limit;
        self
    }
}

/// Query string for a search term
pub(crate) fn search_query(term: &str) -> String {
    let mut param = url::form_urlencoded::Serializer::new(String::new());
    param.append_pair("search", term);
    format!("?{}", param.finish())
}
