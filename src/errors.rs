use std::error::Error as StdError;
use std::io;

use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(io::Error),
    #[error("http request failed: {0}")]
    Hyper(hyper::Error),
    #[error("connection refused: {0}")]
    ConnectionRefused(Box<dyn StdError + Send + Sync>),
    #[error("connection reset: {0}")]
    ConnectionReset(Box<dyn StdError + Send + Sync>),
    #[error("http error: {0}")]
    Http(#[from] http::Error),
    #[error("invalid uri: {}", var)]
    InvalidUri {
        var: String,
        source: http::uri::InvalidUri,
    },
    #[error("unsupported scheme: {}", endpoint)]
    UnsupportedScheme { endpoint: String },

    #[error("search term must not be empty")]
    EmptySearchTerm,
    #[error("index returned unexpected status code: {}", status)]
    UnexpectedStatus { status: StatusCode },
    #[error("failed to decode index response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("index response exceeds {} bytes", limit)]
    BodyTooLarge { limit: usize },
    #[error("index reported an error")]
    Remote,

    #[error("no image found: {}", term)]
    EmptyResult { term: String },
    #[error("no image matches the given platform/tag")]
    EmptyFilteredResult,
    #[error("invalid selection: {:?}", input)]
    InvalidSelection { input: String },

    #[error("container engine `{}` not found", engine)]
    EngineNotFound {
        engine: String,
        source: which::Error,
    },
    #[error("failed to pull {}: {}", mirror, detail)]
    PullFailed { mirror: String, detail: String },

    #[error("{0}")]
    Usage(String),
}

impl Error {
    /// Transport level failure while talking to the index
    ///
    /// `Io` is left out: it also carries console read and write failures.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Error::Hyper(_)
                | Error::ConnectionRefused(_)
                | Error::ConnectionReset(_)
                | Error::Http(_)
                | Error::InvalidUri { .. }
                | Error::UnsupportedScheme { .. }
        )
    }
}

impl From<hyper::Error> for Error {
    fn from(err: hyper::Error) -> Self {
        if err.is_connect() {
            return match err
                .source()
                .and_then(|e| e.downcast_ref::<io::Error>())
                .map(|e| e.kind())
            {
                Some(io::ErrorKind::ConnectionRefused) => Error::ConnectionRefused(Box::new(err)),
                Some(io::ErrorKind::ConnectionReset) => Error::ConnectionReset(Box::new(err)),
                _ => Error::Hyper(err),
            };
        }
        Error::Hyper(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Error::ConnectionRefused(Box::new(err)),
            io::ErrorKind::ConnectionReset => Error::ConnectionReset(Box::new(err)),
            _ => Error::Io(err),
        }
    }
}
