//! Search a public container image mirror index and pull a chosen mirror

pub mod cli;
pub mod engine;
pub mod errors;
mod http_client;
mod hyper_client;
pub mod image;
pub mod mirror;
mod options;
pub mod pull;
pub mod select;

pub use engine::{ContainerEngine, PullRunner};
pub use http_client::{HaveHttpClient, HttpClient};
pub use hyper_client::HyperClient;
pub use image::{filter_images, FilterCriteria, ImageRecord, SearchResult};
pub use mirror::MirrorIndex;
pub use options::*;
pub use pull::{pull_image, PullRequest};
pub use select::{select_image, LineSource};
