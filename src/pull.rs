//! Search, filter, select, pull

use crate::engine::PullRunner;
use crate::errors::{Error, Result};
use crate::http_client::HttpClient;
use crate::image::{filter_images, FilterCriteria, ImageRecord};
use crate::mirror::MirrorIndex;
use crate::select::{select_image, LineSource};
use log::{debug, info};
use std::io::Write;

/// Everything one `pull` invocation asks for
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PullRequest {
    pub image: String,
    pub criteria: FilterCriteria,
    pub interactive: bool,
}

impl PullRequest {
    pub fn new<S: Into<String>>(image: S) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }
}

/// Run one invocation to completion, stopping at the first failing stage.
///
/// Returns the record whose mirror was pulled.
pub async fn pull_image<C, L, W, R>(
    index: &MirrorIndex<C>,
    request: &PullRequest,
    input: &mut L,
    out: &mut W,
    runner: &R,
) -> Result<ImageRecord>
where
    C: HttpClient<Err = Error> + Sync,
    L: LineSource + ?Sized,
    W: Write,
    R: PullRunner + ?Sized,
{
    let records = index.search_images(&request.image).await?;
    if records.is_empty() {
        return Err(Error::EmptyResult {
            term: request.image.clone(),
        });
    }

    let filtered = filter_images(records, &request.criteria);
    debug!("{} images left after filtering", filtered.len());
    if filtered.is_empty() {
        return Err(Error::EmptyFilteredResult);
    }

    let selected = select_image(filtered, request.interactive, input, out)?;
    info!("selected {}", selected);

    writeln!(out, "Pulling image: {}", selected.mirror)?;
    out.flush()?;
    runner.pull(&selected.mirror).await?;
    writeln!(out, "Successfully pulled image: {}", selected.mirror)?;
    Ok(selected)
}
