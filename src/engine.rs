//! Running the local container engine

use crate::errors::{Error, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Something able to pull an image by address
#[async_trait::async_trait]
pub trait PullRunner {
    /// Pull `mirror`, returning once the pull has finished.
    async fn pull(&self, mirror: &str) -> Result<()>;
}

/// A container engine CLI found on `PATH` (`docker`, `podman`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerEngine {
    program: String,
}

impl ContainerEngine {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve the engine executable
    pub fn locate(&self) -> Result<PathBuf> {
        which::which(&self.program).map_err(|source| Error::EngineNotFound {
            engine: self.program.clone(),
            source,
        })
    }
}

#[async_trait::async_trait]
impl PullRunner for ContainerEngine {
    /// Run `<engine> pull <mirror>` with the console streams inherited.
    async fn pull(&self, mirror: &str) -> Result<()> {
        let path = self.locate()?;
        debug!("running {} pull {}", path.display(), mirror);
        let status = Command::new(&path)
            .arg("pull")
            .arg(mirror)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|err| Error::PullFailed {
                mirror: mirror.to_owned(),
                detail: err.to_string(),
            })?;
        if !status.success() {
            return Err(Error::PullFailed {
                mirror: mirror.to_owned(),
                detail: status.to_string(),
            });
        }
        info!("{} pulled {}", self.program, mirror);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_engine() {
        let engine = ContainerEngine::new("dimages-no-such-engine");
        match engine.locate().unwrap_err() {
            Error::EngineNotFound { engine, .. } => assert_eq!(engine, "dimages-no-such-engine"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_engine_fails_before_spawn() {
        let engine = ContainerEngine::new("dimages-no-such-engine");
        let err = engine.pull("mirror.example/nginx:latest").await.unwrap_err();
        assert!(matches!(err, Error::EngineNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exit_status_is_propagated() {
        // `true pull <mirror>` exits 0, `false pull <mirror>` exits 1
        ContainerEngine::new("true").pull("nginx").await.unwrap();

        let err = ContainerEngine::new("false").pull("nginx").await.unwrap_err();
        match err {
            Error::PullFailed { mirror, detail } => {
                assert_eq!(mirror, "nginx");
                assert!(detail.contains('1'), "{detail}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
