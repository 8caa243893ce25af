//! Command line interface of the `dimages` binary

use crate::image::FilterCriteria;
use crate::options::{IndexConfig, DEFAULT_ENDPOINT, DEFAULT_ENGINE};
use crate::pull::PullRequest;
use clap::error::ErrorKind;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::ffi::OsString;

const EXAMPLES: &str = "\
Examples:
  dimages pull nginx                          pull an nginx mirror
  dimages pull -platform linux/arm64 nginx    pull the linux/arm64 nginx mirror
  dimages pull -tag latest nginx              pull nginx:latest
  dimages pull -i nginx                       choose among all nginx mirrors

Mirrors are looked up on https://docker.aityp.com/";

/// Long flags that may also be written with a single dash, as in `-platform linux/arm64`.
const LONG_FLAGS: &[&str] = &[
    "platform",
    "tag",
    "endpoint",
    "engine",
    "interactive",
    "verbose",
    "help",
    "version",
];

#[derive(Parser, Debug)]
#[command(name = "dimages", version)]
#[command(about = "Pull container images through a public mirror index", long_about = None)]
#[command(arg_required_else_help = true, after_help = EXAMPLES)]
pub struct Cli {
    /// Log more (-v: info, -vv: debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the mirror index and pull a matching image
    #[command(after_help = EXAMPLES)]
    Pull(PullArgs),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PullArgs {
    /// Image name to search for (e.g. "nginx")
    pub image: String,

    /// Only consider this platform (e.g. linux/amd64, linux/arm64)
    #[arg(long)]
    pub platform: Option<String>,

    /// Only consider this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Always choose from a numbered list, even for a single match
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Mirror index search endpoint
    #[arg(long, value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Container engine used to pull
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_ENGINE)]
    pub engine: String,
}

impl PullArgs {
    pub fn config(&self) -> IndexConfig {
        let mut config = IndexConfig::new();
        config.endpoint(self.endpoint.as_str()).engine(self.engine.as_str());
        config
    }

    pub fn request(&self) -> PullRequest {
        PullRequest {
            image: self.image.clone(),
            criteria: FilterCriteria {
                platform: self.platform.clone(),
                tag: self.tag.clone(),
            },
            interactive: self.interactive,
        }
    }
}

/// Rewrite `-platform`, `-tag=x` and friends to their `--` form.
///
/// Everything after a bare `--` is passed through untouched.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(i, arg)| {
            if i == 0 || passthrough {
                return arg;
            }
            let Some(text) = arg.to_str() else {
                return arg;
            };
            if text == "--" {
                passthrough = true;
                return arg;
            }
            match text.strip_prefix('-') {
                Some(rest) if !rest.starts_with('-') => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if LONG_FLAGS.contains(&name) {
                        OsString::from(format!("--{rest}"))
                    } else {
                        arg
                    }
                }
                _ => arg,
            }
        })
        .collect()
}

pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    Cli::try_parse_from(normalize_args(args))
}

/// Process exit code for a command line that did not parse
///
/// Explicit help and version requests succeed; every other problem is a usage error.
pub fn exit_code(err: &clap::Error) -> u8 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pull_args(args: &[&str]) -> PullArgs {
        let cli = parse_args(args.iter().copied()).unwrap();
        match cli.command {
            Command::Pull(args) => args,
        }
    }

    fn parse_err(args: &[&str]) -> clap::Error {
        parse_args(args.iter().copied()).unwrap_err()
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn single_dash_long_flags() {
        let normalized = normalize_args([
            "dimages",
            "pull",
            "-platform",
            "linux/arm64",
            "-tag=latest",
            "-i",
            "-v",
            "--engine",
            "podman",
            "nginx",
        ]);
        assert_eq!(
            normalized,
            [
                "dimages",
                "pull",
                "--platform",
                "linux/arm64",
                "--tag=latest",
                "-i",
                "-v",
                "--engine",
                "podman",
                "nginx"
            ]
            .map(OsString::from)
        );
        assert_eq!(
            normalize_args(["dimages", "pull", "--", "-tag"]),
            ["dimages", "pull", "--", "-tag"].map(OsString::from)
        );
    }

    #[test]
    fn pull_with_filters() {
        let args = pull_args(&["dimages", "pull", "-platform", "linux/arm64", "-tag", "1.25", "nginx"]);
        assert_eq!(args.image, "nginx");
        let request = args.request();
        assert_eq!(request.image, "nginx");
        assert_eq!(request.criteria.platform.as_deref(), Some("linux/arm64"));
        assert_eq!(request.criteria.tag.as_deref(), Some("1.25"));
        assert!(!request.interactive);

        let config = args.config();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.engine, DEFAULT_ENGINE);
    }

    #[test]
    fn interactive_and_overrides() {
        let args = pull_args(&[
            "dimages",
            "pull",
            "-i",
            "-engine",
            "podman",
            "-endpoint=http://localhost:8080/api/v1/image",
            "redis",
        ]);
        assert!(args.interactive);
        let config = args.config();
        assert_eq!(config.engine, "podman");
        assert_eq!(config.endpoint, "http://localhost:8080/api/v1/image");
    }

    #[test]
    fn help_exits_zero() {
        for args in [
            &["dimages", "help"][..],
            &["dimages", "-h"],
            &["dimages", "--help"],
            &["dimages", "pull", "-help"],
            &["dimages", "--version"],
        ] {
            assert_eq!(exit_code(&parse_err(args)), 0, "{args:?}");
        }
    }

    #[test]
    fn usage_errors_exit_one() {
        for args in [
            &["dimages"][..],
            &["dimages", "push", "nginx"],
            &["dimages", "pull"],
            &["dimages", "pull", "-platform"],
            &["dimages", "pull", "-unknown", "nginx"],
        ] {
            assert_eq!(exit_code(&parse_err(args)), 1, "{args:?}");
        }
    }
}
