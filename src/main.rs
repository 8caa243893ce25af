use std::io;
use std::process::ExitCode;

use env_logger::Env;
use log::debug;

use dimages::cli::{self, Cli, Command};
use dimages::engine::ContainerEngine;
use dimages::errors::Result;
use dimages::mirror::MirrorIndex;
use dimages::pull::pull_image;

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Pull(args) => {
            let config = args.config();
            debug!("{:?}", config);
            let index = MirrorIndex::connect(&config)?;
            let engine = ContainerEngine::new(config.engine.as_str());
            let mut input = io::stdin().lock();
            let mut out = io::stdout();
            pull_image(&index, &args.request(), &mut input, &mut out, &engine).await?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(cli::exit_code(&err));
        }
    };

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
