//! ship-server: HTTP front end and maintenance runner for the coverage service.
//!
//! Usage:
//!   ship-server [serve] [--config service.json] [--db ucship.db]
//!   ship-server migrate --db ucship.db
//!   ship-server import seed.json --db ucship.db

use anyhow::{bail, Result};
use shipsmart_core::{
    api::api_router,
    config::ServiceConfig,
    import::{import_seed, SeedDocument},
    service::CoverageService,
};
use std::env;

enum Command {
    Serve,
    Migrate,
    Import { path: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = parse_command(&args)?;

    let mut config = ServiceConfig::load(flag_value(&args, "--config"))?;
    if let Some(db) = flag_value(&args, "--db") {
        config.db_path = db.to_string();
    }

    let service = CoverageService::new(config);
    service.migrate()?;

    match command {
        Command::Migrate => {
            println!("migrated {}", service.config().db_path);
        }
        Command::Import { path } => {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
            let doc = SeedDocument::from_json(&content)?;
            let store = service.open_store()?;
            let counts = import_seed(&store, &doc)?;
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
        Command::Serve => serve(service).await?,
    }

    Ok(())
}

async fn serve(service: CoverageService) -> Result<()> {
    let addr = service.config().bind_addr.clone();
    log::info!(
        "serving {} on {addr} (active plan year {})",
        service.config().db_path,
        service.config().active_plan_year
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, api_router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("cannot listen for ctrl-c: {e}");
    }
}

fn parse_command(args: &[String]) -> Result<Command> {
    let positional: Vec<&str> = positional_args(args);
    match positional.as_slice() {
        [] | ["serve"] => Ok(Command::Serve),
        ["migrate"] => Ok(Command::Migrate),
        ["import", path] => Ok(Command::Import {
            path: path.to_string(),
        }),
        ["import"] => bail!("import needs a seed file: ship-server import <file.json>"),
        other => bail!("unknown command: {}", other.join(" ")),
    }
}

/// Arguments that are neither a `--flag` nor the value following one.
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            iter.next();
        } else {
            out.push(arg.as_str());
        }
    }
    out
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
