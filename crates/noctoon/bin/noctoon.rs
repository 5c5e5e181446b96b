#[macro_use]
extern crate log;

use std::net::{IpAddr, Ipv4Addr};

use clap::Parser;
use noctoon::{
    infrastructure::{config::Config, database, seed},
    presentation::{ServerBuilder, Services},
};

#[derive(Parser)]
struct Opts {
    /// Path to config file
    #[clap(long)]
    config: Option<String>,
}

/// `NOCTOON_LOG=<level>` stands in for `RUST_LOG=noctoon=<level>` unless
/// `RUST_LOG` is set.
fn init_logger() {
    let mut builder = env_logger::Builder::from_default_env();
    if std::env::var("RUST_LOG").is_err() {
        if let Ok(level) = std::env::var("NOCTOON_LOG") {
            builder.parse_filters(&format!("noctoon={level}"));
        }
    }
    builder.init();
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    init_logger();

    let opts: Opts = Opts::parse();
    let config = Config::open(opts.config)?;

    debug!("config: {:?}", config);

    let pool = database::establish_connection(&config.database_path, config.create_database).await?;

    seed::run(&pool, &config.seed).await?;

    let services = Services::new(pool.clone(), &config);

    let host = config.host.parse::<IpAddr>().unwrap_or_else(|e| {
        warn!("invalid host {:?} ({e}), listening on all interfaces", config.host);
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    });
    let port = config.port;

    let mut server_builder = ServerBuilder::new()
        .with_config(config.clone())
        .with_services(services);

    if config.enable_playground {
        server_builder = server_builder.enable_playground();
    }

    let server_fut = server_builder.build()?.serve((host, port));

    tokio::select! {
        res = server_fut => {
            if let Err(e) = res {
                error!("server error: {e}");
            }
            info!("server shutdown");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("ctrl+c signal");
        }
    }

    info!("closing database...");
    pool.close().await;

    Ok(())
}
