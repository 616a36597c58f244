//! neato-http server
//!
//! Exposes house cleaning control of one Neato robot over HTTP.
//! The robot identity is passed via `NEATO_ROBOT_SERIALNUMBER` and
//! `NEATO_ROBOT_SECRET`.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use neato_http::{
    config::Config, house_cleaning::HouseCleaning, robot::Robot, server,
    transport::NucleoTransport,
};

#[derive(Parser, Debug)]
#[command(name = "neato-http")]
#[command(about = "HTTP facade for controlling a Neato robot")]
struct Args {
    /// Address to listen on
    #[arg(long, env = "NEATO_HTTP_LISTEN", default_value = "0.0.0.0:8080")]
    listen: SocketAddr,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    info!(
        serial = %config.robot.serial_number,
        nucleo = %config.nucleo_url,
        "Loaded configuration"
    );

    let transport =
        NucleoTransport::from_config(&config).context("Failed to build nucleo client")?;
    let cleaning = HouseCleaning::new(Robot::new(transport, config.request_id));

    server::serve(args.listen, cleaning).await
}
