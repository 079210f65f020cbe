//! `callbridge-dial`: place a single outbound call from the command line.

use callbridge_server::cli::{parse_phone_number, run_dial};
use callbridge_server::{config, init_tracing};
use callbridge_voice::{CallInitiator, LiveKitControlPlane};
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "callbridge-dial", about = "Make outbound calls with LiveKit")]
struct Args {
    /// Phone number to call (format: +1XXXXXXXXXX)
    phone_number: String,

    /// Don't wait for the call to be answered
    #[arg(long)]
    no_wait: bool,

    /// Path to the TOML configuration file
    #[arg(long, env = "CALLBRIDGE_CONFIG_PATH", default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let phone_number = match parse_phone_number(&args.phone_number) {
        Ok(number) => number,
        Err(code) => return code,
    };

    let config = match config::load_config(Some(&args.config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.logging);

    if let Err(e) = config.validate() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let control_plane = Arc::new(LiveKitControlPlane::new(config.livekit.clone()));
    let initiator = CallInitiator::new(control_plane, config.telephony.clone());

    run_dial(&initiator, &phone_number, !args.no_wait).await
}
