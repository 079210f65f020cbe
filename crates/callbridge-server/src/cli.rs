//! Shared logic for the `callbridge-dial` command.

use callbridge_types::PhoneNumber;
use callbridge_voice::{CallInitiator, DialOutcome};
use std::process::ExitCode;

/// Parses the command-line number, printing the error on failure.
///
/// Runs before configuration is loaded, so an invalid number never reaches
/// LiveKit.
pub fn parse_phone_number(raw: &str) -> Result<PhoneNumber, ExitCode> {
    PhoneNumber::parse(raw).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    })
}

/// Places one call, printing the outcome.
///
/// Returns a failing exit code for a rejected dial or a control-plane error.
pub async fn run_dial(
    initiator: &CallInitiator,
    phone_number: &PhoneNumber,
    wait_for_answer: bool,
) -> ExitCode {
    println!("Initiating call to {}...", phone_number);

    match initiator.place_call(phone_number, wait_for_answer).await {
        Ok(DialOutcome::Connected { room_name, .. }) => {
            println!("Call initiated successfully in room {}", room_name);
            ExitCode::SUCCESS
        }
        Ok(DialOutcome::Failed { reason }) => {
            eprintln!("Call failed: {}", reason);
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "dial failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
