use notecurl_core::error::UsageError;
use notecurl_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible; stderr if the state dir is unusable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable: {:#}", err);
    }

    // Parse CLI and dispatch.
    if let Err(err) = Cli::run_from_args() {
        if let Some(usage) = err.downcast_ref::<UsageError>() {
            eprintln!("Error: {}", usage);
            std::process::exit(2);
        }
        eprintln!("notecurl error: {:#}", err);
        std::process::exit(1);
    }
}
