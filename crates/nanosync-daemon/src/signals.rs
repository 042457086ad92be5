//! Signal handling for graceful shutdown.

use anyhow::{Context, Result};
use nanosync_core::ShutdownHandle;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tracing::{info, warn};

/// What to do on the `received`-th shutdown signal, counting from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalResponse {
    /// Ask the coordinator to stop after its current drain.
    Shutdown,
    /// Shutdown is already pending; exit without waiting for it.
    Exit,
}

fn response_to(received: usize) -> SignalResponse {
    if received <= 1 { SignalResponse::Shutdown } else { SignalResponse::Exit }
}

fn signal_name(signal: i32) -> &'static str {
    if signal == SIGTERM { "SIGTERM" } else { "SIGINT" }
}

/// Set up signal handlers for graceful shutdown.
///
/// The first SIGTERM or SIGINT requests shutdown through `shutdown`. A
/// second one exits the process immediately.
pub fn setup_signal_handlers(shutdown: ShutdownHandle) -> Result<()> {
    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Failed to register signal handlers")?;

    std::thread::Builder::new()
        .name("signals".to_string())
        .spawn(move || {
            for (seen, signal) in signals.forever().enumerate() {
                let name = signal_name(signal);
                match response_to(seen + 1) {
                    SignalResponse::Shutdown => {
                        info!(signal = name, "Received shutdown signal");
                        shutdown.request();
                    }
                    SignalResponse::Exit => {
                        warn!(signal = name, "Received second signal, exiting immediately");
                        std::process::exit(128 + signal);
                    }
                }
            }
        })
        .context("Failed to spawn signal thread")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_signal_requests_shutdown() {
        assert_eq!(response_to(1), SignalResponse::Shutdown);
    }

    #[test]
    fn test_repeated_signal_exits() {
        assert_eq!(response_to(2), SignalResponse::Exit);
        assert_eq!(response_to(5), SignalResponse::Exit);
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(signal_name(SIGTERM), "SIGTERM");
        assert_eq!(signal_name(SIGINT), "SIGINT");
    }
}
