//! Ctrl+C handling.
//!
//! The first Ctrl+C sets a flag the orchestrator checks between items, so
//! the item in flight finishes and is recorded. A second one force-exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::exit_codes;

/// Spawn the Ctrl+C listener and return the flag it sets.
pub fn install_interrupt_handler() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));

    let handler_flag = flag.clone();
    tokio::spawn(async move {
        let mut received = 0u32;
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Could not listen for Ctrl+C: {}", e);
                return;
            }

            received += 1;
            if received == 1 {
                tracing::info!("Received interrupt, finishing the current item...");
                tracing::info!("Press Ctrl+C again to force exit");
                handler_flag.store(true, Ordering::SeqCst);
            } else {
                tracing::warn!("Force exit requested");
                std::process::exit(exit_codes::INTERRUPTED);
            }
        }
    });

    flag
}
