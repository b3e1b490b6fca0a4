//! Ctrl+C / termination handling.
//!
//! The first signal cancels the run's [`CancellationToken`]: no new pages,
//! posts or downloads are started and in-flight work drains. A second signal
//! exits immediately.

use tokio_util::sync::CancellationToken;

use crate::error::exit_codes;

/// Register signal listeners and return the token they cancel.
pub fn install_signal_handler() -> std::io::Result<CancellationToken> {
    let token = CancellationToken::new();

    #[cfg(unix)]
    let (mut sigterm, mut sighup) = {
        use tokio::signal::unix::{signal, SignalKind};
        (
            signal(SignalKind::terminate())?,
            signal(SignalKind::hangup())?,
        )
    };

    let handler_token = token.clone();
    tokio::spawn(async move {
        let mut received = 0u32;

        loop {
            #[cfg(unix)]
            let signalled = tokio::select! {
                r = tokio::signal::ctrl_c() => r.is_ok(),
                s = sigterm.recv() => s.is_some(),
                s = sighup.recv() => s.is_some(),
            };

            #[cfg(not(unix))]
            let signalled = tokio::signal::ctrl_c().await.is_ok();

            if !signalled {
                tracing::debug!("Signal listener closed");
                return;
            }

            received += 1;
            if received == 1 {
                tracing::warn!("Interrupt received, finishing in-flight downloads...");
                tracing::warn!("Press Ctrl+C again to exit immediately");
                handler_token.cancel();
            } else {
                tracing::warn!("Exiting without draining");
                std::process::exit(exit_codes::INTERRUPTED);
            }
        }
    });

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_installed_token_starts_live() {
        let token = install_signal_handler().unwrap();
        assert!(!token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancel_wakes_waiters() {
        let token = CancellationToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        token.cancel();
        handle.await.unwrap();
    }
}
