//! Graceful shutdown signal handling.

use std::time::Duration;

use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix;
use tokio::sync::watch;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Waits for a shutdown signal (SIGTERM or SIGINT/Ctrl+C).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                error = %e,
                "Failed to install Ctrl+C handler"
            );
            std::future::pending::<()>().await;
        } else {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                "Received Ctrl+C signal, initiating graceful shutdown"
            );
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match unix::signal(unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                tracing::info!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    "Received SIGTERM signal, initiating graceful shutdown"
                );
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_SERVER_SHUTDOWN,
                    error = %e,
                    "Failed to install SIGTERM handler"
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

/// Splits a shutdown trigger into the graceful-shutdown future handed to the
/// server and a deadline that elapses `shutdown_timeout` after the trigger
/// fired.
///
/// The deadline never completes if the trigger does not fire.
pub fn with_deadline<F>(
    trigger: F,
    shutdown_timeout: Duration,
) -> (
    impl Future<Output = ()> + Send + 'static,
    impl Future<Output = ()> + Send + 'static,
)
where
    F: Future<Output = ()> + Send + 'static,
{
    let (tx, mut rx) = watch::channel(false);

    let signal = async move {
        trigger.await;
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            timeout_secs = shutdown_timeout.as_secs(),
            "Graceful shutdown initiated"
        );
        let _ = tx.send(true);
    };

    let deadline = async move {
        if rx.wait_for(|fired| *fired).await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(shutdown_timeout).await;
    };

    (signal, deadline)
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;

    #[tokio::test]
    async fn deadline_starts_after_signal() {
        let (signal, deadline) = with_deadline(async {}, Duration::from_millis(50));
        tokio::pin!(deadline);

        let early = tokio::time::timeout(Duration::from_millis(200), &mut deadline).await;
        assert!(early.is_err());

        signal.await;
        let start = Instant::now();
        let fired = tokio::time::timeout(Duration::from_secs(5), &mut deadline).await;
        assert!(fired.is_ok());
        assert!(start.elapsed() >= Duration::from_millis(40));
    }
}
