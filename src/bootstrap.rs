//! One-time notification subsystem bootstrap, run at process start before the
//! stopwatch service is created.

/// Channel identifier carried on every stopwatch notification.
pub const CHANNEL_ID: &str = "running_channel";

/// Human-readable channel name.
pub const CHANNEL_NAME: &str = "Running Notification";

/// Ensures the notification channel is usable by probing the desktop
/// notification service. Registration with the daemon is implicit and
/// idempotent; a failed probe is logged and otherwise ignored, in which case
/// the notifier falls back to log-only on first use.
pub async fn ensure_channel() {
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        match tokio::task::spawn_blocking(notify_rust::get_server_information).await {
            Ok(Ok(srv)) => {
                tracing::info!(
                    server = %srv.name,
                    version = %srv.version,
                    channel = CHANNEL_ID,
                    name = CHANNEL_NAME,
                    "notification channel ready"
                );
            }
            Ok(Err(e)) => {
                tracing::warn!(error=%e, "notification service probe failed; notifications may be degraded");
            }
            Err(e) => {
                tracing::warn!(error=%e, "notification probe task failed");
            }
        }
    }
    #[cfg(not(all(unix, not(target_os = "macos"))))]
    {
        tracing::debug!(
            channel = CHANNEL_ID,
            "no channel registration needed on this platform"
        );
    }
}
