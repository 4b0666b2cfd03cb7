use async_trait::async_trait;
use tracing::info;
#[cfg(all(unix, not(target_os = "macos")))]
use tracing::{debug, warn};

/// Fixed identifier under which the stopwatch notification is posted; each
/// update replaces the previous one instead of stacking a new entry.
pub const NOTIFICATION_ID: u32 = 1;

/// Default notification title.
pub const NOTIFICATION_TITLE: &str = "Run is active";

/// Abstraction for the persistent stopwatch notification.
#[async_trait]
pub trait NotificationBackend: Send {
    async fn show(&mut self, text: &str);
    async fn update(&mut self, text: &str);
    async fn close(&mut self);
}

/// Fallback backend that only logs elapsed time. Used when the desktop
/// notification service is unavailable or with `--log-only`.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationBackend for LogNotifier {
    async fn show(&mut self, text: &str) {
        info!("[STOPWATCH] elapsed {}", text);
    }

    async fn update(&mut self, text: &str) {
        info!("[STOPWATCH] elapsed {}", text);
    }

    async fn close(&mut self) {}
}

#[cfg(all(unix, not(target_os = "macos")))]
#[derive(Debug)]
enum NotifierKind {
    NotifyRust,
    LogOnly,
}

#[cfg(all(unix, not(target_os = "macos")))]
#[derive(Debug)]
pub struct Notifier {
    kind: NotifierKind,
    title: String,
    handle: Option<notify_rust::NotificationHandle>,
}

#[cfg(all(unix, not(target_os = "macos")))]
impl Notifier {
    pub fn new(title: &str) -> Self {
        // Start optimistic; if we fail to show, we downgrade to LogOnly.
        let s = Self {
            kind: NotifierKind::NotifyRust,
            title: title.to_string(),
            handle: None,
        };
        debug!("Notifier created: using notify-rust backend initially");
        s
    }

    async fn post(&mut self, text: &str) {
        match self.kind {
            NotifierKind::NotifyRust => {
                debug!(text, id = NOTIFICATION_ID, "posting stopwatch notification");
                let mut n = notify_rust::Notification::new();
                let res = n
                    .appname(crate::bootstrap::CHANNEL_ID)
                    .summary(&self.title)
                    .body(&format!("Elapsed time : {text}"))
                    .id(NOTIFICATION_ID)
                    .urgency(notify_rust::Urgency::Critical)
                    .timeout(notify_rust::Timeout::Never)
                    .show_async()
                    .await;
                match res {
                    Ok(handle) => {
                        self.handle = Some(handle);
                    }
                    Err(e) => {
                        warn!(error=%e, "notify-rust failed; downgrading to LogOnly notifier");
                        self.kind = NotifierKind::LogOnly;
                        self.handle = None;
                        info!("[STOPWATCH] elapsed {}", text);
                    }
                }
            }
            NotifierKind::LogOnly => {
                info!("[STOPWATCH] elapsed {}", text);
            }
        }
    }

    async fn close_inner(&mut self) {
        match self.kind {
            NotifierKind::NotifyRust => {
                if self.handle.take().is_some() {
                    debug!("close: replacing with short-timeout notification");
                    let mut n = notify_rust::Notification::new();
                    // Replace the resident notification with a near-immediate
                    // timeout one so it disappears from the shade.
                    let _ = n
                        .appname(crate::bootstrap::CHANNEL_ID)
                        .summary(&self.title)
                        .body("Run finished.")
                        .id(NOTIFICATION_ID)
                        .urgency(notify_rust::Urgency::Low)
                        .timeout(notify_rust::Timeout::Milliseconds(1))
                        .show_async()
                        .await;
                }
            }
            NotifierKind::LogOnly => {
                // Nothing visible to remove.
            }
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
#[async_trait]
impl NotificationBackend for Notifier {
    async fn show(&mut self, text: &str) {
        self.post(text).await;
    }

    async fn update(&mut self, text: &str) {
        self.post(text).await;
    }

    async fn close(&mut self) {
        self.close_inner().await;
    }
}

/// Factory for the default backend: notify-rust with log fallback where
/// available, log-only otherwise.
pub fn default_backend(title: &str, log_only: bool) -> Box<dyn NotificationBackend + Send> {
    #[cfg(all(unix, not(target_os = "macos")))]
    {
        if log_only {
            Box::new(LogNotifier)
        } else {
            Box::new(Notifier::new(title))
        }
    }
    #[cfg(not(all(unix, not(target_os = "macos"))))]
    {
        let _ = (title, log_only);
        Box::new(LogNotifier)
    }
}
