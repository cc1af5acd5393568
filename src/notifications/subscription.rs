use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use super::SseDecoder;
use crate::api::{ApiError, ByteStream, StoreApi};
use crate::domain::Notification;

/// Name of the server-sent event that carries a notification payload.
pub const NOTIFICATION_EVENT: &str = "notification";

/// What the subscription does after the stream ends or fails to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconnectPolicy {
    #[default]
    Never,
    Fixed { delay: Duration, max_attempts: u32 },
}

/// A live server-push subscription for one user.
///
/// Decoded notifications are forwarded to the sink passed to [`open`]. The
/// underlying connection is torn down on [`close`] or when the subscription
/// is dropped.
///
/// [`open`]: NotificationSubscription::open
/// [`close`]: NotificationSubscription::close
pub struct NotificationSubscription {
    user_id: String,
    handle: JoinHandle<()>,
}

impl NotificationSubscription {
    pub fn open(
        api: Arc<dyn StoreApi>,
        user_id: impl Into<String>,
        policy: ReconnectPolicy,
        sink: mpsc::Sender<Notification>,
    ) -> Self {
        let user_id = user_id.into();
        let span = info_span!("notification_subscription", user_id = %user_id);
        let handle = tokio::spawn(pump(api, user_id.clone(), policy, sink).instrument(span));
        Self { user_id, handle }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn is_open(&self) -> bool {
        !self.handle.is_finished()
    }

    pub fn close(self) {
        info!(user_id = %self.user_id, "Closing notification subscription");
    }
}

impl Drop for NotificationSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

enum StreamEnd {
    Closed,
    Failed(ApiError),
    SinkGone,
}

async fn pump(api: Arc<dyn StoreApi>, user_id: String, policy: ReconnectPolicy, sink: mpsc::Sender<Notification>) {
    let mut attempts = 0u32;
    loop {
        match api.open_notification_stream(user_id.clone()).await {
            Ok(stream) => {
                info!("Notification stream open");
                attempts = 0;
                match forward(stream, &sink).await {
                    StreamEnd::SinkGone => {
                        debug!("Feed gone, stopping subscription");
                        return;
                    }
                    StreamEnd::Closed => info!("Notification stream closed by server"),
                    StreamEnd::Failed(e) => warn!(error = %e, "Notification stream failed"),
                }
            }
            Err(e) => warn!(error = %e, "Could not open notification stream"),
        }

        match policy {
            ReconnectPolicy::Never => return,
            ReconnectPolicy::Fixed { delay, max_attempts } => {
                attempts += 1;
                if attempts > max_attempts {
                    warn!(attempts = max_attempts, "Giving up on notification stream");
                    return;
                }
                info!(attempt = attempts, delay_ms = delay.as_millis() as u64, "Reconnecting notification stream");
                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn forward(mut stream: ByteStream, sink: &mpsc::Sender<Notification>) -> StreamEnd {
    let mut decoder = SseDecoder::new();
    while let Some(chunk) = stream.next().await {
        let bytes = match chunk {
            Ok(bytes) => bytes,
            Err(e) => return StreamEnd::Failed(e),
        };
        for event in decoder.feed(&bytes) {
            if event.event != NOTIFICATION_EVENT {
                debug!(event = %event.event, "Ignoring event");
                continue;
            }
            match serde_json::from_str::<Notification>(&event.data) {
                Ok(notification) => {
                    debug!(notification_id = %notification.id, "Notification pushed");
                    if sink.send(notification).await.is_err() {
                        return StreamEnd::SinkGone;
                    }
                }
                Err(e) => warn!(error = %e, "Dropping malformed notification"),
            }
        }
    }
    StreamEnd::Closed
}
