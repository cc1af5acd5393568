use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::Notification;
use crate::messages::FeedRequest;
use crate::notifications::FeedError;

/// Client for interacting with a notification feed service.
#[derive(Clone)]
pub struct NotificationFeedClient {
    sender: mpsc::Sender<FeedRequest>,
}

impl NotificationFeedClient {
    pub fn new(sender: mpsc::Sender<FeedRequest>) -> Self {
        Self { sender }
    }

    /// Tears the feed down, closing its server-push subscription.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) {
        debug!("Sending request");
        let _ = self.sender.send(FeedRequest::Shutdown).await;
    }
}

client_method!(NotificationFeedClient => fn notifications() -> Vec<Notification> as FeedRequest::List, Error = FeedError);
client_method!(NotificationFeedClient => fn unread_count() -> usize as FeedRequest::UnreadCount, Error = FeedError);
client_method!(NotificationFeedClient => fn mark_all_read() -> usize as FeedRequest::MarkAllRead, Error = FeedError);
