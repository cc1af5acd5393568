use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn, Instrument};

use crate::api::StoreApi;
use crate::clients::NotificationFeedClient;
use crate::domain::Notification;
use crate::messages::FeedRequest;
use crate::notifications::{NotificationSubscription, ReconnectPolicy};

/// Holds one user's notifications: the fetched backlog plus everything pushed
/// since, newest first.
pub struct NotificationFeedService {
    receiver: mpsc::Receiver<FeedRequest>,
    api: Arc<dyn StoreApi>,
    user_id: String,
    policy: ReconnectPolicy,
    buffer_size: usize,
    notifications: Vec<Notification>,
    /// Remote mark-read calls still in flight; drained before the service stops.
    pending: JoinSet<()>,
}

impl NotificationFeedService {
    pub fn new(
        buffer_size: usize,
        api: Arc<dyn StoreApi>,
        user_id: impl Into<String>,
        policy: ReconnectPolicy,
    ) -> (Self, NotificationFeedClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            api,
            user_id: user_id.into(),
            policy,
            buffer_size,
            notifications: Vec::new(),
            pending: JoinSet::new(),
        };
        (service, NotificationFeedClient::new(sender))
    }

    #[instrument(name = "notification_feed", skip(self), fields(user_id = %self.user_id))]
    pub async fn run(mut self) {
        info!("NotificationFeedService starting");
        self.load_backlog().await;

        let (sink, mut pushed) = mpsc::channel(self.buffer_size);
        let subscription = NotificationSubscription::open(self.api.clone(), self.user_id.clone(), self.policy, sink);
        let mut live = true;

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(FeedRequest::List { respond_to }) => {
                        let _ = respond_to.send(Ok(self.notifications.clone()));
                    }
                    Some(FeedRequest::UnreadCount { respond_to }) => {
                        let _ = respond_to.send(Ok(self.unread_count()));
                    }
                    Some(FeedRequest::MarkAllRead { respond_to }) => {
                        let _ = respond_to.send(Ok(self.handle_mark_all_read()));
                    }
                    Some(FeedRequest::Shutdown) | None => {
                        info!("NotificationFeedService shutting down");
                        break;
                    }
                },
                notification = pushed.recv(), if live => match notification {
                    Some(notification) => self.handle_pushed(notification),
                    None => {
                        info!("Notification subscription ended");
                        live = false;
                    }
                },
                Some(done) = self.pending.join_next(), if !self.pending.is_empty() => {
                    if let Err(e) = done {
                        warn!(error = %e, "Mark-read task failed");
                    }
                }
            }
        }

        subscription.close();
        if !self.pending.is_empty() {
            debug!(pending = self.pending.len(), "Waiting for remote mark-read calls");
        }
        while let Some(done) = self.pending.join_next().await {
            if let Err(e) = done {
                warn!(error = %e, "Mark-read task failed");
            }
        }
        info!("NotificationFeedService stopped");
    }

    async fn load_backlog(&mut self) {
        match self.api.list_notifications(self.user_id.clone()).await {
            Ok(backlog) => {
                info!(count = backlog.len(), "Loaded notification backlog");
                self.notifications = backlog;
            }
            Err(e) => warn!(error = %e, "Could not load notification backlog"),
        }
    }

    fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.read).count()
    }

    #[instrument(skip(self, notification), fields(notification_id = %notification.id))]
    fn handle_pushed(&mut self, mut notification: Notification) {
        notification.read = false;
        self.notifications.insert(0, notification);
        debug!(unread = self.unread_count(), "Notification prepended");
    }

    /// Marks everything read locally and tells the backend without waiting
    /// for the reply. Returns how many notifications changed.
    #[instrument(skip(self))]
    fn handle_mark_all_read(&mut self) -> usize {
        let changed = self.unread_count();
        for notification in &mut self.notifications {
            notification.read = true;
        }
        info!(changed, "Marked all notifications read");

        let api = self.api.clone();
        let user_id = self.user_id.clone();
        self.pending.spawn(
            async move {
                if let Err(e) = api.mark_notifications_read(user_id).await {
                    warn!(error = %e, "Remote mark-read failed");
                }
            }
            .in_current_span(),
        );
        changed
    }
}
