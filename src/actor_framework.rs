use std::fmt::Debug;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::domain::{DeliveryDraft, DeliveryStatus, User, UserDraft};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// A record kept in a local, in-memory collection and edited through a draft.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Draft: Clone + Debug + Default + Send + Sync + 'static;

    /// Human-readable collection name, used in logs and errors.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Prefilled editor payload for an existing record.
    fn to_draft(&self) -> Self::Draft;

    /// Builds a new record from the editor payload.
    fn from_draft(id: String, draft: Self::Draft) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_update(&mut self, draft: Self::Draft) -> Result<(), String>;

    /// Whether the collection allows deleting this record.
    fn on_delete(&self) -> Result<(), String> {
        Err(format!("{} records cannot be deleted", Self::KIND))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameworkError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("{0}")]
    Rejected(String),
    #[error("{0} store unavailable")]
    Unavailable(&'static str),
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        draft: T::Draft,
        respond_to: Response<T>,
    },
    Get {
        id: String,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: String,
        draft: T::Draft,
        respond_to: Response<T>,
    },
    Delete {
        id: String,
        respond_to: Response<()>,
    },
    /// Replaces the whole collection.
    Seed {
        items: Vec<T>,
        respond_to: Response<usize>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Owns an ordered collection of `T`. New records are appended.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: Vec<T>,
    next_id_fn: Box<dyn Fn() -> String + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(buffer_size: usize, next_id_fn: impl Fn() -> String + Send + Sync + 'static) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: Vec::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient { sender };
        (actor, client)
    }

    #[instrument(name = "resource_actor", skip(self), fields(kind = T::KIND))]
    pub async fn run(mut self) {
        info!("ResourceActor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { draft, respond_to } => {
                    let id = (self.next_id_fn)();
                    let result = T::from_draft(id, draft).map_err(FrameworkError::Rejected).map(|item| {
                        debug!(id = %item.id(), "Record created");
                        self.store.push(item.clone());
                        item
                    });
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.iter().find(|item| item.id() == id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.clone()));
                }
                ResourceRequest::Update { id, draft, respond_to } => {
                    let result = match self.store.iter_mut().find(|item| item.id() == id) {
                        Some(item) => item
                            .on_update(draft)
                            .map(|_| item.clone())
                            .map_err(FrameworkError::Rejected),
                        None => Err(FrameworkError::NotFound { kind: T::KIND, id }),
                    };
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.delete(id));
                }
                ResourceRequest::Seed { items, respond_to } => {
                    info!(count = items.len(), "Collection seeded");
                    self.store = items;
                    let _ = respond_to.send(Ok(self.store.len()));
                }
            }
        }
        info!("ResourceActor stopped");
    }

    fn delete(&mut self, id: String) -> Result<(), FrameworkError> {
        let index = self
            .store
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| FrameworkError::NotFound { kind: T::KIND, id: id.clone() })?;
        if let Err(e) = self.store[index].on_delete() {
            warn!(id = %id, error = %e, "Delete refused");
            return Err(FrameworkError::Rejected(e));
        }
        self.store.remove(index);
        debug!(id = %id, "Record deleted");
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    async fn request<R>(&self, build: impl FnOnce(Response<R>) -> ResourceRequest<T>) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::Unavailable(T::KIND))?;
        response.await.map_err(|_| FrameworkError::Unavailable(T::KIND))?
    }

    pub async fn create(&self, draft: T::Draft) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { draft, respond_to }).await
    }

    pub async fn get(&self, id: String) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn update(&self, id: String, draft: T::Draft) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, draft, respond_to }).await
    }

    pub async fn delete(&self, id: String) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn seed(&self, items: Vec<T>) -> Result<usize, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Seed { items, respond_to }).await
    }
}

// =============================================================================
// 5. LOCAL ENTITIES
// =============================================================================

impl Entity for User {
    type Draft = UserDraft;
    const KIND: &'static str = "User";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }

    fn from_draft(id: String, draft: UserDraft) -> Result<Self, String> {
        validate_user(&draft)?;
        Ok(User::new(draft.name, draft.email).with_role(draft.role).with_id(id))
    }

    fn on_update(&mut self, draft: UserDraft) -> Result<(), String> {
        validate_user(&draft)?;
        self.name = draft.name;
        self.email = draft.email;
        self.role = draft.role;
        Ok(())
    }

    fn on_delete(&self) -> Result<(), String> {
        Ok(())
    }
}

fn validate_user(draft: &UserDraft) -> Result<(), String> {
    if draft.name.trim().is_empty() {
        return Err("Name is required".to_string());
    }
    if !draft.email.contains('@') {
        return Err(format!("Invalid email: {}", draft.email));
    }
    Ok(())
}

impl Entity for DeliveryStatus {
    type Draft = DeliveryDraft;
    const KIND: &'static str = "Delivery status";

    fn id(&self) -> &str {
        &self.id
    }

    fn to_draft(&self) -> DeliveryDraft {
        DeliveryDraft::from(self)
    }

    fn from_draft(id: String, draft: DeliveryDraft) -> Result<Self, String> {
        Ok(DeliveryStatus::from_draft(id, draft))
    }

    fn on_update(&mut self, draft: DeliveryDraft) -> Result<(), String> {
        *self = DeliveryStatus::from_draft(std::mem::take(&mut self.id), draft);
        Ok(())
    }
}

// =============================================================================
// 6. TESTS
// =============================================================================
