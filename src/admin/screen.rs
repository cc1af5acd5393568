use std::marker::PhantomData;

use tracing::{info, instrument, warn};

use super::{AdminBackend, AdminError, Saved};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(String),
}

/// The open create/edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct Editor<D> {
    pub mode: EditorMode,
    pub draft: D,
}

/// A list of records plus an optional editor, the shape shared by every admin
/// screen.
pub struct AdminScreen<R, B>
where
    R: Clone + Send + Sync + 'static,
    B: AdminBackend<R>,
{
    backend: B,
    records: Vec<R>,
    editor: Option<Editor<B::Draft>>,
    _record: PhantomData<fn() -> R>,
}

impl<R, B> AdminScreen<R, B>
where
    R: Clone + Send + Sync + 'static,
    B: AdminBackend<R>,
{
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            records: Vec::new(),
            editor: None,
            _record: PhantomData,
        }
    }

    /// Mount: fetches the list.
    #[instrument(skip(self), fields(kind = self.backend.kind()))]
    pub async fn load(&mut self) -> Result<&[R], AdminError> {
        match self.backend.list().await {
            Ok(records) => {
                info!(count = records.len(), "Records loaded");
                self.records = records;
                Ok(&self.records)
            }
            Err(e) => {
                warn!(error = %e, "Could not load records");
                Err(e)
            }
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| self.backend.id_of(record) == id)
    }

    pub fn editor(&self) -> Option<&Editor<B::Draft>> {
        self.editor.as_ref()
    }

    pub fn open_create(&mut self) -> &mut B::Draft {
        let editor = self.editor.insert(Editor {
            mode: EditorMode::Create,
            draft: B::Draft::default(),
        });
        &mut editor.draft
    }

    /// Opens the editor prefilled from an existing record.
    pub fn open_edit(&mut self, id: &str) -> Result<&mut B::Draft, AdminError> {
        let record = self.get(id).ok_or_else(|| AdminError::NotFound {
            kind: self.backend.kind(),
            id: id.to_string(),
        })?;
        let draft = self.backend.draft_of(record);
        let editor = self.editor.insert(Editor {
            mode: EditorMode::Edit(id.to_string()),
            draft,
        });
        Ok(&mut editor.draft)
    }

    pub fn draft_mut(&mut self) -> Option<&mut B::Draft> {
        self.editor.as_mut().map(|editor| &mut editor.draft)
    }

    /// Saves the open draft. On failure the editor stays open with the draft
    /// intact.
    #[instrument(skip(self), fields(kind = self.backend.kind()))]
    pub async fn submit(&mut self) -> Result<(), AdminError> {
        let editor = self.editor.as_ref().ok_or(AdminError::NoEditor)?;
        let mode = editor.mode.clone();
        let draft = editor.draft.clone();

        let saved = match &mode {
            EditorMode::Create => self.backend.create(draft).await,
            EditorMode::Edit(id) => self.backend.update(id, draft).await,
        };
        let saved = match saved {
            Ok(saved) => saved,
            Err(e) => {
                warn!(error = %e, mode = ?mode, "Save failed, editor kept open");
                return Err(e);
            }
        };

        self.editor = None;
        match saved {
            Saved::Record(record) => {
                self.splice(record);
                info!(mode = ?mode, "Record saved");
            }
            Saved::Refetch => {
                info!(mode = ?mode, "Record saved, reloading list");
                self.load().await?;
            }
        }
        Ok(())
    }

    pub fn close(&mut self) {
        self.editor = None;
    }

    /// Removes a record after `confirm` approves it. Returns whether anything
    /// was deleted.
    #[instrument(skip(self, confirm), fields(kind = self.backend.kind()))]
    pub async fn delete(&mut self, id: &str, confirm: impl FnOnce(&R) -> bool) -> Result<bool, AdminError> {
        let record = self.get(id).ok_or_else(|| AdminError::NotFound {
            kind: self.backend.kind(),
            id: id.to_string(),
        })?;
        if !confirm(record) {
            info!("Delete not confirmed");
            return Ok(false);
        }

        self.backend.delete(id).await?;
        let backend = &self.backend;
        self.records.retain(|record| backend.id_of(record) != id);
        info!("Record deleted");
        Ok(true)
    }

    fn splice(&mut self, record: R) {
        let backend = &self.backend;
        let id = backend.id_of(&record);
        let position = self.records.iter().position(|existing| backend.id_of(existing) == id);
        match position {
            Some(index) => self.records[index] = record,
            None => self.records.push(record),
        }
    }
}
