//! # Edit Session Management
//!
//! Tracks one user's editing state for one email: the document being edited,
//! the current selection, the drag gesture in progress and save bookkeeping.
//!
//! Saves are snapshots. `begin_save` captures the document at the current
//! version and `finish_save` acknowledges it later. Completions are applied
//! in revision order, so a slow early save never marks newer edits as saved.

use crate::drag::{DragController, DragPayload, DropOutcome, DropTarget, Point};
use crate::mutations::Mutation;
use crate::palette::{ContentDraft, PaletteItem};
use crate::store::{DocumentStore, StoreError};
use crate::tree::{BlockRef, DocumentTree, TreeChange};
use crate::EditorError;
use mailblocks_compiler_html::{export, ExportedFile};
use mailblocks_model::{Document, IDGenerator};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Single edit session
pub struct EditSession {
    /// Email whose content is being edited
    pub email_id: String,

    document: Document,

    selected_block_id: Option<String>,

    drag: DragController,

    ids: IDGenerator,

    /// Increments on every change that touched the tree
    version: u64,

    /// Newest revision the store acknowledged
    saved_revision: u64,

    /// Newest revision handed out by `begin_save` and not yet finished
    in_flight: Option<u64>,
}

/// Snapshot to hand to a [`DocumentStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub email_id: String,
    pub revision: u64,
    pub content: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Saved { revision: u64 },
    /// A newer revision was already acknowledged
    Stale { revision: u64 },
    Failed(String),
}

impl EditSession {
    pub fn new(email_id: impl Into<String>, document: Document) -> Self {
        Self::with_ids(email_id, document, IDGenerator::new())
    }

    /// Create a session with an explicit id generator (fixed seeds in tests)
    pub fn with_ids(email_id: impl Into<String>, document: Document, ids: IDGenerator) -> Self {
        Self {
            email_id: email_id.into(),
            document,
            selected_block_id: None,
            drag: DragController::new(),
            ids,
            version: 0,
            saved_revision: 0,
            in_flight: None,
        }
    }

    /// Load an email's content. Missing or malformed content opens an empty document.
    pub fn open<S: DocumentStore + ?Sized>(store: &S, email_id: &str) -> Result<Self, EditorError> {
        let stored = store.load_document(email_id)?;
        let document = Document::from_persisted(stored);
        info!(email_id, blocks = document.blocks.len(), "Opened email");
        Ok(Self::new(email_id, document))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn ids(&mut self) -> &mut IDGenerator {
        &mut self.ids
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Select a block for property editing; `None` clears the selection
    pub fn select(&mut self, block_id: Option<&str>) {
        self.selected_block_id = block_id.map(str::to_string);
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.selected_block_id.as_deref()
    }

    /// The selected block, if it still exists
    pub fn selected_block(&self) -> Option<BlockRef<'_>> {
        self.selected_block_id
            .as_deref()
            .and_then(|id| self.document.find_by_id(id))
    }

    pub fn apply(&mut self, mutation: Mutation) -> Result<TreeChange, EditorError> {
        let change = mutation.apply(&mut self.document)?;
        if change.is_applied() {
            self.touch();
        }
        Ok(change)
    }

    /// Append a fresh palette block at the end of the document, returning its id
    pub fn add_from_palette(&mut self, item: PaletteItem) -> Result<String, EditorError> {
        let block = item.template(&mut self.ids)?;
        let block_id = block.id().to_string();
        self.apply(Mutation::AddBlock { block })?;
        Ok(block_id)
    }

    /// Build a content block from the dialog fields and append it to a column
    pub fn add_draft_to_column(
        &mut self,
        column_id: &str,
        draft: &ContentDraft,
    ) -> Result<TreeChange, EditorError> {
        let block = draft.build(&mut self.ids);
        self.apply(Mutation::AddToColumn {
            column_id: column_id.to_string(),
            block,
        })
    }

    pub fn press(&mut self, payload: DragPayload, at: Point) -> bool {
        self.drag.press(payload, at)
    }

    /// Start dragging a new block out of the palette
    pub fn press_palette(&mut self, item: PaletteItem, at: Point) -> Result<bool, EditorError> {
        let template = item.template(&mut self.ids)?;
        Ok(self.drag.press(DragPayload::Palette(template), at))
    }

    pub fn move_to(&mut self, at: Point) -> bool {
        self.drag.move_to(at)
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    pub fn release(&mut self, targets: &[DropTarget]) -> DropOutcome {
        let outcome = self.drag.release(targets, &mut self.document, &mut self.ids);
        if outcome.is_applied() {
            self.touch();
        }
        outcome
    }

    /// Snapshot the document for saving
    pub fn begin_save(&mut self) -> SaveRequest {
        self.in_flight = Some(self.version);
        SaveRequest {
            email_id: self.email_id.clone(),
            revision: self.version,
            content: self.document.to_persisted(),
        }
    }

    /// Record the store's answer for the save of `revision`
    pub fn finish_save(&mut self, revision: u64, result: Result<(), StoreError>) -> SaveStatus {
        if self.in_flight == Some(revision) {
            self.in_flight = None;
        }

        if revision < self.saved_revision {
            debug!(revision, saved = self.saved_revision, "Ignoring stale save completion");
            return SaveStatus::Stale { revision };
        }

        match result {
            Ok(()) => {
                self.saved_revision = revision;
                info!(email_id = %self.email_id, revision, "Saved email");
                SaveStatus::Saved { revision }
            }
            Err(e) => {
                warn!(email_id = %self.email_id, revision, error = %e, "Save failed");
                SaveStatus::Failed(e.to_string())
            }
        }
    }

    /// Save synchronously through `store`
    pub fn save<S: DocumentStore + ?Sized>(&mut self, store: &S) -> SaveStatus {
        let request = self.begin_save();
        let result = store.save_document(&request.email_id, &request.content);
        self.finish_save(request.revision, result)
    }

    /// Whether there are changes the store has not acknowledged
    pub fn is_dirty(&self) -> bool {
        self.version > self.saved_revision
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Compile the document into a downloadable HTML file
    pub fn export(&self, display_name: &str) -> ExportedFile {
        export(&self.document, display_name)
    }

    fn touch(&mut self) {
        self.version += 1;

        let selection_gone = self
            .selected_block_id
            .as_deref()
            .is_some_and(|id| !self.document.contains_id(id));
        if selection_gone {
            debug!("Selected block was removed, clearing selection");
            self.selected_block_id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn session() -> EditSession {
        EditSession::with_ids("welcome", Document::new(), IDGenerator::from_seed("s"))
    }

    #[test]
    fn test_session_creation() {
        let session = session();
        assert_eq!(session.email_id, "welcome");
        assert_eq!(session.version(), 0);
        assert!(!session.is_dirty());
        assert!(session.selected_block().is_none());
    }

    #[test]
    fn test_removing_selected_block_clears_selection() {
        let mut session = session();
        let id = session.add_from_palette(PaletteItem::Text).unwrap();
        session.select(Some(id.as_str()));
        assert!(session.selected_block().is_some());

        session
            .apply(Mutation::RemoveBlock { block_id: id })
            .unwrap();
        assert_eq!(session.selected_block_id(), None);
    }

    #[test]
    fn test_stale_save_does_not_mark_newer_edits_saved() {
        let mut session = session();
        session.add_from_palette(PaletteItem::Text).unwrap();
        let first = session.begin_save();

        session.add_from_palette(PaletteItem::Divider).unwrap();
        let second = session.begin_save();

        assert_eq!(
            session.finish_save(second.revision, Ok(())),
            SaveStatus::Saved { revision: 2 }
        );
        assert_eq!(
            session.finish_save(first.revision, Ok(())),
            SaveStatus::Stale { revision: 1 }
        );
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_failed_save_keeps_document() {
        let mut session = session();
        session.add_from_palette(PaletteItem::Spacer).unwrap();
        let request = session.begin_save();

        let status = session.finish_save(
            request.revision,
            Err(StoreError::Rejected("quota".to_string())),
        );
        assert!(matches!(status, SaveStatus::Failed(_)));
        assert!(session.is_dirty());
        assert_eq!(session.document().blocks.len(), 1);
    }

    #[test]
    fn test_open_malformed_content_is_empty() {
        let store = MemoryStore::new();
        store.insert("broken", serde_json::json!({ "blocks": 42 })).unwrap();

        let session = EditSession::open(&store, "broken").unwrap();
        assert!(session.document().is_empty());
    }
}
