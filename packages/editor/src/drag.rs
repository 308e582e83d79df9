//! # Drag-and-Drop Controller
//!
//! Interprets one pointer-drag gesture against the document tree.
//!
//! ```text
//!          press            move ≥ activation          release / cancel
//!   Idle ─────────▶ Pressed ─────────────────▶ Dragging ───────────────▶ Idle
//!     ▲               │ release / cancel                                  │
//!     └───────────────┴───────────────────────────────────────────────────┘
//! ```
//!
//! Only a release from `Dragging` can touch the tree. Whatever happens, the
//! controller is back in `Idle` afterwards.
//!
//! Drop resolution:
//!
//! | payload        | column target             | canvas target                |
//! |----------------|---------------------------|------------------------------|
//! | palette block  | fresh copy appended there | fresh copy appended at end   |
//! | existing block | ignored                   | top-level reorder            |

use crate::mutations::{Mutation, MutationError};
use crate::tree::{DocumentTree, TreeChange};
use mailblocks_model::{Document, EmailBlock, IDGenerator};
use tracing::debug;

/// Pointer travel (px) before a press becomes a drag
pub const DEFAULT_ACTIVATION_DISTANCE: f32 = 8.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// What is being dragged
#[derive(Debug, Clone, PartialEq)]
pub enum DragPayload {
    /// A template from the palette; dropped copies get fresh ids
    Palette(EmailBlock),
    /// A block already in the document
    Existing(String),
}

/// A drop zone under the pointer at release time
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    Column { column_id: String },
    /// The top-level canvas, optionally over one of its blocks
    Canvas { over_block: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Idle,
    Pressed {
        payload: DragPayload,
        origin: Point,
    },
    Dragging {
        payload: DragPayload,
        origin: Point,
        pointer: Point,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum IgnoreReason {
    /// Released before the activation distance was reached
    NotDragging,
    /// Released outside every drop zone
    NoTarget,
    /// Rows cannot live inside columns
    RowIntoColumn,
    /// Moving existing blocks into columns is not supported
    ExistingIntoColumn,
    /// The dragged block is not on the top level (or no longer exists)
    NotTopLevel,
    /// Dropped where it already was
    SamePosition,
    /// The column vanished before the drop landed
    ColumnMissing,
    /// The tree refused the change
    Refused(MutationError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Appended { block_id: String },
    AddedToColumn { column_id: String, block_id: String },
    Reordered { from: usize, to: usize },
    Ignored(IgnoreReason),
}

impl DropOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, DropOutcome::Ignored(_))
    }
}

/// Pick the drop target: a column beats the canvas it sits on
pub fn resolve_target(targets: &[DropTarget]) -> Option<&DropTarget> {
    targets
        .iter()
        .find(|t| matches!(t, DropTarget::Column { .. }))
        .or_else(|| targets.first())
}

#[derive(Debug, Clone)]
pub struct DragController {
    state: DragState,
    activation_distance: f32,
}

impl DragController {
    pub fn new() -> Self {
        Self::with_activation_distance(DEFAULT_ACTIVATION_DISTANCE)
    }

    pub fn with_activation_distance(activation_distance: f32) -> Self {
        Self {
            state: DragState::Idle,
            activation_distance,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DragState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pointer down on a draggable. Ignored unless idle: one gesture at a time.
    pub fn press(&mut self, payload: DragPayload, at: Point) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = DragState::Pressed { payload, origin: at };
        true
    }

    /// Pointer moved; returns true while a drag is active
    pub fn move_to(&mut self, at: Point) -> bool {
        let state = std::mem::replace(&mut self.state, DragState::Idle);
        self.state = match state {
            DragState::Pressed { payload, origin } if origin.distance(at) >= self.activation_distance => {
                debug!("Drag activated");
                DragState::Dragging {
                    payload,
                    origin,
                    pointer: at,
                }
            }
            DragState::Dragging { payload, origin, .. } => DragState::Dragging {
                payload,
                origin,
                pointer: at,
            },
            other => other,
        };
        self.is_dragging()
    }

    /// Payload and pointer position for the floating preview
    pub fn preview(&self) -> Option<(&DragPayload, Point)> {
        match &self.state {
            DragState::Dragging { payload, pointer, .. } => Some((payload, *pointer)),
            _ => None,
        }
    }

    /// Abort the gesture (pointer capture lost, escape key)
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Pointer released over `targets` (every drop zone under the pointer)
    pub fn release(
        &mut self,
        targets: &[DropTarget],
        doc: &mut Document,
        ids: &mut IDGenerator,
    ) -> DropOutcome {
        let state = std::mem::replace(&mut self.state, DragState::Idle);

        let DragState::Dragging { payload, .. } = state else {
            return DropOutcome::Ignored(IgnoreReason::NotDragging);
        };

        let Some(target) = resolve_target(targets) else {
            debug!("Drop outside any zone, discarding gesture");
            return DropOutcome::Ignored(IgnoreReason::NoTarget);
        };

        let outcome = match (payload, target) {
            (DragPayload::Palette(template), DropTarget::Column { column_id }) => {
                drop_into_column(&template, column_id, doc, ids)
            }
            (DragPayload::Palette(template), DropTarget::Canvas { .. }) => {
                let block = template.with_fresh_ids(ids);
                let block_id = block.id().to_string();
                match (Mutation::AddBlock { block }).apply(doc) {
                    Ok(_) => DropOutcome::Appended { block_id },
                    Err(e) => DropOutcome::Ignored(IgnoreReason::Refused(e)),
                }
            }
            (DragPayload::Existing(_), DropTarget::Column { .. }) => {
                DropOutcome::Ignored(IgnoreReason::ExistingIntoColumn)
            }
            (DragPayload::Existing(block_id), DropTarget::Canvas { over_block }) => {
                reorder_on_canvas(&block_id, over_block.as_deref(), doc)
            }
        };

        debug!(outcome = ?outcome, "Drop resolved");
        outcome
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

fn drop_into_column(
    template: &EmailBlock,
    column_id: &str,
    doc: &mut Document,
    ids: &mut IDGenerator,
) -> DropOutcome {
    if template.is_row() {
        return DropOutcome::Ignored(IgnoreReason::RowIntoColumn);
    }

    let Ok(block) = template.with_fresh_ids(ids).into_content() else {
        return DropOutcome::Ignored(IgnoreReason::RowIntoColumn);
    };
    let block_id = block.id().to_string();

    let mutation = Mutation::AddToColumn {
        column_id: column_id.to_string(),
        block,
    };
    match mutation.apply(doc) {
        Ok(TreeChange::Applied) => DropOutcome::AddedToColumn {
            column_id: column_id.to_string(),
            block_id,
        },
        Ok(TreeChange::Unchanged) => DropOutcome::Ignored(IgnoreReason::ColumnMissing),
        Err(e) => DropOutcome::Ignored(IgnoreReason::Refused(e)),
    }
}

fn reorder_on_canvas(block_id: &str, over_block: Option<&str>, doc: &mut Document) -> DropOutcome {
    let Some(from) = doc.top_level_index(block_id) else {
        return DropOutcome::Ignored(IgnoreReason::NotTopLevel);
    };

    // Empty canvas area means "after everything"
    let to = match over_block {
        Some(over) => match doc.top_level_index(over) {
            Some(index) => index,
            None => return DropOutcome::Ignored(IgnoreReason::NoTarget),
        },
        None => doc.blocks.len() - 1,
    };

    if from == to {
        return DropOutcome::Ignored(IgnoreReason::SamePosition);
    }

    let mutation = Mutation::MoveBlock {
        from_index: from,
        to_index: to,
    };
    match mutation.apply(doc) {
        Ok(TreeChange::Applied) => DropOutcome::Reordered { from, to },
        Ok(TreeChange::Unchanged) => DropOutcome::Ignored(IgnoreReason::SamePosition),
        Err(e) => DropOutcome::Ignored(IgnoreReason::Refused(e)),
    }
}
