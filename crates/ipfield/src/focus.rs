//! Focus routing between the segments of an address control.
//!
//! A segment never moves focus itself. When a keystroke should take the user
//! to another segment it returns a [`CedeFocus`] request naming its own index
//! and the [`CedeAction`] wanted. The [`FocusCoordinator`] turns that request
//! into a [`FocusTarget`]: which segment receives focus and where its cursor
//! lands. The owning control applies the target.
//!
//! # Routing Rules
//!
//! | Action | Target |
//! |---|---|
//! | `Home` | first segment, cursor at start |
//! | `End` | last segment, cursor at end |
//! | `Trim` | previous segment, last character removed, cursor at end |
//! | `Step { Forward, .. }` | next segment |
//! | `Step { Reverse, .. }` | previous segment |
//!
//! Trimming from the first segment, stepping forward from the last and
//! stepping back from the first resolve to nothing.

use ipfield_core::logging::targets;

/// Direction of a step between segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards higher segment indices.
    Forward,
    /// Towards lower segment indices.
    Reverse,
}

/// What the receiving segment selects after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    /// Nothing selected; the cursor sits at the edge nearest the origin.
    None,
    /// The whole text of the receiving segment is selected.
    All,
}

/// The kind of focus move a segment asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CedeAction {
    /// Move to the previous segment and delete its last character.
    Trim,
    /// Move to the first segment.
    Home,
    /// Move to the last segment.
    End,
    /// Move one segment in `direction`.
    Step {
        direction: Direction,
        selection: Selection,
    },
}

impl CedeAction {
    /// Step forward, selecting the whole next segment.
    pub const FORWARD_ALL: Self = Self::Step {
        direction: Direction::Forward,
        selection: Selection::All,
    };

    /// Step forward with the cursor at the start of the next segment.
    pub const FORWARD_NONE: Self = Self::Step {
        direction: Direction::Forward,
        selection: Selection::None,
    };

    /// Step back, selecting the whole previous segment.
    pub const REVERSE_ALL: Self = Self::Step {
        direction: Direction::Reverse,
        selection: Selection::All,
    };

    /// Step back with the cursor at the end of the previous segment.
    pub const REVERSE_NONE: Self = Self::Step {
        direction: Direction::Reverse,
        selection: Selection::None,
    };
}

/// A request from segment `origin` to move focus elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CedeFocus {
    /// Index of the segment giving up focus.
    pub origin: usize,
    /// The move requested.
    pub action: CedeAction,
}

impl CedeFocus {
    /// Create a new cede request.
    pub fn new(origin: usize, action: CedeAction) -> Self {
        Self { origin, action }
    }
}

/// Where the cursor lands in the segment that receives focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placement {
    /// Cursor at position 0, no selection.
    Start,
    /// Cursor after the last character, no selection.
    End,
    /// Whole text selected.
    SelectAll,
    /// Last character removed, then cursor at the new end.
    TrimLast,
}

/// A resolved focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusTarget {
    /// Index of the segment receiving focus.
    pub index: usize,
    /// Cursor placement inside that segment.
    pub placement: Placement,
}

/// Stateless router for [`CedeFocus`] requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusCoordinator {
    segment_count: usize,
}

impl FocusCoordinator {
    /// Create a coordinator for `segment_count` segments.
    pub fn new(segment_count: usize) -> Self {
        Self { segment_count }
    }

    /// Number of segments routed between.
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Resolve a cede request to the segment that should receive focus.
    ///
    /// Returns `None` when the move has nowhere to go, or when `origin` is not
    /// a valid segment index.
    pub fn resolve(&self, request: CedeFocus) -> Option<FocusTarget> {
        let CedeFocus { origin, action } = request;
        if origin >= self.segment_count {
            tracing::debug!(
                target: targets::FOCUS,
                origin,
                segment_count = self.segment_count,
                "ignoring cede from unknown segment"
            );
            return None;
        }
        let last = self.segment_count - 1;

        let target = match action {
            CedeAction::Home => Some(FocusTarget {
                index: 0,
                placement: Placement::Start,
            }),
            CedeAction::End => Some(FocusTarget {
                index: last,
                placement: Placement::End,
            }),
            CedeAction::Trim => origin.checked_sub(1).map(|index| FocusTarget {
                index,
                placement: Placement::TrimLast,
            }),
            CedeAction::Step {
                direction,
                selection,
            } => {
                let index = match direction {
                    Direction::Forward if origin < last => Some(origin + 1),
                    Direction::Reverse => origin.checked_sub(1),
                    Direction::Forward => None,
                };
                let placement = match (selection, direction) {
                    (Selection::All, _) => Placement::SelectAll,
                    (Selection::None, Direction::Forward) => Placement::Start,
                    (Selection::None, Direction::Reverse) => Placement::End,
                };
                index.map(|index| FocusTarget { index, placement })
            }
        };

        tracing::debug!(target: targets::FOCUS, ?request, ?target, "resolved cede request");
        target
    }
}
