//! Drag-and-drop reordering of the visible column list.
//!
//! The drop position is computed against the list *after* the dragged key
//! has been removed, so moves to the right land where the indicator showed.

/// Moves `dragged` next to `target` in `columns`.
///
/// With `insert_after` the dragged key lands immediately after the target,
/// otherwise immediately before it. Returns `false` and leaves the list
/// untouched when the keys are equal or either one is not in the list.
pub fn move_column(columns: &mut Vec<String>, dragged: &str, target: &str, insert_after: bool) -> bool {
    if dragged == target || !columns.iter().any(|k| k == target) {
        return false;
    }
    let Some(from) = columns.iter().position(|k| k == dragged) else {
        return false;
    };

    let moved = columns.remove(from);
    // Indices after `from` shifted left by one; look the target up again.
    let Some(target_index) = columns.iter().position(|k| k == target) else {
        columns.insert(from, moved);
        return false;
    };
    let insert_at = if insert_after {
        target_index + 1
    } else {
        target_index
    };
    columns.insert(insert_at, moved);
    true
}

/// Vertical extent of a list item in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemBounds {
    /// Top edge.
    pub top: f32,
    /// Height of the item.
    pub height: f32,
}

impl ItemBounds {
    /// Creates bounds from a top edge and height.
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    /// Check if a pointer position is within the item.
    pub fn contains(&self, y: f32) -> bool {
        y >= self.top && y < self.top + self.height
    }

    /// Returns `true` when the pointer is in the lower half of the item.
    pub fn is_lower_half(&self, y: f32) -> bool {
        y >= self.top + self.height / 2.0
    }
}

/// Where a dragged column would land if released now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropTarget {
    /// Column the pointer is over.
    pub key: String,
    /// Insert after `key` (lower half) rather than before it.
    pub insert_after: bool,
}

/// Drag session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// A column is being dragged.
    Dragging {
        /// Key being dragged.
        dragged: String,
        /// Last computed drop target, drives the insertion indicator.
        target: Option<DropTarget>,
    },
}

/// State machine for one drag session: `idle -> dragging -> idle`.
#[derive(Debug, Clone, Default)]
pub struct ReorderController {
    state: DragState,
}

impl ReorderController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Returns `true` while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Key being dragged, if any.
    pub fn dragged(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { dragged, .. } => Some(dragged),
            DragState::Idle => None,
        }
    }

    /// Current insertion indicator, if the pointer is over a valid target.
    pub fn indicator(&self) -> Option<&DropTarget> {
        match &self.state {
            DragState::Dragging { target, .. } => target.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Starts dragging `key`. Ignored unless idle and `key` is visible.
    pub fn begin(&mut self, key: &str, visible: &[String]) -> bool {
        if self.is_dragging() || !visible.iter().any(|k| k == key) {
            return false;
        }
        log::debug!("drag start: {}", key);
        self.state = DragState::Dragging {
            dragged: key.to_string(),
            target: None,
        };
        true
    }

    /// Updates the drop target from a pointer move over `target_key`.
    ///
    /// Hovering the dragged item itself clears the indicator.
    pub fn hover(&mut self, target_key: &str, pointer_y: f32, bounds: ItemBounds) -> Option<&DropTarget> {
        let DragState::Dragging { dragged, target } = &mut self.state else {
            return None;
        };
        if dragged.as_str() == target_key || !bounds.contains(pointer_y) {
            *target = None;
            return None;
        }
        log::trace!("drag over {} at y={}", target_key, pointer_y);
        *target = Some(DropTarget {
            key: target_key.to_string(),
            insert_after: bounds.is_lower_half(pointer_y),
        });
        target.as_ref()
    }

    /// Clears the drop target when the pointer leaves every item.
    pub fn leave(&mut self) {
        if let DragState::Dragging { target, .. } = &mut self.state {
            *target = None;
        }
    }

    /// Ends the session, returning the dragged key and last drop target.
    ///
    /// Returns `None` when idle or when no valid target was hovered; the
    /// controller is idle afterwards either way.
    pub fn finish(&mut self) -> Option<(String, DropTarget)> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging {
                dragged,
                target: Some(target),
            } => Some((dragged, target)),
            _ => None,
        }
    }

    /// Abandons the session without producing a move.
    pub fn cancel(&mut self) {
        if self.is_dragging() {
            log::debug!("drag cancelled");
        }
        self.state = DragState::Idle;
    }
}
