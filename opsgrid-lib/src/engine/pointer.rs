//! Pointer sessions: column drag reordering and edge resizing.
//!
//! A session captures the pointer from `begin_*` until `finish`/`end`,
//! `cancel` or teardown. Hosts route pointer moves and releases to the
//! engine only while [`TableEngine::pointer_capture`] reports a capture, and
//! must stop listening once it is gone. Only one session exists at a time.

use crate::persist::LayoutSection;
use crate::reorder::DropTarget;
use crate::reorder::ItemBounds;
use crate::resize::in_grab_zone;

use super::TableEngine;

/// Which session currently owns the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerCapture {
    /// A column is being dragged to a new position.
    Reorder,
    /// A column edge is being dragged to a new width.
    Resize,
}

impl TableEngine {
    /// The active pointer capture, if any.
    pub fn pointer_capture(&self) -> Option<PointerCapture> {
        self.read(|inner| inner.capture)
    }

    /// Key being dragged, if a drag is in progress.
    pub fn dragged_column(&self) -> Option<String> {
        self.read(|inner| inner.reorder.dragged().map(str::to_string))
    }

    /// Current insertion indicator of the drag session.
    pub fn drop_indicator(&self) -> Option<DropTarget> {
        self.read(|inner| inner.reorder.indicator().cloned())
    }

    /// Key being resized, if a resize is in progress.
    pub fn resizing_column(&self) -> Option<String> {
        self.read(|inner| inner.resize.session().map(|s| s.key.clone()))
    }

    /// Starts dragging a visible column.
    ///
    /// Ignored while any pointer session is active.
    pub fn begin_drag(&self, key: &str) -> bool {
        self.update(|inner, _| {
            if inner.capture.is_some() {
                log::debug!("drag of {} ignored, pointer already captured", key);
                return false;
            }
            let started = inner.reorder.begin(key, inner.layout.visible_columns());
            if started {
                inner.capture = Some(PointerCapture::Reorder);
            }
            started
        })
    }

    /// Pointer moved over a visible column during a drag.
    ///
    /// Returns the live drop target; `None` over the dragged column itself or
    /// outside the item's bounds.
    pub fn drag_over(&self, target: &str, pointer_y: f32, bounds: ItemBounds) -> Option<DropTarget> {
        self.update(|inner, _| {
            if !inner.layout.is_visible(target) {
                inner.reorder.leave();
                return None;
            }
            inner.reorder.hover(target, pointer_y, bounds).cloned()
        })
    }

    /// Pointer left every drop target during a drag.
    pub fn drag_leave(&self) {
        self.update(|inner, _| inner.reorder.leave());
    }

    /// Drops the dragged column at the last drop target.
    ///
    /// Releases the capture. Returns `true` if the order changed, in which
    /// case the table is re-laid-out and the order is persisted. Without a
    /// target the drop behaves like [`cancel_drag`](Self::cancel_drag).
    pub async fn finish_drag(&self) -> bool {
        let moved = self.update(|inner, services| {
            if inner.capture == Some(PointerCapture::Reorder) {
                inner.capture = None;
            }
            let Some((dragged, target)) = inner.reorder.finish() else {
                return false;
            };
            let moved = inner
                .layout
                .move_column(&dragged, &target.key, target.insert_after);
            if moved {
                log::debug!(
                    "moved {} {} {}",
                    dragged,
                    if target.insert_after { "after" } else { "before" },
                    target.key
                );
                inner.rerender(services);
            }
            moved
        });

        if moved {
            self.flush(&[LayoutSection::Columns]).await;
        }
        moved
    }

    /// Abandons the drag without changing the order.
    pub fn cancel_drag(&self) {
        self.update(|inner, _| {
            inner.reorder.cancel();
            if inner.capture == Some(PointerCapture::Reorder) {
                inner.capture = None;
            }
        });
    }

    /// Pointer pressed on a header cell.
    ///
    /// `offset_x` is the press position within the header cell and
    /// `header_width` the cell's rendered width. A resize starts only inside
    /// the grab zone at the trailing edge; presses elsewhere return `false`
    /// and are left to the sort toggle. Ignored while any session is active.
    pub fn begin_resize(&self, key: &str, offset_x: f32, header_width: f32, pointer_x: f32) -> bool {
        self.update(|inner, services| {
            if inner.capture.is_some() {
                return false;
            }
            if !in_grab_zone(offset_x, header_width, services.config.grab_zone_px) {
                return false;
            }
            if !inner.layout.is_visible(key) || !services.catalog.is_permitted(key, &*inner.role) {
                return false;
            }
            let width = inner.layout.width_of(key, &services.catalog);
            let started = inner.resize.begin(key, pointer_x, width);
            if started {
                inner.capture = Some(PointerCapture::Resize);
                inner.resize_origin = inner.layout.column_widths().get(key).copied();
            }
            started
        })
    }

    /// Pointer moved during a resize.
    ///
    /// The new width goes into the layout and into every rendered cell of the
    /// column at once. Nothing is persisted until [`end_resize`](Self::end_resize).
    pub fn update_resize(&self, pointer_x: f32) -> Option<u32> {
        self.update(|inner, _| {
            let (key, width) = inner
                .resize
                .update(pointer_x)
                .map(|(key, width)| (key.to_string(), width))?;
            let width = inner.layout.set_width(key.as_str(), width);
            inner.rendered.apply_column_width(&key, width);
            Some(width)
        })
    }

    /// Ends the resize, releases the capture and persists widths once.
    ///
    /// Returns the final width, or `None` if no resize was active.
    pub async fn end_resize(&self) -> Option<u32> {
        let session = self.update(|inner, _| {
            if inner.capture == Some(PointerCapture::Resize) {
                inner.capture = None;
            }
            inner.resize_origin = None;
            inner.resize.end()
        })?;

        self.flush(&[LayoutSection::Widths]).await;
        Some(session.current_width)
    }
}
