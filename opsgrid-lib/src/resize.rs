//! Pointer-drag column resizing.

use crate::catalog::MIN_COLUMN_WIDTH;

/// Width of the grab zone at the trailing edge of a header, in pixels.
pub const DEFAULT_GRAB_ZONE: f32 = 6.0;

/// Returns `true` if a pointer-down at `offset_x` (relative to the header's
/// left edge) falls inside the trailing grab zone.
///
/// Presses anywhere else on the header belong to the sort toggle.
pub fn in_grab_zone(offset_x: f32, header_width: f32, zone: f32) -> bool {
    offset_x <= header_width && offset_x >= header_width - zone
}

/// Width after dragging from `start_x` to `pointer_x`, never below the floor.
pub fn resized_width(start_width: u32, start_x: f32, pointer_x: f32) -> u32 {
    let width = start_width as f32 + (pointer_x - start_x);
    width.round().max(MIN_COLUMN_WIDTH as f32) as u32
}

/// An active resize drag.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    /// Column being resized.
    pub key: String,
    /// Pointer x at drag start.
    pub start_x: f32,
    /// Column width at drag start.
    pub start_width: u32,
    /// Width after the last pointer move.
    pub current_width: u32,
}

/// Resize state.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResizeState {
    /// No resize in progress.
    #[default]
    Idle,
    /// A column edge is being dragged.
    Resizing(ResizeSession),
}

/// State machine for one resize: `idle -> resizing -> idle`.
#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    state: ResizeState,
}

impl ResizeController {
    /// Creates an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &ResizeState {
        &self.state
    }

    /// Returns `true` while a resize is in progress.
    pub fn is_resizing(&self) -> bool {
        matches!(self.state, ResizeState::Resizing(_))
    }

    /// The active session, if any.
    pub fn session(&self) -> Option<&ResizeSession> {
        match &self.state {
            ResizeState::Resizing(session) => Some(session),
            ResizeState::Idle => None,
        }
    }

    /// Starts resizing. Ignored while another resize is active.
    pub fn begin(&mut self, key: &str, pointer_start_x: f32, current_width: u32) -> bool {
        if self.is_resizing() {
            return false;
        }
        log::debug!("resize start: {} at {}px", key, current_width);
        let width = current_width.max(MIN_COLUMN_WIDTH);
        self.state = ResizeState::Resizing(ResizeSession {
            key: key.to_string(),
            start_x: pointer_start_x,
            start_width: width,
            current_width: width,
        });
        true
    }

    /// Applies a pointer move. Returns the column key and its new width.
    pub fn update(&mut self, pointer_x: f32) -> Option<(&str, u32)> {
        let ResizeState::Resizing(session) = &mut self.state else {
            return None;
        };
        session.current_width = resized_width(session.start_width, session.start_x, pointer_x);
        log::trace!("resize {} -> {}px", session.key, session.current_width);
        Some((session.key.as_str(), session.current_width))
    }

    /// Ends the drag, returning the completed session.
    pub fn end(&mut self) -> Option<ResizeSession> {
        match std::mem::take(&mut self.state) {
            ResizeState::Resizing(session) => {
                log::debug!("resize end: {} at {}px", session.key, session.current_width);
                Some(session)
            }
            ResizeState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grab_zone_is_trailing_edge() {
        assert!(in_grab_zone(118.0, 120.0, DEFAULT_GRAB_ZONE));
        assert!(in_grab_zone(114.0, 120.0, DEFAULT_GRAB_ZONE));
        assert!(!in_grab_zone(113.0, 120.0, DEFAULT_GRAB_ZONE));
        assert!(!in_grab_zone(10.0, 120.0, DEFAULT_GRAB_ZONE));
        assert!(!in_grab_zone(121.0, 120.0, DEFAULT_GRAB_ZONE));
    }

    #[test]
    fn test_width_never_below_floor() {
        assert_eq!(resized_width(120, 300.0, 340.0), 160);
        assert_eq!(resized_width(120, 300.0, 250.0), 70);
        assert_eq!(resized_width(120, 300.0, 0.0), MIN_COLUMN_WIDTH);
        for pointer in (0..600).step_by(7) {
            assert!(resized_width(60, 300.0, pointer as f32) >= MIN_COLUMN_WIDTH);
        }
    }

    #[test]
    fn test_second_begin_is_ignored() {
        let mut controller = ResizeController::new();
        assert!(controller.begin("amount", 100.0, 120));
        assert!(!controller.begin("date", 10.0, 80));
        assert_eq!(controller.update(130.0), Some(("amount", 150)));
        let session = controller.end().expect("session");
        assert_eq!(session.current_width, 150);
        assert!(controller.end().is_none());
        assert!(controller.update(10.0).is_none());
    }
}
