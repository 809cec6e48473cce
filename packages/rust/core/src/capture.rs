//! Capture mode: keep the built page instead of rendering it.
//!
//! Embedding callers that need to defer rendering enable capture on their
//! render context, run the page code, then pull the stored page back out.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::page::PageModel;

/// A page stored by capture mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapturedPage {
    pub page: PageModel,
    pub captured_at: DateTime<Utc>,
}

/// Holds at most one captured page plus the capture toggle.
#[derive(Debug, Clone, Default)]
pub struct CaptureRegistry {
    capturing: bool,
    stored: Option<CapturedPage>,
}

impl CaptureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_capture_mode(&mut self, enabled: bool) {
        tracing::debug!(enabled, "capture mode toggled");
        self.capturing = enabled;
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Store `page`, replacing anything stored earlier.
    pub fn store(&mut self, page: PageModel) {
        self.stored = Some(CapturedPage {
            page,
            captured_at: Utc::now(),
        });
    }

    /// The last captured page. Turns capture mode off when
    /// `reset_capture_mode` is set.
    pub fn get_stored(&mut self, reset_capture_mode: bool) -> Option<&CapturedPage> {
        if reset_capture_mode {
            self.capturing = false;
        }
        self.stored.as_ref()
    }

    /// Remove and return the captured page.
    pub fn take_stored(&mut self, reset_capture_mode: bool) -> Option<CapturedPage> {
        if reset_capture_mode {
            self.capturing = false;
        }
        self.stored.take()
    }
}
