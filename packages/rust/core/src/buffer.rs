//! Side-channel output captured while a page is being built.
//!
//! Collaborators that emit text outside the page (warnings, debug output)
//! write into an [`OutputBuffer`]. When page content is read, anything
//! buffered is placed above the content so it is not lost.

use pagebuilder_shared::BufferMode;

/// Buffer for stray output produced during a request.
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    contents: String,
    active: bool,
    mode: BufferMode,
}

impl OutputBuffer {
    /// An armed buffer in the given mode.
    pub fn new(mode: BufferMode) -> Self {
        Self {
            contents: String::new(),
            active: true,
            mode,
        }
    }

    /// A buffer that is not capturing anything.
    pub fn inactive() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn mode(&self) -> BufferMode {
        self.mode
    }

    /// Append text. Ignored while inactive.
    pub fn write(&mut self, text: &str) {
        if self.active {
            self.contents.push_str(text);
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Put back output taken by a render that did not complete.
    pub fn restore(&mut self, contents: String) {
        if self.active {
            self.contents = contents;
        }
    }

    /// Prefix buffered output onto `content`.
    ///
    /// In [`BufferMode::Server`] the buffer is drained and stays armed; in
    /// [`BufferMode::Script`] the buffered text is left in place.
    pub fn prefix(&mut self, content: &str) -> String {
        if !self.active {
            return content.to_string();
        }
        let buffered = match self.mode {
            BufferMode::Server => std::mem::take(&mut self.contents),
            BufferMode::Script => self.contents.clone(),
        };
        if !buffered.is_empty() {
            tracing::debug!(bytes = buffered.len(), "prefixing buffered output onto content");
        }
        buffered + content
    }
}
