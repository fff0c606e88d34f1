//! Text sinks for the reconstructor.

/// Receives reconstructed source a fragment at a time.
pub trait Emitter {
    /// Emit a text fragment.
    fn emit(&mut self, text: &str);

    /// End the current line with `\n`.
    fn emit_newline(&mut self);

    /// Indent by `level` blocks.
    fn emit_indent(&mut self, level: usize);
}

/// Collects output in memory.
#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
    indent_size: usize,
}

impl StringEmitter {
    pub fn new(indent_size: usize) -> Self {
        StringEmitter {
            buffer: String::new(),
            indent_size,
        }
    }

    /// Get the output.
    pub fn output(self) -> String {
        self.buffer
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Ensure non-empty output ends with a single newline.
    pub fn ensure_trailing_newline(&mut self) {
        while self.buffer.ends_with("\n\n") {
            self.buffer.pop();
        }
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, level: usize) {
        for _ in 0..level * self.indent_size {
            self.buffer.push(' ');
        }
    }
}
