//! Output sinks for reconstructed page text.

/// Receives emitted text in order.
pub trait EmitSink {
    /// Append a piece of text.
    fn emit(&mut self, text: &str);
}

impl EmitSink for String {
    fn emit(&mut self, text: &str) {
        self.push_str(text);
    }
}

impl<S: EmitSink + ?Sized> EmitSink for &mut S {
    fn emit(&mut self, text: &str) {
        (**self).emit(text);
    }
}

/// Sink that keeps every emitted piece separately.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    /// Emitted pieces, in order
    pub pieces: Vec<String>,
}

impl Recorder {
    /// Concatenation of every piece.
    pub fn joined(&self) -> String {
        self.pieces.concat()
    }
}

impl EmitSink for Recorder {
    fn emit(&mut self, text: &str) {
        self.pieces.push(text.to_string());
    }
}
