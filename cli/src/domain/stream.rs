//! Line-splitting stream transform.
//!
//! Bytes arrive in arbitrary chunks; each complete line is shown to a
//! callback, which decides whether the line is forwarded or swallowed.
//! Forwarded lines keep their exact bytes, terminator included, and leave
//! in arrival order. A trailing partial line is released by [`LineFilter::finish`].

/// Verdict for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction {
    Forward,
    Suppress,
}

/// Stateful splitter wrapping a per-line callback.
///
/// The callback receives the line without its `\n` / `\r\n` terminator,
/// decoded lossily as UTF-8.
pub struct LineFilter<F> {
    pending: Vec<u8>,
    on_line: F,
}

impl<F> LineFilter<F>
where
    F: FnMut(&str) -> LineAction,
{
    pub fn new(on_line: F) -> Self {
        Self {
            pending: Vec::new(),
            on_line,
        }
    }

    /// Feed a chunk; returns the bytes to pass downstream now.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<u8> {
        self.pending.extend_from_slice(chunk);
        let mut out = Vec::new();
        let mut start = 0;
        loop {
            let Some(offset) = self.pending[start..].iter().position(|&b| b == b'\n') else {
                break;
            };
            let end = start + offset + 1;
            self.emit(start, end, &mut out);
            start = end;
        }
        self.pending.drain(..start);
        out
    }

    /// Flush whatever is left once the stream has ended.
    pub fn finish(&mut self) -> Vec<u8> {
        let mut out = Vec::new();
        if !self.pending.is_empty() {
            self.emit(0, self.pending.len(), &mut out);
            self.pending.clear();
        }
        out
    }

    fn emit(&mut self, start: usize, end: usize, out: &mut Vec<u8>) {
        let raw = &self.pending[start..end];
        let text = String::from_utf8_lossy(strip_terminator(raw));
        if (self.on_line)(&text) == LineAction::Forward {
            out.extend_from_slice(raw);
        }
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
