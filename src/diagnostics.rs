//! Diagnostics sink.
//!
//! Messages are appended in encounter order and printed in reverse of
//! storage order: producers prepend, so reversing on flush restores
//! chronological order. After printing, the queue is cleared. Severity
//! coloring follows `foundry_compilers::artifacts::error::Severity`.

use std::fmt;
use yansi::{Color, Paint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    Info,
}

impl Severity {
    pub const fn is_error(&self) -> bool {
        matches!(self, Severity::Error)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    pub const fn color(&self) -> Color {
        match self {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Blue,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source position, or the null position used for input-resolution errors
/// that cannot be attributed to a line in a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const NULL: Position = Position { line: 0, column: 0 };

    pub fn is_null(&self) -> bool {
        *self == Position::NULL
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            Ok(())
        } else {
            write!(f, "{}:{}: ", self.line, self.column)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Message {
    pub severity: Severity,
    pub position: Position,
    pub text: String,
}

impl Message {
    pub fn error(position: Position, text: impl Into<String>) -> Self {
        Message { severity: Severity::Error, position, text: text.into() }
    }

    pub fn warning(position: Position, text: impl Into<String>) -> Self {
        Message { severity: Severity::Warning, position, text: text.into() }
    }

    pub fn info(position: Position, text: impl Into<String>) -> Self {
        Message { severity: Severity::Info, position, text: text.into() }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}: {}",
            self.position,
            Paint::new(self.severity.as_str()).fg(self.severity.color()),
            self.text
        )
    }
}

/// `sub.messages` + `sub.numErrors` from the compiler state, factored out so
/// it can be unit tested independently of `CompilerState`.
#[derive(Debug, Default)]
pub struct MessageSink {
    /// Most-recently-appended message is first.
    messages: Vec<Message>,
    num_errors: usize,
}

impl MessageSink {
    pub fn push(&mut self, message: Message) {
        if message.severity.is_error() {
            self.num_errors += 1;
        }
        messages_prepend(&mut self.messages, message);
    }

    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    pub fn has_errors(&self) -> bool {
        self.num_errors > 0
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Drains all pending messages in chronological (production) order,
    /// i.e. the reverse of how they are stored, and clears the queue.
    pub fn drain_in_order(&mut self) -> Vec<Message> {
        let mut drained = std::mem::take(&mut self.messages);
        drained.reverse();
        drained
    }

    /// Prints and clears all pending messages to `sink`. Used by the pass
    /// runner outside IDE mode.
    pub fn flush_to(&mut self, sink: &mut dyn std::io::Write) {
        for message in self.drain_in_order() {
            let _ = writeln!(sink, "{message}");
        }
    }
}

fn messages_prepend(messages: &mut Vec<Message>, message: Message) {
    messages.insert(0, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invariant_num_errors_matches_error_messages() {
        let mut sink = MessageSink::default();
        sink.push(Message::warning(Position::NULL, "w1"));
        sink.push(Message::error(Position::NULL, "e1"));
        sink.push(Message::error(Position::NULL, "e2"));
        assert_eq!(sink.num_errors(), 2);
        assert!(sink.has_errors());
    }

    #[test]
    fn drain_restores_chronological_order() {
        let mut sink = MessageSink::default();
        sink.push(Message::info(Position::NULL, "first"));
        sink.push(Message::info(Position::NULL, "second"));
        sink.push(Message::info(Position::NULL, "third"));
        let drained = sink.drain_in_order();
        let texts: Vec<_> = drained.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert!(sink.is_empty());
    }

    #[test]
    fn drain_clears_the_queue() {
        let mut sink = MessageSink::default();
        sink.push(Message::error(Position::NULL, "only"));
        let _ = sink.drain_in_order();
        assert!(sink.drain_in_order().is_empty());
    }
}
