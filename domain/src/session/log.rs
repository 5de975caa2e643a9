//! Append-only transcript

use super::entities::{Message, NewMessage};
use chrono::Utc;

/// Append-only, strictly ordered record of exchanged messages.
///
/// The log is the single source of truth for the transcript. Entries are
/// never reordered, edited or removed; `sequence` numbers are contiguous and
/// start at 0.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `message` under the next sequence number and return the stored record.
    pub fn append(&mut self, message: NewMessage) -> &Message {
        let sequence = self.entries.len() as u64;
        self.entries.push(Message {
            role: message.role,
            content: message.content,
            sequence,
            received_at: Utc::now(),
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All messages in append order.
    ///
    /// The slice only reflects appends made before the call; it can be taken
    /// again at any time.
    pub fn all(&self) -> &[Message] {
        &self.entries
    }

    pub fn last(&self) -> Option<&Message> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::entities::Role;

    #[test]
    fn test_append_assigns_contiguous_sequence() {
        let mut log = MessageLog::new();
        assert_eq!(log.append(NewMessage::user("a")).sequence, 0);
        assert_eq!(log.append(NewMessage::assistant("b")).sequence, 1);
        assert_eq!(log.append(NewMessage::user("c")).sequence, 2);
    }

    #[test]
    fn test_all_preserves_call_order() {
        let mut log = MessageLog::new();
        let contents = ["first", "second", "third", "fourth"];
        for (i, c) in contents.iter().enumerate() {
            if i % 2 == 0 {
                log.append(NewMessage::user(*c));
            } else {
                log.append(NewMessage::assistant(*c));
            }
        }

        let all = log.all();
        assert_eq!(all.len(), 4);
        for (i, message) in all.iter().enumerate() {
            assert_eq!(message.content, contents[i]);
            assert_eq!(message.sequence, i as u64);
        }
        assert!(all.windows(2).all(|w| w[0].sequence < w[1].sequence));
    }

    #[test]
    fn test_prior_entries_never_change() {
        let mut log = MessageLog::new();
        log.append(NewMessage::user("Hello"));
        let before = log.all().to_vec();

        log.append(NewMessage::assistant("Hi there"));
        log.append(NewMessage::user("Bye"));

        assert_eq!(&log.all()[..1], &before[..]);
    }

    #[test]
    fn test_all_is_restartable() {
        let mut log = MessageLog::new();
        log.append(NewMessage::user("q"));
        let first: Vec<_> = log.all().iter().map(|m| m.content.clone()).collect();
        let second: Vec<_> = log.all().iter().map(|m| m.content.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_log() {
        let log = MessageLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
        assert!(log.last().is_none());
        assert!(log.all().is_empty());
    }

    #[test]
    fn test_last_returns_latest_entry() {
        let mut log = MessageLog::new();
        log.append(NewMessage::user("q"));
        log.append(NewMessage::assistant("a"));
        let last = log.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "a");
    }
}
