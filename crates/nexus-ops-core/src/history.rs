use serde::Serialize;

/// Recall buffer for previously entered console lines.
///
/// The cursor lives in `[0, len]`; `len` means "past the newest entry",
/// where recall yields nothing and the input line shows empty.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ShellHistory {
    entries: Vec<String>,
    cursor: usize,
}

impl ShellHistory {
    /// Append an entered line and reset the cursor past the newest entry.
    pub fn push(&mut self, line: &str) {
        self.entries.push(line.to_string());
        self.cursor = self.entries.len();
    }

    /// Step toward older entries. Saturates at the oldest.
    pub fn previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step toward newer entries; past the newest, recall is empty.
    pub fn next(&mut self) -> Option<&str> {
        if self.cursor < self.entries.len() {
            self.cursor += 1;
        }
        self.entries.get(self.cursor).map(String::as_str)
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

    fn filled() -> ShellHistory {
        let mut h = ShellHistory::default();
        h.push("c1");
        h.push("c2");
        h.push("c3");
        h
    }

    #[test]
    fn recall_walks_back_then_forward() {
        let mut h = filled();
        assert_eq!(h.previous(), Some("c3"));
        assert_eq!(h.previous(), Some("c2"));
        assert_eq!(h.next(), Some("c3"));
        assert_eq!(h.next(), None, "past the newest entry recall is empty");
        assert_eq!(h.next(), None);
    }

    #[test]
    fn previous_saturates_at_oldest() {
        let mut h = filled();
        for _ in 0..10 {
            h.previous();
        }
        assert_eq!(h.previous(), Some("c1"));
    }

    #[test]
    fn empty_history_recalls_nothing() {
        let mut h = ShellHistory::default();
        assert_eq!(h.previous(), None);
        assert_eq!(h.next(), None);
    }

    #[test]
    fn push_resets_cursor() {
        let mut h = filled();
        h.previous();
        h.previous();
        h.push("c4");
        assert_eq!(h.previous(), Some("c4"));
    }
}
