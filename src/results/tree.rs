//! Note tree types
//!
//! A test's outcome is a tree: leaves are notes, inner nodes are named
//! sections opened around composite checks.

use serde::Serialize;

/// One atomic pass/fail outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Note {
    pub passed: bool,
    pub message: String,
}

/// A node in the note tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    Note(Note),
    Section(Section),
}

/// A named group of entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    pub header: String,
    pub entries: Vec<Entry>,
}

impl Section {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            entries: Vec::new(),
        }
    }

    /// Append a note to this section
    pub fn push_note(&mut self, passed: bool, message: impl Into<String>) {
        self.entries.push(Entry::Note(Note {
            passed,
            message: message.into(),
        }));
    }

    /// Append an empty child section and return its index among the entries
    pub fn push_section(&mut self, header: impl Into<String>) -> usize {
        self.entries.push(Entry::Section(Section::new(header)));
        self.entries.len() - 1
    }

    /// Follow a path of entry indices down to a nested section
    ///
    /// Returns `None` if any index is out of range or names a note.
    pub fn descend_mut(&mut self, path: &[usize]) -> Option<&mut Section> {
        let mut section = self;
        for &idx in path {
            section = match section.entries.get_mut(idx)? {
                Entry::Section(child) => child,
                Entry::Note(_) => return None,
            };
        }
        Some(section)
    }

    /// All leaf notes below this section, depth-first
    pub fn notes(&self) -> Vec<&Note> {
        let mut out = Vec::new();
        self.collect_notes(&mut out);
        out
    }

    fn collect_notes<'a>(&'a self, out: &mut Vec<&'a Note>) {
        for entry in &self.entries {
            match entry {
                Entry::Note(note) => out.push(note),
                Entry::Section(section) => section.collect_notes(out),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descend_into_nested_sections() {
        let mut root = Section::default();
        root.push_note(true, "first");
        let outer = root.push_section("outer");
        let inner = root
            .descend_mut(&[outer])
            .unwrap()
            .push_section("inner");
        root.descend_mut(&[outer, inner])
            .unwrap()
            .push_note(false, "deep");

        assert_eq!(outer, 1);
        assert_eq!(inner, 0);
        let messages: Vec<_> = root.notes().iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "deep"]);
    }

    #[test]
    fn test_descend_rejects_bad_paths() {
        let mut root = Section::default();
        root.push_note(true, "leaf");
        assert!(root.descend_mut(&[0]).is_none());
        assert!(root.descend_mut(&[3]).is_none());
        assert!(root.descend_mut(&[]).is_some());
    }
}
