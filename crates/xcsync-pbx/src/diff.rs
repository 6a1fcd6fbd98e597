//! Line diffs between two renderings of a manifest

use serde::Serialize;
use similar::ChangeTag;

/// Lines added and removed, plus the unified diff text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextDiff {
    pub inserted: usize,
    pub deleted: usize,
    pub unified: String,
}

impl TextDiff {
    pub fn between(old: &str, new: &str, label: &str) -> Self {
        let diff = similar::TextDiff::from_lines(old, new);
        let mut inserted = 0;
        let mut deleted = 0;
        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => inserted += 1,
                ChangeTag::Delete => deleted += 1,
                ChangeTag::Equal => {}
            }
        }
        Self {
            inserted,
            deleted,
            unified: unified_diff(old, new, label),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }
}

/// Unified diff with three lines of context; empty when the texts are equal.
pub fn unified_diff(old: &str, new: &str, label: &str) -> String {
    if old == new {
        return String::new();
    }
    similar::TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{label}"), &format!("b/{label}"))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_changed_lines() {
        let diff = TextDiff::between("a\nb\nc\n", "a\nB\nc\nd\n", "project.pbxproj");
        assert_eq!(diff.inserted, 2);
        assert_eq!(diff.deleted, 1);
        assert!(diff.unified.contains("--- a/project.pbxproj"));
        assert!(diff.unified.contains("+d"));
    }

    #[test]
    fn equal_texts_have_empty_diff() {
        let diff = TextDiff::between("same\n", "same\n", "x");
        assert!(diff.is_empty());
        assert!(diff.unified.is_empty());
    }
}
