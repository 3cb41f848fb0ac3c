//! Data model produced by [`super::RepoModel::load`].

use std::path::PathBuf;

/// The two-character XY status, decoded to a closed enum per the
/// porcelain-v2 grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Unmodified,
    Modified,
    TypeChange,
    Added,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
}

impl ChangeType {
    pub fn from_char(c: char) -> Result<Self, crate::error::ParseError> {
        Ok(match c {
            '.' => ChangeType::Unmodified,
            'M' => ChangeType::Modified,
            'T' => ChangeType::TypeChange,
            'A' => ChangeType::Added,
            'D' => ChangeType::Deleted,
            'R' => ChangeType::Renamed,
            'C' => ChangeType::Copied,
            'U' => ChangeType::Unmerged,
            other => return Err(crate::error::ParseError::InvalidChangeType(other)),
        })
    }

    /// Short human-readable label used as [`FileEntry::status_name`].
    pub fn name(self) -> &'static str {
        match self {
            ChangeType::Unmodified => "unmodified",
            ChangeType::Modified => "modified",
            ChangeType::TypeChange => "type_change",
            ChangeType::Added => "added",
            ChangeType::Deleted => "deleted",
            ChangeType::Renamed => "renamed",
            ChangeType::Copied => "copied",
            ChangeType::Unmerged => "unmerged",
        }
    }
}

/// A single row in one of the three working-tree sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub status_name: String,
}

impl FileEntry {
    pub fn new(path: impl Into<PathBuf>, status_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status_name: status_name.into(),
        }
    }
}

/// One line of `git branch --format=...` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    pub is_head: bool,
    pub objectname: String,
    pub refname: String,
    pub subject: String,
    pub upstream: String,
}

/// The full view model: branch listing, raw status text, and the three
/// sorted-by-path working tree sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoState {
    pub branch_refs: Vec<BranchRef>,
    pub raw_status: String,
    pub branch_head: Option<String>,
    pub branch_upstream: Option<String>,
    pub staged: Vec<FileEntry>,
    pub unstaged: Vec<FileEntry>,
    pub untracked: Vec<FileEntry>,
}

impl RepoState {
    /// The `BranchRef` with `is_head == true`, if any.
    pub fn current_branch(&self) -> Option<&BranchRef> {
        self.branch_refs.iter().find(|b| b.is_head)
    }

    /// Inserts `entry` into `staged`, keeping it sorted by path. Used by
    /// the optimistic `stage` handler (§4.6).
    pub fn insert_staged_sorted(&mut self, entry: FileEntry) {
        let idx = self
            .staged
            .binary_search_by(|e| e.path.cmp(&entry.path))
            .unwrap_or_else(|idx| idx);
        self.staged.insert(idx, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_type_round_trips_through_name() {
        for (c, name) in [
            ('.', "unmodified"),
            ('M', "modified"),
            ('T', "type_change"),
            ('A', "added"),
            ('D', "deleted"),
            ('R', "renamed"),
            ('C', "copied"),
            ('U', "unmerged"),
        ] {
            assert_eq!(ChangeType::from_char(c).unwrap().name(), name);
        }
    }

    #[test]
    fn invalid_change_type_is_an_error() {
        assert!(ChangeType::from_char('?').is_err());
    }

    #[test]
    fn insert_staged_sorted_maintains_order() {
        let mut state = RepoState::default();
        state.insert_staged_sorted(FileEntry::new("b", "modified"));
        state.insert_staged_sorted(FileEntry::new("a", "added"));
        state.insert_staged_sorted(FileEntry::new("c", "modified"));

        let paths: Vec<_> = state.staged.iter().map(|e| e.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")]
        );
    }
}
