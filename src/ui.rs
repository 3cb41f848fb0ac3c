//! Cursor/section/expansion selection state and its navigation invariants
//! (§4.5). Kept free of any painting or I/O concern so its properties can
//! be tested in isolation.

use crate::repo::RepoState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Head,
    Untracked,
    Unstaged,
    Staged,
}

impl Section {
    fn next(self) -> Option<Section> {
        match self {
            Section::Head => Some(Section::Untracked),
            Section::Untracked => Some(Section::Unstaged),
            Section::Unstaged => Some(Section::Staged),
            Section::Staged => None,
        }
    }

    fn prev(self) -> Option<Section> {
        match self {
            Section::Head => None,
            Section::Untracked => Some(Section::Head),
            Section::Unstaged => Some(Section::Untracked),
            Section::Staged => Some(Section::Unstaged),
        }
    }
}

/// Current cursor position and per-section expansion flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub pos: u32,
    pub section: Section,
    pub untracked_expanded: bool,
    pub unstaged_expanded: bool,
    pub staged_expanded: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            pos: 0,
            section: Section::Head,
            untracked_expanded: true,
            unstaged_expanded: true,
            staged_expanded: true,
        }
    }
}

impl UiState {
    fn is_expanded(&self, section: Section) -> bool {
        match section {
            Section::Head => true,
            Section::Untracked => self.untracked_expanded,
            Section::Unstaged => self.unstaged_expanded,
            Section::Staged => self.staged_expanded,
        }
    }

    /// `len` is the number of entries in `section` given the current
    /// `RepoState` — `0` when `repo` is `None` (no data to navigate yet).
    fn len(&self, section: Section, repo: Option<&RepoState>) -> u32 {
        let Some(repo) = repo else { return 0 };
        match section {
            Section::Head => 0,
            Section::Untracked => repo.untracked.len() as u32,
            Section::Unstaged => repo.unstaged.len() as u32,
            Section::Staged => repo.staged.len() as u32,
        }
    }

    fn max_pos(&self, section: Section, repo: Option<&RepoState>) -> u32 {
        if self.is_expanded(section) {
            self.len(section, repo)
        } else {
            0
        }
    }

    pub fn move_down(&mut self, repo: Option<&RepoState>) {
        if self.section == Section::Head {
            self.section = Section::Untracked;
            self.pos = 0;
            return;
        }

        if self.pos == self.max_pos(self.section, repo) {
            let Some(next) = self.section.next() else {
                return;
            };
            self.section = next;
            self.pos = 0;
        } else {
            self.pos += 1;
        }
    }

    pub fn move_up(&mut self, repo: Option<&RepoState>) {
        if self.pos == 0 {
            let Some(prev) = self.section.prev() else {
                return;
            };
            self.section = prev;
            self.pos = self.max_pos(prev, repo);
        } else {
            self.pos -= 1;
        }
    }

    pub fn toggle_expand(&mut self) {
        let flag = match self.section {
            Section::Head => return,
            Section::Untracked => &mut self.untracked_expanded,
            Section::Unstaged => &mut self.unstaged_expanded,
            Section::Staged => &mut self.staged_expanded,
        };
        *flag = !*flag;
        if !*flag {
            self.pos = 0;
        }
    }

    /// Clamps `pos` to `max_pos` after a source list shrinks (§4.6 stage /
    /// unstage).
    pub fn clamp(&mut self, repo: Option<&RepoState>) {
        let max = self.max_pos(self.section, repo);
        if self.pos > max {
            self.pos = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::FileEntry;

    fn repo_with(untracked: usize, unstaged: usize, staged: usize) -> RepoState {
        RepoState {
            untracked: (0..untracked)
                .map(|i| FileEntry::new(format!("u{i}"), "untracked"))
                .collect(),
            unstaged: (0..unstaged)
                .map(|i| FileEntry::new(format!("w{i}"), "modified"))
                .collect(),
            staged: (0..staged)
                .map(|i| FileEntry::new(format!("s{i}"), "modified"))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn toggle_expand_collapsing_resets_pos_to_zero() {
        let mut ui = UiState {
            section: Section::Staged,
            pos: 2,
            ..Default::default()
        };
        ui.toggle_expand();
        assert!(!ui.staged_expanded);
        assert_eq!(ui.pos, 0);
    }

    #[test]
    fn head_ignores_toggle() {
        let mut ui = UiState::default();
        let before = ui.clone();
        ui.toggle_expand();
        assert_eq!(ui, before);
    }

    #[test]
    fn move_down_walks_through_every_section_to_the_end() {
        let repo = repo_with(2, 1, 3);
        let mut ui = UiState::default();
        let total_entries = 2 + 1 + 3;

        for _ in 0..(1 + total_entries) {
            ui.move_down(Some(&repo));
        }

        assert_eq!(ui.section, Section::Staged);
        assert_eq!(ui.pos, 3);

        // further downs are idempotent
        ui.move_down(Some(&repo));
        assert_eq!(ui.section, Section::Staged);
        assert_eq!(ui.pos, 3);
    }

    #[test]
    fn navigation_wraparound_scenario() {
        let repo = repo_with(0, 1, 0);
        let mut ui = UiState::default();
        assert_eq!(ui.section, Section::Head);
        assert_eq!(ui.pos, 0);

        for _ in 0..4 {
            ui.move_down(Some(&repo));
        }
        assert_eq!(ui.section, Section::Staged);
        assert_eq!(ui.pos, 0);

        ui.move_up(Some(&repo));
        assert_eq!(ui.section, Section::Unstaged);
        assert_eq!(ui.pos, 1);
    }

    #[test]
    fn move_up_at_head_floor_is_a_no_op() {
        let mut ui = UiState::default();
        ui.move_up(None);
        assert_eq!(ui.section, Section::Head);
        assert_eq!(ui.pos, 0);
    }

    #[test]
    fn move_up_then_down_is_identity_away_from_floor_and_ceiling() {
        let repo = repo_with(2, 2, 2);
        let mut ui = UiState::default();
        ui.move_down(Some(&repo));
        ui.move_down(Some(&repo));
        let before = ui.clone();

        ui.move_down(Some(&repo));
        ui.move_up(Some(&repo));
        assert_eq!(ui, before);
    }

    #[test]
    fn clamp_pulls_pos_back_within_shrunken_section() {
        let mut ui = UiState {
            section: Section::Staged,
            pos: 3,
            ..Default::default()
        };
        let repo = repo_with(0, 0, 1);
        ui.clamp(Some(&repo));
        assert_eq!(ui.pos, 1);
    }
}
