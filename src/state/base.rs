//! The root state of the stack (§4.6): owns the current [`RepoState`], the
//! [`UiState`] selection, the static chord bindings, and the job-queue
//! handle that handlers enqueue work onto.

use super::modal::InputModalState;
use super::{HandleResult, UiStateTrait};
use crate::app::Event;
use crate::input::{Input, Key};
use crate::input_map::{InputMap, InputMapNode};
use crate::jobs::Job;
use crate::queue::UnboundedQueue;
use crate::repo::{FileEntry, RepoModel, RepoState};
use crate::terminal::TerminalGuard;
use crate::ui::{Section, UiState};
use ratatui::{
    prelude::{Buffer, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use std::rc::Rc;
use std::sync::Arc;
use tracing::warn;

type Ctx = BaseState;
type Handler = Rc<dyn Fn(&mut Ctx) -> HandleResult>;

/// Root state: bindings table, current selection, current repo snapshot.
pub struct BaseState {
    input_map: InputMap<Ctx, HandleResult>,
    curr_input_map: Rc<InputMapNode<Ctx, HandleResult>>,

    repo_state: Option<RepoState>,
    ui_state: UiState,

    jobs: Arc<UnboundedQueue<Job>>,
    terminal_guard: Arc<TerminalGuard>,
    repo_model: Option<Arc<RepoModel>>,
}

impl BaseState {
    pub fn new(
        jobs: Arc<UnboundedQueue<Job>>,
        terminal_guard: Arc<TerminalGuard>,
        initial_repo_state: Option<RepoState>,
    ) -> Self {
        let mut input_map = InputMap::new();
        register_bindings(&mut input_map);
        let curr_input_map = input_map.root();

        Self {
            input_map,
            curr_input_map,
            repo_state: initial_repo_state,
            ui_state: UiState::default(),
            jobs,
            terminal_guard,
            repo_model: None,
        }
    }

    /// Lets the orchestrator hand over the shared [`RepoModel`] so the
    /// `branch` handler can load branch refs synchronously (§4.6).
    pub fn with_repo_model(mut self, repo_model: Arc<RepoModel>) -> Self {
        self.repo_model = Some(repo_model);
        self
    }

    fn reset_input_cursor(&mut self) {
        self.curr_input_map = self.input_map.root();
    }

    fn handle_input(&mut self, input: Input) -> HandleResult {
        let at_root = Rc::ptr_eq(&self.curr_input_map, &self.input_map.root());

        if input.key == Key::Escape && !at_root {
            self.reset_input_cursor();
            return HandleResult::Stop;
        }
        if matches!(input.key, Key::Escape)
            || input == Input::plain(Key::Char('q'))
            || input == Input::ctrl(Key::Char('c'))
        {
            return HandleResult::Exit;
        }

        match self.curr_input_map.get(&input) {
            None => {
                self.reset_input_cursor();
                HandleResult::Stop
            }
            Some(node) => {
                if let Some(handler) = node.handler().cloned() {
                    self.reset_input_cursor();
                    handler(self)
                } else {
                    self.curr_input_map = node;
                    HandleResult::Stop
                }
            }
        }
    }

    // ---- handler bodies, called through the trie's Rc<dyn Fn> cells ----

    fn arrow_up(&mut self) -> HandleResult {
        self.ui_state.move_up(self.repo_state.as_ref());
        HandleResult::Stop
    }

    fn arrow_down(&mut self) -> HandleResult {
        self.ui_state.move_down(self.repo_state.as_ref());
        HandleResult::Stop
    }

    fn toggle_expand(&mut self) -> HandleResult {
        self.ui_state.toggle_expand();
        HandleResult::Stop
    }

    /// Target paths for a `stage`/`unstage` invocation: the whole section
    /// at `pos == 0`, otherwise the single entry at `pos - 1` (§4.6).
    fn selected_targets<'a>(&self, entries: &'a [FileEntry]) -> Vec<&'a FileEntry> {
        if self.ui_state.pos == 0 {
            entries.iter().collect()
        } else {
            entries
                .get(self.ui_state.pos as usize - 1)
                .into_iter()
                .collect()
        }
    }

    fn stage(&mut self) -> HandleResult {
        let section = self.ui_state.section;
        if !matches!(section, Section::Untracked | Section::Unstaged) {
            return HandleResult::Stop;
        }
        let Some(repo) = self.repo_state.as_mut() else {
            return HandleResult::Stop;
        };

        let source = match section {
            Section::Untracked => &mut repo.untracked,
            Section::Unstaged => &mut repo.unstaged,
            _ => unreachable!(),
        };

        let targets: Vec<FileEntry> = if self.ui_state.pos == 0 {
            std::mem::take(source)
        } else {
            let idx = self.ui_state.pos as usize - 1;
            if idx < source.len() {
                vec![source.remove(idx)]
            } else {
                Vec::new()
            }
        };

        if targets.is_empty() {
            return HandleResult::Stop;
        }

        let mut paths = Vec::with_capacity(targets.len());
        for entry in targets {
            paths.push(entry.path.clone());
            // A deletion applied optimistically has no distinct "staged
            // deletion" placeholder in the source porcelain projection
            // rules, so this uses "modified" for anything that isn't a
            // brand-new file (see DESIGN.md's Open Questions).
            let status_name = if section == Section::Untracked {
                "added"
            } else {
                "modified"
            };
            repo.insert_staged_sorted(FileEntry::new(entry.path, status_name));
        }

        self.ui_state.clamp(self.repo_state.as_ref());
        self.jobs.put(Job::Stage(paths));
        HandleResult::Stop
    }

    fn unstage(&mut self) -> HandleResult {
        if self.ui_state.section != Section::Staged {
            return HandleResult::Stop;
        }
        let Some(repo) = self.repo_state.as_ref() else {
            return HandleResult::Stop;
        };

        let paths: Vec<_> = self
            .selected_targets(&repo.staged)
            .into_iter()
            .map(|e| e.path.clone())
            .collect();

        if paths.is_empty() {
            return HandleResult::Stop;
        }

        self.ui_state.clamp(self.repo_state.as_ref());
        self.jobs.put(Job::Unstage(paths));
        HandleResult::Stop
    }

    fn push(&mut self) -> HandleResult {
        let (remote, branch) = self
            .repo_state
            .as_ref()
            .and_then(|repo| repo.branch_upstream.as_ref())
            .and_then(|upstream| upstream.split_once('/'))
            .map(|(remote, branch)| (remote.to_string(), branch.to_string()))
            .unwrap_or_else(|| ("origin".to_string(), "main".to_string()));

        self.jobs.put(Job::Push { remote, branch });
        HandleResult::Stop
    }

    fn branch(&mut self) -> HandleResult {
        let Some(repo_model) = self.repo_model.clone() else {
            return HandleResult::Stop;
        };
        match repo_model.load() {
            Ok(state) => {
                let refnames = state.branch_refs.into_iter().map(|b| b.refname).collect();
                HandleResult::Push(Box::new(InputModalState::new(refnames)))
            }
            Err(e) => {
                warn!(error = %e, "branch load failed");
                HandleResult::Stop
            }
        }
    }

    fn commit(&mut self) -> HandleResult {
        let Some(repo_model) = self.repo_model.clone() else {
            return HandleResult::Stop;
        };
        let result = self
            .terminal_guard
            .yield_for(|| repo_model.runner().commit());

        match result {
            Ok(Err(e)) => warn!(error = %e, "commit failed or was aborted"),
            Err(e) => warn!(error = %e, "failed to yield terminal for commit"),
            Ok(Ok(())) => {}
        }

        self.jobs.put(Job::Refresh);
        HandleResult::Stop
    }

    fn paint_head(&self, area: Rect, buf: &mut Buffer) {
        let summary = self
            .repo_state
            .as_ref()
            .map(|repo| match (&repo.branch_head, repo.current_branch()) {
                (Some(head), _) => head.clone(),
                (None, Some(branch)) => branch.refname.clone(),
                (None, None) => "(no branch)".to_string(),
            })
            .unwrap_or_else(|| "loading...".to_string());

        let highlighted = self.ui_state.section == Section::Head;
        let style = if highlighted {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Cyan)
        };

        Paragraph::new(Line::from(Span::styled(summary, style)))
            .block(Block::default().borders(Borders::BOTTOM))
            .render(area, buf);
    }

    fn paint_section(
        &self,
        title: &str,
        entries: &[FileEntry],
        expanded: bool,
        section: Section,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let header_style = if self.ui_state.section == section && self.ui_state.pos == 0 {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        let marker = if expanded { "v" } else { ">" };
        let header = Line::from(Span::styled(
            format!("{marker} {title} ({})", entries.len()),
            header_style,
        ));

        let mut lines = vec![header];
        if expanded {
            for (i, entry) in entries.iter().enumerate() {
                let pos = (i + 1) as u32;
                let row_style = if self.ui_state.section == section && self.ui_state.pos == pos {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(
                    format!("  {:<10} {}", entry.status_name, entry.path.display()),
                    row_style,
                )));
            }
        }

        Paragraph::new(lines).render(area, buf);
    }
}

impl UiStateTrait for BaseState {
    fn paint(&self, area: Rect, buf: &mut Buffer) {
        let Some(repo) = self.repo_state.as_ref() else {
            Paragraph::new("loading repository...").render(area, buf);
            return;
        };

        let head_height = 2u16;
        let remaining = area.height.saturating_sub(head_height);
        let third = remaining / 3;

        let head_area = Rect {
            height: head_height.min(area.height),
            ..area
        };
        self.paint_head(head_area, buf);

        let mut y = area.y + head_area.height;
        let sections: [(&str, &[FileEntry], bool, Section); 3] = [
            ("Untracked", &repo.untracked, self.ui_state.untracked_expanded, Section::Untracked),
            ("Unstaged", &repo.unstaged, self.ui_state.unstaged_expanded, Section::Unstaged),
            ("Staged", &repo.staged, self.ui_state.staged_expanded, Section::Staged),
        ];

        for (i, (title, entries, expanded, section)) in sections.into_iter().enumerate() {
            let height = if i == 2 {
                area.height.saturating_sub(y - area.y)
            } else {
                third
            };
            let section_area = Rect {
                x: area.x,
                y,
                width: area.width,
                height,
            };
            self.paint_section(title, entries, expanded, section, section_area, buf);
            y += height;
        }
    }

    fn handle(&mut self, event: &Event) -> HandleResult {
        match event {
            Event::Input(input) => self.handle_input(*input),
            Event::RepoState(new_state) => {
                self.repo_state = Some(new_state.clone());
                HandleResult::Stop
            }
        }
    }
}

fn register_bindings(input_map: &mut InputMap<Ctx, HandleResult>) {
    input_map.add(&[Input::plain(Key::Up)], Rc::new(BaseState::arrow_up) as Handler);
    input_map.add(&[Input::plain(Key::Down)], Rc::new(BaseState::arrow_down));
    input_map.add(&[Input::plain(Key::Tab)], Rc::new(BaseState::toggle_expand));
    input_map.add(&[Input::plain(Key::Char('s'))], Rc::new(BaseState::stage));
    input_map.add(&[Input::plain(Key::Char('u'))], Rc::new(BaseState::unstage));
    input_map.add(&[Input::plain(Key::Char('p'))], Rc::new(BaseState::push));
    input_map.add(&[Input::plain(Key::Char('b'))], Rc::new(BaseState::branch));
    input_map.add(
        &[Input::plain(Key::Char('c')), Input::plain(Key::Char('c'))],
        Rc::new(BaseState::commit),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::FileEntry;

    fn base_with(repo: Option<RepoState>) -> BaseState {
        // `TerminalGuard` is a zero-sized marker; its real side effects live
        // in `TerminalGuard::new` (raw mode) and `Drop` (best-effort
        // restore, which swallows its own errors), so constructing the bare
        // unit struct here never touches a real terminal mode.
        BaseState::new(Arc::new(UnboundedQueue::new()), Arc::new(TerminalGuard), repo)
    }

    fn repo_with_untracked(paths: &[&str]) -> RepoState {
        RepoState {
            untracked: paths
                .iter()
                .map(|p| FileEntry::new(*p, "untracked"))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn chord_reset_on_escape_does_not_exit() {
        let mut base = base_with(None);
        let c = Input::plain(Key::Char('c'));
        assert!(matches!(base.handle_input(c), HandleResult::Stop));
        assert!(!Rc::ptr_eq(&base.curr_input_map, &base.input_map.root()));

        let result = base.handle_input(Input::plain(Key::Escape));
        assert!(matches!(result, HandleResult::Stop));
        assert!(Rc::ptr_eq(&base.curr_input_map, &base.input_map.root()));
    }

    #[test]
    fn q_exits_from_root() {
        let mut base = base_with(None);
        assert!(matches!(
            base.handle_input(Input::plain(Key::Char('q'))),
            HandleResult::Exit
        ));
    }

    #[test]
    fn optimistic_stage_moves_entry_and_enqueues_job() {
        let mut base = base_with(Some(repo_with_untracked(&["b", "a"])));
        base.repo_state.as_mut().unwrap().untracked.sort_by(|a, b| a.path.cmp(&b.path));
        base.ui_state.section = Section::Untracked;
        base.ui_state.pos = 1;

        base.stage();

        let repo = base.repo_state.as_ref().unwrap();
        assert_eq!(repo.untracked.len(), 1);
        assert_eq!(repo.untracked[0].path.to_str(), Some("b"));
        assert_eq!(repo.staged.len(), 1);
        assert_eq!(repo.staged[0].path.to_str(), Some("a"));
        assert_eq!(repo.staged[0].status_name, "added");
    }
}
