//! Overlay state for a short text prompt (§4.7): currently used by the
//! `branch` handler to present the list of refnames, typed over rather than
//! fuzzy-filtered (the `options` field is kept for that future use, per the
//! spec's own note that it isn't consulted yet).

use super::{HandleResult, UiStateTrait};
use crate::app::Event;
use crate::input::Key;
use ratatui::{
    prelude::{Alignment, Buffer, Rect},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

pub struct InputModalState {
    contents: String,
    options: Vec<String>,
}

impl InputModalState {
    pub fn new(options: Vec<String>) -> Self {
        Self {
            contents: String::new(),
            options,
        }
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl UiStateTrait for InputModalState {
    fn paint(&self, area: Rect, buf: &mut Buffer) {
        let width = (self.contents.len() as u16 + 4).max(50);
        let height = 3u16.min(area.height);
        let width = width.min(area.width);

        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let popup = Rect { x, y, width, height };

        Clear.render(popup, buf);
        Paragraph::new(format!("{}\u{2588}", self.contents))
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("branch"),
            )
            .render(popup, buf);
    }

    fn handle(&mut self, event: &Event) -> HandleResult {
        let Event::Input(input) = event else {
            // Passive overlay: a fresh repo snapshot shouldn't be swallowed
            // just because the modal happens to be on top of the stack.
            return HandleResult::Pass;
        };

        match input.key {
            Key::Escape | Key::Enter => HandleResult::Pop,
            Key::Backspace => {
                self.contents.pop();
                HandleResult::Stop
            }
            _ => {
                if let Some(c) = input.printable_char() {
                    self.contents.push(c);
                    HandleResult::Stop
                } else {
                    HandleResult::Pass
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Input, Key};

    #[test]
    fn typing_then_enter_pops_with_contents_collected() {
        let mut modal = InputModalState::new(vec!["refs/heads/main".into()]);
        for c in ['f', 'o', 'o'] {
            let result = modal.handle(&Event::Input(Input::plain(Key::Char(c))));
            assert!(matches!(result, HandleResult::Stop));
        }
        assert_eq!(modal.contents(), "foo");

        let result = modal.handle(&Event::Input(Input::plain(Key::Enter)));
        assert!(matches!(result, HandleResult::Pop));
    }

    #[test]
    fn escape_pops_without_requiring_contents() {
        let mut modal = InputModalState::new(vec![]);
        let result = modal.handle(&Event::Input(Input::plain(Key::Escape)));
        assert!(matches!(result, HandleResult::Pop));
    }

    #[test]
    fn backspace_removes_last_char() {
        let mut modal = InputModalState::new(vec![]);
        modal.handle(&Event::Input(Input::plain(Key::Char('a'))));
        modal.handle(&Event::Input(Input::plain(Key::Char('b'))));
        modal.handle(&Event::Input(Input::plain(Key::Backspace)));
        assert_eq!(modal.contents(), "a");
    }

    #[test]
    fn repo_state_events_pass_through() {
        let mut modal = InputModalState::new(vec![]);
        let result = modal.handle(&Event::RepoState(Default::default()));
        assert!(matches!(result, HandleResult::Pass));
    }
}
