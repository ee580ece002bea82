use std::time::Instant;

use ac_base::agents::InputField;
use ac_base::error::ActionError;
use ac_mod_api::HelperAction;

use crate::app::App;
use crate::state::{Focus, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    FocusNext,
    FocusPrev,
    ToggleCategory,
    CycleName(bool),
    InsertChar(char),
    Backspace,
    PasteText(String),
    ClearFields,
    Submit,
    GenerateVoice,
    Deploy,
    StartNgrokServer,
    StartMidjourneyServer,
    RunNgrok,
    RunMidjourney,
    ToggleGallery,
    GalleryNext,
    GalleryPrev,
    GallerySelect(usize),
    ScrollConsole(i16),
    DismissNotification,
}

impl App {
    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::None => return,
            Action::FocusNext => self.ui.focus_next(&self.form.rules()),
            Action::FocusPrev => self.ui.focus_prev(&self.form.rules()),
            Action::ToggleCategory => {
                let next = self.form.category().toggled();
                self.form.select_category(&self.catalog, next);
                self.ui.fix_focus(&self.form.rules());
                self.persist();
            }
            Action::CycleName(forward) => {
                self.form.cycle_name(forward);
                self.ui.fix_focus(&self.form.rules());
                self.persist();
            }
            Action::InsertChar(c) => self.edit_focused(|value| value.push(c)),
            Action::Backspace => self.edit_focused(|value| {
                value.pop();
            }),
            Action::PasteText(text) => {
                // Single-line fields
                let flat = text.replace('\n', " ");
                self.edit_focused(|value| value.push_str(&flat));
            }
            Action::ClearFields => {
                self.form.clear_fields();
                self.console.info("Form fields cleared");
                self.persist();
            }
            Action::Submit => self.submit(),
            Action::GenerateVoice => {
                let action = HelperAction::generate_voice(self.form.last_result());
                self.start_helper(action);
            }
            Action::Deploy => {
                let action = HelperAction::deploy(self.form.last_result());
                self.start_helper(action);
            }
            Action::StartNgrokServer => {
                let command = self.settings.servers.ngrok.clone();
                self.start_helper(Ok(HelperAction::StartServer { label: "NGROK".to_string(), command }));
            }
            Action::StartMidjourneyServer => {
                let command = self.settings.servers.midjourney.clone();
                self.start_helper(Ok(HelperAction::StartServer { label: "Midjourney webhook".to_string(), command }));
            }
            Action::RunNgrok => self.start_helper(Ok(HelperAction::RunNgrok)),
            Action::RunMidjourney => self.start_helper(Ok(HelperAction::RunMidjourney)),
            Action::ToggleGallery => {
                self.ui.view = match self.ui.view {
                    View::Form => View::Gallery,
                    View::Gallery => View::Form,
                };
            }
            Action::GalleryNext => self.gallery.next(Instant::now()),
            Action::GalleryPrev => self.gallery.prev(Instant::now()),
            Action::GallerySelect(index) => {
                self.gallery.select(index, Instant::now());
            }
            Action::ScrollConsole(delta) => self.ui.scroll_console(delta),
            Action::DismissNotification => self.ui.dismiss(),
        }
        self.ui.dirty = true;
    }

    /// Apply an edit to the focused text field, if any, then persist.
    fn edit_focused(&mut self, edit: impl FnOnce(&mut String)) {
        let Focus::Field(field) = self.ui.focus else {
            return;
        };
        if !self.form.rules().visible(field) {
            return;
        }
        edit(self.form.value_mut(field));
        if field == InputField::ChaosPercentage {
            self.form.value_mut(field).retain(|c| c.is_ascii_digit());
        }
        self.persist();
    }

    fn start_helper(&mut self, action: Result<HelperAction, ActionError>) {
        match action {
            Ok(action) => {
                self.console.info(format!("{}...", action.label()));
                self.runner.spawn(action);
            }
            Err(e) => self.console.error(format!("Error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    use ac_base::agents::{AgentCategory, AgentName};

    use crate::app::tests::{Scripted, app_with, result};
    use crate::state::persistence::SnapshotStore;

    fn app(dir: &std::path::Path) -> App {
        app_with(Arc::new(Scripted { calls: AtomicUsize::new(0), reply: Ok(result(Some("a.md"), None)) }), dir)
    }

    #[test]
    fn typing_edits_focused_field_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.ui.focus = Focus::Field(InputField::Topic);
        for c in "rust".chars() {
            app.handle_action(Action::InsertChar(c));
        }
        app.handle_action(Action::Backspace);
        app.handle_action(Action::PasteText("y\nbits".into()));
        assert_eq!(app.form.value(InputField::Topic), "rusy bits");

        let saved = SnapshotStore::new(dir.path().join("form.json")).load().unwrap();
        assert_eq!(saved.topic, "rusy bits");
    }

    #[test]
    fn typing_on_selector_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.ui.focus = Focus::Category;
        app.handle_action(Action::InsertChar('x'));
        assert_eq!(app.form.fields, Default::default());
    }

    #[test]
    fn chaos_accepts_digits_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.handle_action(Action::ToggleCategory);
        app.ui.focus = Focus::Field(InputField::ChaosPercentage);
        app.handle_action(Action::PasteText("4a2".into()));
        assert_eq!(app.form.value(InputField::ChaosPercentage), "42");
    }

    #[test]
    fn toggling_category_moves_focus_off_hidden_field() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.ui.focus = Focus::Field(InputField::Topic);
        app.handle_action(Action::ToggleCategory);
        assert_eq!(app.form.category(), AgentCategory::Artist);
        assert_eq!(app.form.name(), AgentName::RandomPromptArtist);
        assert_eq!(app.ui.focus, Focus::Name);
    }

    #[test]
    fn follow_on_actions_refused_without_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.handle_action(Action::Deploy);
        assert_eq!(
            app.console.last().map(|e| e.message.as_str()),
            Some("Error: No generated result yet; run a generation first")
        );
        assert_eq!(app.runner.pending(), 0);
    }

    #[test]
    fn voice_over_uses_last_result() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.form.set_last_result(Some("a.md".into()));
        app.handle_action(Action::GenerateVoice);
        assert_eq!(app.runner.pending(), 1);
        let report = app.runner.wait_one().unwrap();
        assert_eq!(report.action, HelperAction::GenerateVoice { filename: "a.md".into() });
    }

    #[test]
    fn clear_fields_is_explicit_and_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.form.set_value(InputField::Topic, "gone soon");
        app.handle_action(Action::ClearFields);
        assert_eq!(app.form.value(InputField::Topic), "");
        let saved = SnapshotStore::new(dir.path().join("form.json")).load().unwrap();
        assert_eq!(saved.topic, "");
    }

    #[test]
    fn gallery_toggle_switches_view() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.handle_action(Action::ToggleGallery);
        assert_eq!(app.ui.view, View::Gallery);
        app.handle_action(Action::ToggleGallery);
        assert_eq!(app.ui.view, View::Form);
    }

    #[test]
    fn page_up_past_the_top_is_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());
        app.ui.set_console_max_scroll(4);
        app.handle_action(Action::ScrollConsole(5));
        app.handle_action(Action::ScrollConsole(5));
        assert_eq!(app.ui.console_scroll, 4);
        app.handle_action(Action::ScrollConsole(-5));
        assert_eq!(app.ui.console_scroll, 0);
    }
}
