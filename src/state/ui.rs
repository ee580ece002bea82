use ac_base::agents::{FieldRules, InputField};

/// Which control receives keyboard input on the form view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Category,
    Name,
    Field(InputField),
    Generate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Form,
    Gallery,
}

/// Presentation state owned by the UI thread.
#[derive(Debug, Clone)]
pub struct UiState {
    pub focus: Focus,
    pub view: View,
    /// Blocking notification; while set, every key except dismissal is swallowed.
    pub notification: Option<String>,
    pub spinner_frame: usize,
    pub dirty: bool,
    /// Lines scrolled up from the bottom of the console log.
    pub console_scroll: u16,
    /// Upper bound for `console_scroll`, recomputed on every console render.
    pub console_max_scroll: u16,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            focus: Focus::Category,
            view: View::Form,
            notification: None,
            spinner_frame: 0,
            dirty: true,
            console_scroll: 0,
            console_max_scroll: 0,
        }
    }
}

impl UiState {
    /// Focusable controls in tab order for the given rules.
    pub fn focus_order(rules: &FieldRules) -> Vec<Focus> {
        let mut order = vec![Focus::Category, Focus::Name];
        order.extend(rules.visible_fields().into_iter().map(Focus::Field));
        order.push(Focus::Generate);
        order
    }

    pub fn focus_next(&mut self, rules: &FieldRules) {
        self.step_focus(rules, true);
    }

    pub fn focus_prev(&mut self, rules: &FieldRules) {
        self.step_focus(rules, false);
    }

    fn step_focus(&mut self, rules: &FieldRules, forward: bool) {
        let order = Self::focus_order(rules);
        let len = order.len();
        let idx = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
        self.focus = order[next];
        self.dirty = true;
    }

    /// Move focus off a field the current rules hide.
    pub fn fix_focus(&mut self, rules: &FieldRules) {
        if let Focus::Field(field) = self.focus
            && !rules.visible(field)
        {
            self.focus = Focus::Name;
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(message.into());
        self.dirty = true;
    }

    pub fn dismiss(&mut self) {
        self.notification = None;
        self.dirty = true;
    }

    /// Scroll the console by `delta` rows (positive = up), staying within the log.
    pub fn scroll_console(&mut self, delta: i16) {
        self.console_scroll = self.console_scroll.saturating_add_signed(delta).min(self.console_max_scroll);
        self.dirty = true;
    }

    pub fn set_console_max_scroll(&mut self, max_scroll: u16) {
        self.console_max_scroll = max_scroll;
        self.console_scroll = self.console_scroll.min(max_scroll);
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        self.dirty = true;
    }
}
