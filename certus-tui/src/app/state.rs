use crate::domain::ConfirmPrompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Clock,
    History,
    Settings,
}

impl View {
    pub const TABS: [View; 3] = [View::Clock, View::History, View::Settings];

    pub fn title(&self) -> &'static str {
        match self {
            View::Login => "Sign in",
            View::Clock => "Clock",
            View::History => "History",
            View::Settings => "Settings",
        }
    }
}

/// State-changing actions that must pass the confirmation prompt first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedAction {
    ClockIn,
    ClockOut,
    SignOut,
}

impl GatedAction {
    pub fn prompt(self) -> ConfirmPrompt<GatedAction> {
        let (title, message) = match self {
            GatedAction::ClockIn => ("Confirm clock-in", "Are you sure you want to clock in?"),
            GatedAction::ClockOut => ("Confirm clock-out", "Are you sure you want to clock out?"),
            GatedAction::SignOut => (
                "Confirm sign-out",
                "Are you sure you want to sign out of your account?",
            ),
        };
        ConfirmPrompt::new(title, message, self)
    }
}

/// A text input with mid-string cursor support.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextInput {
    pub value: String,
    pub cursor: usize,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a character at the cursor position.
    pub fn insert(&mut self, c: char) {
        self.value.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character immediately before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let new_cursor = self.prev_boundary(self.cursor);
        self.value.drain(new_cursor..self.cursor);
        self.cursor = new_cursor;
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.prev_boundary(self.cursor);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor = self.next_boundary(self.cursor);
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Number of characters, used to draw a masked field.
    pub fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    fn prev_boundary(&self, pos: usize) -> usize {
        let mut p = pos;
        loop {
            p -= 1;
            if self.value.is_char_boundary(p) {
                return p;
            }
        }
    }

    fn next_boundary(&self, pos: usize) -> usize {
        let mut p = pos + 1;
        while p <= self.value.len() && !self.value.is_char_boundary(p) {
            p += 1;
        }
        p
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub email: TextInput,
    pub password: TextInput,
    pub focused_field: LoginField,
    /// Message from the auth provider after a failed attempt.
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginState {
    pub fn focused_input(&mut self) -> &mut TextInput {
        match self.focused_field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    pub fn next_field(&mut self) {
        self.focused_field = match self.focused_field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }
}
