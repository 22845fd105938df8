/// Title, message and the action to run once the user confirms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt<A> {
    pub title: String,
    pub message: String,
    pub action: A,
}

impl<A> ConfirmPrompt<A> {
    pub fn new(title: impl Into<String>, message: impl Into<String>, action: A) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            action,
        }
    }
}

/// Yes/no gate in front of state-changing actions. Holds at most one pending prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmGate<A> {
    prompt: Option<ConfirmPrompt<A>>,
}

impl<A> Default for ConfirmGate<A> {
    fn default() -> Self {
        Self { prompt: None }
    }
}

impl<A> ConfirmGate<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a prompt, replacing any prompt already pending.
    pub fn open(&mut self, prompt: ConfirmPrompt<A>) {
        self.prompt = Some(prompt);
    }

    pub fn is_visible(&self) -> bool {
        self.prompt.is_some()
    }

    pub fn prompt(&self) -> Option<&ConfirmPrompt<A>> {
        self.prompt.as_ref()
    }

    /// Close the prompt and hand back its action.
    pub fn confirm(&mut self) -> Option<A> {
        self.prompt.take().map(|p| p.action)
    }

    pub fn cancel(&mut self) {
        self.prompt = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Action {
        ClockIn,
        SignOut,
    }

    #[test]
    fn starts_hidden() {
        let gate: ConfirmGate<Action> = ConfirmGate::new();
        assert!(!gate.is_visible());
        assert!(gate.prompt().is_none());
    }

    #[test]
    fn confirm_yields_action_once() {
        let mut gate = ConfirmGate::new();
        gate.open(ConfirmPrompt::new(
            "Confirm clock-in",
            "Are you sure you want to clock in?",
            Action::ClockIn,
        ));
        assert!(gate.is_visible());
        assert_eq!(gate.prompt().unwrap().title, "Confirm clock-in");

        assert_eq!(gate.confirm(), Some(Action::ClockIn));
        assert!(!gate.is_visible());
        assert_eq!(gate.confirm(), None);
    }

    #[test]
    fn cancel_discards_action() {
        let mut gate = ConfirmGate::new();
        gate.open(ConfirmPrompt::new("t", "m", Action::SignOut));
        gate.cancel();

        assert!(!gate.is_visible());
        assert_eq!(gate.confirm(), None);
    }

    #[test]
    fn open_replaces_pending_prompt() {
        let mut gate = ConfirmGate::new();
        gate.open(ConfirmPrompt::new("a", "a", Action::ClockIn));
        gate.open(ConfirmPrompt::new("b", "b", Action::SignOut));

        assert_eq!(gate.confirm(), Some(Action::SignOut));
    }
}
