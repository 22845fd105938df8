use certus_ledger::domain::AuthSession;

/// Top-level destination picked from the auth session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Tabs,
}

impl Route {
    pub fn for_session(session: Option<&AuthSession>) -> Self {
        match session {
            Some(_) => Route::Tabs,
            None => Route::Login,
        }
    }
}
