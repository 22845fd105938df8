use crate::domain::UserId;

use super::LedgerFilter;

pub struct UserFilter {
    user_id: UserId,
}

impl UserFilter {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

impl LedgerFilter for UserFilter {
    fn as_ledger_filter(&self) -> String {
        format!("user_id=eq.{}", urlencoding::encode(self.user_id.as_str()))
    }
}

impl From<&UserId> for UserFilter {
    fn from(user_id: &UserId) -> Self {
        Self::new(user_id.clone())
    }
}
