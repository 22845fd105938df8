mod auth_session;
mod filters;
mod time_entry;

pub use auth_session::*;
pub use filters::*;
pub use time_entry::*;
