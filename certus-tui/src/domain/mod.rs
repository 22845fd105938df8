mod confirm;
mod error;
mod history;
#[cfg(test)]
pub(crate) mod mock;
pub mod ports;
mod route;
mod session;
mod ticker;

pub use confirm::{ConfirmGate, ConfirmPrompt};
pub use error::TrackingError;
pub use history::{
    filter_by_month, format_duration, format_entry_date, format_time_of_day, month_list,
    HistoryFilter, Month, MONTHS_BACK, OPEN_ENTRY_PLACEHOLDER,
};
pub use route::Route;
pub use session::{ActiveSession, SessionState, SessionTracker, Transition};
pub use ticker::{elapsed_display, format_elapsed, ElapsedTicker, IDLE_DISPLAY};
