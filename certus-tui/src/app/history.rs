use super::*;

impl App {
    pub fn history_older_month(&mut self) {
        self.history.select_older();
        self.history_scroll = 0;
    }

    pub fn history_newer_month(&mut self) {
        self.history.select_newer();
        self.history_scroll = 0;
    }

    pub fn history_scroll_down(&mut self) {
        self.history_scroll += 1;
        self.clamp_history_scroll();
    }

    pub fn history_scroll_up(&mut self) {
        self.history_scroll = self.history_scroll.saturating_sub(1);
    }

    /// Keep the last row reachable without scrolling past it.
    pub(super) fn clamp_history_scroll(&mut self) {
        let rows = self.history.filtered().len();
        let visible = self.history_view_height.max(1);
        self.history_scroll = self.history_scroll.min(rows.saturating_sub(visible));
    }
}
