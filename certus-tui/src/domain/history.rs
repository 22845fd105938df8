use certus_ledger::domain::TimeEntry;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// How many months before the current one the history selector offers.
pub const MONTHS_BACK: usize = 12;

/// Shown instead of a duration or clock-out time while an entry is open.
pub const OPEN_ENTRY_PLACEHOLDER: &str = "---";

/// A calendar month, anchored to its first day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Month {
    pub label: String,
    pub anchor: Date,
}

impl Month {
    pub fn containing(date: Date) -> Self {
        let anchor = date - Duration::days(i64::from(date.day()) - 1);
        Self {
            label: format!("{} {}", anchor.month(), anchor.year()),
            anchor,
        }
    }

    pub fn previous(&self) -> Self {
        Self::containing(self.anchor - Duration::days(1))
    }

    fn next(&self) -> Self {
        Self::containing(self.anchor + Duration::days(31))
    }

    /// First instant of the month at the given offset.
    pub fn start(&self, offset: UtcOffset) -> OffsetDateTime {
        PrimitiveDateTime::new(self.anchor, Time::MIDNIGHT).assume_offset(offset)
    }

    /// Last instant of the month (23:59:59.999999999 on its last day).
    pub fn end(&self, offset: UtcOffset) -> OffsetDateTime {
        self.next().start(offset) - Duration::nanoseconds(1)
    }

    pub fn contains(&self, instant: OffsetDateTime, offset: UtcOffset) -> bool {
        instant >= self.start(offset) && instant <= self.end(offset)
    }
}

/// The current month and the [`MONTHS_BACK`] months before it, newest first.
pub fn month_list(now: OffsetDateTime) -> Vec<Month> {
    std::iter::successors(Some(Month::containing(now.date())), |m| Some(m.previous()))
        .take(MONTHS_BACK + 1)
        .collect()
}

pub fn filter_by_month(entries: &[TimeEntry], month: &Month, offset: UtcOffset) -> Vec<TimeEntry> {
    entries
        .iter()
        .filter(|e| month.contains(e.clock_in, offset))
        .cloned()
        .collect()
}

/// `"{h}h {m}m"` for a closed entry, [`OPEN_ENTRY_PLACEHOLDER`] for an open one.
pub fn format_duration(clock_in: OffsetDateTime, clock_out: Option<OffsetDateTime>) -> String {
    let Some(clock_out) = clock_out else {
        return OPEN_ENTRY_PLACEHOLDER.to_string();
    };
    let minutes = (clock_out - clock_in).whole_minutes().max(0);
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn format_time_of_day(instant: Option<OffsetDateTime>, offset: UtcOffset) -> String {
    match instant {
        Some(instant) => {
            let t = instant.to_offset(offset);
            format!("{:02}:{:02}:{:02}", t.hour(), t.minute(), t.second())
        }
        None => OPEN_ENTRY_PLACEHOLDER.to_string(),
    }
}

pub fn format_entry_date(instant: OffsetDateTime, offset: UtcOffset) -> String {
    let d = instant.to_offset(offset).date();
    format!("{}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
}

/// Month selection plus the entries of the selected month.
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    months: Vec<Month>,
    selected: usize,
    entries: Vec<TimeEntry>,
    filtered: Vec<TimeEntry>,
    offset: UtcOffset,
}

impl HistoryFilter {
    /// Starts on the month containing `now`, evaluated at `now`'s offset.
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            months: month_list(now),
            selected: 0,
            entries: Vec::new(),
            filtered: Vec::new(),
            offset: now.offset(),
        }
    }

    pub fn set_entries(&mut self, entries: Vec<TimeEntry>) {
        self.entries = entries;
        self.refilter();
    }

    /// Select a month by index into [`HistoryFilter::months`]. Out of range is ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.months.len() && index != self.selected {
            self.selected = index;
            self.refilter();
        }
    }

    /// One month further back.
    pub fn select_older(&mut self) {
        self.select(self.selected + 1);
    }

    pub fn select_newer(&mut self) {
        if let Some(index) = self.selected.checked_sub(1) {
            self.select(index);
        }
    }

    pub fn months(&self) -> &[Month] {
        &self.months
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_month(&self) -> &Month {
        &self.months[self.selected]
    }

    pub fn filtered(&self) -> &[TimeEntry] {
        &self.filtered
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    fn refilter(&mut self) {
        self.filtered = filter_by_month(&self.entries, &self.months[self.selected], self.offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certus_ledger::domain::UserId;
    use time::macros::{date, datetime};

    fn entry(id: i64, clock_in: OffsetDateTime) -> TimeEntry {
        TimeEntry::new(id, UserId::new("u-1"), clock_in)
    }

    #[test]
    fn month_label_and_anchor() {
        let month = Month::containing(date!(2024 - 03 - 17));
        assert_eq!(month.label, "March 2024");
        assert_eq!(month.anchor, date!(2024 - 03 - 01));
    }

    #[test]
    fn month_bounds_cover_whole_month() {
        let feb = Month::containing(date!(2024 - 02 - 10));
        assert_eq!(feb.start(UtcOffset::UTC), datetime!(2024-02-01 00:00 UTC));
        assert_eq!(
            feb.end(UtcOffset::UTC),
            datetime!(2024-02-29 23:59:59.999999999 UTC)
        );

        let dec = Month::containing(date!(2023 - 12 - 31));
        assert_eq!(dec.end(UtcOffset::UTC), datetime!(2023-12-31 23:59:59.999999999 UTC));
    }

    #[test]
    fn month_list_has_thirteen_months_newest_first() {
        let months = month_list(datetime!(2024-03-15 12:00 UTC));

        assert_eq!(months.len(), 13);
        assert_eq!(months[0].label, "March 2024");
        assert_eq!(months[1].label, "February 2024");
        assert_eq!(months[2].label, "January 2024");
        assert_eq!(months[3].label, "December 2023");
        assert_eq!(months[12].label, "March 2023");
        assert!(months.iter().all(|m| m.anchor.day() == 1));
    }

    #[test]
    fn filter_splits_at_month_boundary() {
        let entries = vec![
            entry(2, datetime!(2024-02-01 00:00:01 UTC)),
            entry(1, datetime!(2024-01-31 23:59:59 UTC)),
        ];
        let jan = Month::containing(date!(2024 - 01 - 01));
        let feb = Month::containing(date!(2024 - 02 - 01));

        let in_jan = filter_by_month(&entries, &jan, UtcOffset::UTC);
        let in_feb = filter_by_month(&entries, &feb, UtcOffset::UTC);

        assert_eq!(in_jan.len(), 1);
        assert_eq!(in_jan[0].id.as_i64(), 1);
        assert_eq!(in_feb.len(), 1);
        assert_eq!(in_feb[0].id.as_i64(), 2);
    }

    #[test]
    fn filter_uses_local_offset() {
        // 23:30 UTC on Jan 31 is already February at +01:00.
        let entries = vec![entry(1, datetime!(2024-01-31 23:30 UTC))];
        let feb = Month::containing(date!(2024 - 02 - 01));
        let cet = UtcOffset::from_hms(1, 0, 0).unwrap();

        assert_eq!(filter_by_month(&entries, &feb, cet).len(), 1);
        assert!(filter_by_month(&entries, &feb, UtcOffset::UTC).is_empty());
    }

    #[test]
    fn duration_formats_hours_and_minutes() {
        let clock_in = datetime!(2024-02-01 08:00 UTC);
        assert_eq!(
            format_duration(clock_in, Some(datetime!(2024-02-01 16:45:59 UTC))),
            "8h 45m"
        );
        assert_eq!(
            format_duration(clock_in, Some(datetime!(2024-02-02 10:05 UTC))),
            "26h 5m"
        );
        assert_eq!(format_duration(clock_in, Some(clock_in)), "0h 0m");
        assert_eq!(format_duration(clock_in, None), OPEN_ENTRY_PLACEHOLDER);
    }

    #[test]
    fn duration_before_clock_in_reads_as_zero() {
        let clock_in = datetime!(2024-02-01 08:00 UTC);
        assert_eq!(
            format_duration(clock_in, Some(datetime!(2024-02-01 07:00 UTC))),
            "0h 0m"
        );
    }

    #[test]
    fn row_columns() {
        let cet = UtcOffset::from_hms(1, 0, 0).unwrap();
        let at = datetime!(2024-01-31 23:30:05 UTC);
        assert_eq!(format_time_of_day(Some(at), cet), "00:30:05");
        assert_eq!(format_time_of_day(None, cet), OPEN_ENTRY_PLACEHOLDER);
        assert_eq!(format_entry_date(at, cet), "2024-02-01");
    }

    #[test]
    fn filter_recomputes_on_selection_and_entries() {
        let mut filter = HistoryFilter::new(datetime!(2024-02-15 12:00 UTC));
        assert_eq!(filter.selected_month().label, "February 2024");
        assert!(filter.filtered().is_empty());

        filter.set_entries(vec![
            entry(2, datetime!(2024-02-01 00:00:01 UTC)),
            entry(1, datetime!(2024-01-31 23:59:59 UTC)),
        ]);
        assert_eq!(filter.filtered().len(), 1);
        assert_eq!(filter.filtered()[0].id.as_i64(), 2);

        filter.select_older();
        assert_eq!(filter.selected_month().label, "January 2024");
        assert_eq!(filter.filtered()[0].id.as_i64(), 1);

        filter.set_entries(Vec::new());
        assert!(filter.filtered().is_empty());
    }

    #[test]
    fn selection_stays_in_range() {
        let mut filter = HistoryFilter::new(datetime!(2024-02-15 12:00 UTC));
        filter.select_newer();
        assert_eq!(filter.selected_index(), 0);

        filter.select(MONTHS_BACK);
        filter.select_older();
        assert_eq!(filter.selected_index(), MONTHS_BACK);
        assert_eq!(filter.selected_month().label, "February 2023");
    }
}
