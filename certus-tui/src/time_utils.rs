use time::{OffsetDateTime, UtcOffset};

/// The local UTC offset, or UTC when it cannot be determined. Only reliable
/// while the process is still single-threaded.
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn now_at(offset: UtcOffset) -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_at_uses_offset() {
        let offset = UtcOffset::from_hms(2, 0, 0).unwrap();
        assert_eq!(now_at(offset).offset(), offset);
    }
}
