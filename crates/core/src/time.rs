use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, Utc};

/// The zone used to decide which calendar day a content timestamp belongs to.
///
/// Freshness is judged by local calendar day. Tests pin a fixed offset so the
/// outcome does not depend on the machine running them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl DayZone {
    /// Returns a zone pinned to UTC.
    #[must_use]
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// Calendar day of an epoch-millis timestamp in this zone.
    ///
    /// Returns `None` for timestamps chrono cannot represent.
    #[must_use]
    pub fn calendar_day(&self, epoch_millis: i64) -> Option<NaiveDate> {
        let at = DateTime::<Utc>::from_timestamp_millis(epoch_millis)?;
        Some(self.local_date(at))
    }

    /// Returns true when both timestamps fall on the same calendar day.
    #[must_use]
    pub fn same_day(&self, a_millis: i64, b_millis: i64) -> bool {
        match (self.calendar_day(a_millis), self.calendar_day(b_millis)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn local_date(&self, at: DateTime<Utc>) -> NaiveDate {
        match self {
            DayZone::Local => at.with_timezone(&Local).date_naive(),
            DayZone::Fixed(offset) => at.with_timezone(offset).date_naive(),
        }
    }
}

/// Parses a headline timestamp into epoch millis.
///
/// Accepts RFC 3339 (`2025-03-01T10:00:00Z`, `...+00:00`) and the naive
/// ISO form the content service emits for offset-less columns, which is read
/// as UTC. A doubled `+00:00Z` suffix is normalized first.
#[must_use]
pub fn parse_timestamp_millis(raw: &str) -> Option<i64> {
    let normalized = normalize_iso(raw);
    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(parsed.timestamp_millis());
    }
    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().timestamp_millis())
}

/// Formats a published date as `Month D, YYYY`.
///
/// Missing values read "Not Available"; unparsable ones read "Unknown".
#[must_use]
pub fn format_published_date(raw: Option<&str>, zone: DayZone) -> String {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return "Not Available".to_string();
    };
    match parse_timestamp_millis(raw) {
        Some(millis) => format_day(millis, zone),
        None => "Unknown".to_string(),
    }
}

/// Formats an epoch-millis timestamp as `Month D, YYYY`; 0 reads "Unknown".
#[must_use]
pub fn format_day(epoch_millis: i64, zone: DayZone) -> String {
    if epoch_millis == 0 {
        return "Unknown".to_string();
    }
    match zone.calendar_day(epoch_millis) {
        Some(day) => day.format("%B %-d, %Y").to_string(),
        None => "Unknown".to_string(),
    }
}

fn normalize_iso(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.strip_suffix("+00:00Z") {
        Some(head) => format!("{head}Z"),
        None => trimmed.to_string(),
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_MILLIS: i64 = 1_700_000_000_000;

/// One day in milliseconds.
pub const DAY_MILLIS: i64 = 86_400_000;

/// Returns the deterministic test timestamp as a RFC 3339 string.
#[must_use]
pub fn fixed_iso() -> String {
    DateTime::<Utc>::from_timestamp_millis(FIXED_TEST_MILLIS)
        .map(|at| at.to_rfc3339())
        .unwrap_or_default()
}
