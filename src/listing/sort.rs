//! Column sorting
//!
//! Each row type maps its column enum to a [`SortKey`]; rows are then
//! ordered by those keys. Absent keys always go last, whichever the
//! direction.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Header indicator
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Comparable projection of one cell
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Missing,
    Text(String),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDateTime),
}

impl SortKey {
    pub fn text(value: &str) -> Self {
        SortKey::Text(value.to_string())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map(SortKey::text).unwrap_or(SortKey::Missing)
    }

    /// Date column cell. Unparseable text counts as missing.
    pub fn date(value: Option<&str>) -> Self {
        value
            .and_then(parse_date)
            .map(SortKey::Date)
            .unwrap_or(SortKey::Missing)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SortKey::Missing)
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Integer(_) => 1,
            SortKey::Decimal(_) => 2,
            SortKey::Date(_) => 3,
            SortKey::Text(_) => 4,
        }
    }

    /// Ascending order between two present keys
    fn cmp_present(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Integer(a), SortKey::Integer(b)) => a.cmp(b),
            (SortKey::Decimal(a), SortKey::Decimal(b)) => a.total_cmp(b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

/// Parse the date formats the backend emits: RFC 3339, ISO 8601 without
/// offset (optionally with fractional seconds), or a bare date.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Compare two keys under a direction; missing keys sort last either way.
pub fn compare_keys(a: &SortKey, b: &SortKey, direction: SortDirection) -> Ordering {
    match (a.is_missing(), b.is_missing()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = a.cmp_present(b);
            match direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        }
    }
}

/// A row type whose columns can be sorted
pub trait Sortable {
    type Column: Copy + Eq + fmt::Debug;

    fn sort_key(&self, column: Self::Column) -> SortKey;
}

/// Active column and direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<C> {
    pub column: C,
    pub direction: SortDirection,
}

impl<C: Copy + Eq> SortState<C> {
    pub fn ascending(column: C) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// State after a header click on `column`: the same column flips
    /// direction, a new column starts ascending.
    pub fn next(current: Option<Self>, column: C) -> Self {
        match current {
            Some(state) if state.column == column => Self {
                column,
                direction: state.direction.toggled(),
            },
            _ => Self::ascending(column),
        }
    }
}

/// Stable sort of `items` by one column
pub fn sort_items<T: Sortable>(items: &mut Vec<T>, column: T::Column, direction: SortDirection) {
    let mut keyed: Vec<(SortKey, T)> = std::mem::take(items)
        .into_iter()
        .map(|item| (item.sort_key(column), item))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, direction));

    *items = keyed.into_iter().map(|(_, item)| item).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: &'static str,
        due: Option<&'static str>,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Col {
        Name,
        Due,
    }

    impl Sortable for Row {
        type Column = Col;

        fn sort_key(&self, column: Col) -> SortKey {
            match column {
                Col::Name => SortKey::text(self.name),
                Col::Due => SortKey::date(self.due),
            }
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { name: "c", due: Some("2024-03-01T00:00:00") },
            Row { name: "a", due: None },
            Row { name: "b", due: Some("2023-12-31") },
            Row { name: "d", due: Some("2024-01-15T10:30:00Z") },
        ]
    }

    fn names(rows: &[Row]) -> Vec<&'static str> {
        rows.iter().map(|r| r.name).collect()
    }

    #[test]
    fn test_dates_compare_chronologically() {
        let mut items = rows();
        sort_items(&mut items, Col::Due, SortDirection::Ascending);
        assert_eq!(names(&items), vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_missing_last_in_both_directions() {
        let mut items = rows();
        sort_items(&mut items, Col::Due, SortDirection::Descending);
        assert_eq!(names(&items), vec!["c", "d", "b", "a"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut once = rows();
        sort_items(&mut once, Col::Name, SortDirection::Descending);

        let mut twice = once.clone();
        sort_items(&mut twice, Col::Name, SortDirection::Descending);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut items = vec![
            Row { name: "x", due: None },
            Row { name: "y", due: None },
            Row { name: "z", due: Some("2020-01-01") },
        ];
        sort_items(&mut items, Col::Due, SortDirection::Ascending);
        assert_eq!(names(&items), vec!["z", "x", "y"]);
    }

    #[test]
    fn test_next_state_toggles_and_resets() {
        let first = SortState::next(None, Col::Name);
        assert_eq!(first.direction, SortDirection::Ascending);

        let second = SortState::next(Some(first), Col::Name);
        assert_eq!(second.direction, SortDirection::Descending);

        let third = SortState::next(Some(second), Col::Name);
        assert_eq!(third.direction, SortDirection::Ascending);

        let other = SortState::next(Some(second), Col::Due);
        assert_eq!(other, SortState::ascending(Col::Due));
    }

    #[test]
    fn test_parse_date_formats() {
        assert!(parse_date("2024-01-15").is_some());
        assert!(parse_date("2024-01-15T10:30:00").is_some());
        assert!(parse_date("2024-01-15T10:30:00.123").is_some());
        assert!(parse_date("2024-01-15T10:30:00+02:00").is_some());
        assert!(parse_date("not a date").is_none());
        assert!(parse_date("").is_none());
        assert_eq!(SortKey::date(Some("garbage")), SortKey::Missing);
    }

    #[test]
    fn test_decimal_keys_are_total() {
        let a = SortKey::Decimal(f64::NAN);
        let b = SortKey::Decimal(1.0);
        let forward = compare_keys(&a, &b, SortDirection::Ascending);
        let backward = compare_keys(&b, &a, SortDirection::Ascending);
        assert_eq!(forward, backward.reverse());
    }
}
