use chrono::{Locale, NaiveDate};
use serde::{Deserialize, Serialize};

use super::weekday::format_localized_date;

/// A two-sided date selection built up by successive picks on a calendar.
///
/// `Default` is the fresh state with neither bound chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateSelection {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DateSelection {
    pub fn starting_at(date: NaiveDate) -> Self {
        Self {
            start_date: Some(date),
            end_date: None,
        }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start.min(end)),
            end_date: Some(start.max(end)),
        }
    }

    /// Both bounds, when the selection is complete and ordered.
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.range().is_some()
    }
}

/// Applies one day pick to the current selection.
///
/// The first pick opens a range, the second closes it (swapping bounds so the
/// earlier day always starts the range) and a third pick starts over.
pub fn select_day(current: DateSelection, picked: NaiveDate) -> DateSelection {
    match (current.start_date, current.end_date) {
        (Some(start), None) if picked < start => DateSelection {
            start_date: Some(picked),
            end_date: Some(start),
        },
        (Some(start), None) => DateSelection {
            start_date: Some(start),
            end_date: Some(picked),
        },
        _ => DateSelection::starting_at(picked),
    }
}

/// Applies a sequence of picks starting from `current`.
pub fn select_days(
    current: DateSelection,
    picks: impl IntoIterator<Item = NaiveDate>,
) -> DateSelection {
    picks.into_iter().fold(current, select_day)
}

/// Text for the "when?" field. Empty until both bounds are chosen.
pub fn format_range_label(selection: &DateSelection, locale: Locale) -> String {
    let Some((start, end)) = selection.range() else {
        return String::new();
    };
    format!(
        "{} - {}",
        format_localized_date(start, "%d %B", locale),
        format_localized_date(end, "%d %B %Y", locale)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPosition {
    Start,
    Middle,
    End,
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkedDate {
    pub date: NaiveDate,
    pub position: DayPosition,
}

/// Every day of a complete selection, tagged for range highlighting.
pub fn marked_dates_for_range(selection: &DateSelection) -> Vec<MarkedDate> {
    let Some((start, end)) = selection.range() else {
        return Vec::new();
    };
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| {
            let position = if start == end {
                DayPosition::Single
            } else if date == start {
                DayPosition::Start
            } else if date == end {
                DayPosition::End
            } else {
                DayPosition::Middle
            };
            MarkedDate { date, position }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pick_all(days: &[NaiveDate]) -> DateSelection {
        select_days(DateSelection::default(), days.iter().copied())
    }

    #[test]
    fn first_pick_opens_a_range() {
        let picked = date(2024, 3, 10);
        let selection = select_day(DateSelection::default(), picked);
        assert_eq!(selection, DateSelection::starting_at(picked));
    }

    #[test]
    fn second_pick_closes_the_range_in_either_order() {
        let a = date(2024, 3, 10);
        let b = date(2024, 3, 14);
        let expected = DateSelection {
            start_date: Some(a),
            end_date: Some(b),
        };
        assert_eq!(pick_all(&[a, b]), expected);
        assert_eq!(pick_all(&[b, a]), expected);
    }

    #[test]
    fn picking_the_same_day_twice_gives_a_one_day_range() {
        let a = date(2024, 3, 10);
        let selection = pick_all(&[a, a]);
        assert_eq!(selection.range(), Some((a, a)));
    }

    #[test]
    fn third_pick_starts_over() {
        let third = date(2024, 2, 1);
        let selection = pick_all(&[date(2024, 3, 10), date(2024, 3, 14), third]);
        assert_eq!(selection, DateSelection::starting_at(third));
    }

    #[test]
    fn pick_with_only_an_end_date_starts_fresh() {
        let current = DateSelection {
            start_date: None,
            end_date: Some(date(2024, 3, 14)),
        };
        let picked = date(2024, 3, 20);
        assert_eq!(select_day(current, picked), DateSelection::starting_at(picked));
    }

    #[test]
    fn label_is_empty_until_complete() {
        let open = DateSelection::starting_at(date(2024, 3, 10));
        assert!(format_range_label(&DateSelection::default(), Locale::en_US).is_empty());
        assert!(format_range_label(&open, Locale::en_US).is_empty());

        let closed = DateSelection::between(date(2024, 3, 10), date(2024, 3, 12));
        let label = format_range_label(&closed, Locale::en_US);
        assert_eq!(label, "10 March - 12 March 2024");
    }

    #[test]
    fn marks_every_day_of_the_range() {
        let selection = DateSelection::between(date(2024, 2, 27), date(2024, 3, 2));
        let marked = marked_dates_for_range(&selection);
        // leap year: 27, 28, 29 Feb, 1, 2 Mar
        assert_eq!(marked.len(), 5);
        assert_eq!(marked[0].position, DayPosition::Start);
        assert!(marked[1..4].iter().all(|m| m.position == DayPosition::Middle));
        assert_eq!(marked[4].position, DayPosition::End);
        assert_eq!(marked[2].date, date(2024, 2, 29));
    }

    #[test]
    fn single_day_range_is_marked_single() {
        let day = date(2024, 3, 10);
        let marked = marked_dates_for_range(&DateSelection::between(day, day));
        assert_eq!(
            marked,
            vec![MarkedDate {
                date: day,
                position: DayPosition::Single
            }]
        );
    }

    #[test]
    fn incomplete_selection_marks_nothing() {
        let open = DateSelection::starting_at(date(2024, 3, 10));
        assert!(marked_dates_for_range(&open).is_empty());
        assert!(marked_dates_for_range(&DateSelection::default()).is_empty());
    }
}
