use chrono::{Datelike, Days, Months, NaiveDate};

/// Days between consecutive projected weeks.
const WEEK_DAYS: u64 = 7;

/// The span of dates a projection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectionWindow {
    /// Monday on or before the reference date
    pub start_of_week: NaiveDate,
    /// Last calendar day of the reference date's month
    pub end_of_month: NaiveDate,
}

impl ProjectionWindow {
    /// Window for a reference date. Weeks start on Monday, so a Sunday
    /// belongs to the week that began six days earlier.
    pub fn containing(reference_date: NaiveDate) -> Self {
        let back = u64::from(reference_date.weekday().num_days_from_monday());
        let start_of_week = reference_date
            .checked_sub_days(Days::new(back))
            .unwrap_or(reference_date);

        Self {
            start_of_week,
            end_of_month: last_day_of_month(reference_date),
        }
    }

    /// Mondays of every projected week, in order. A week is projected while
    /// its Monday is on or before the end of the month.
    pub fn week_starts(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_of_month;
        std::iter::successors(Some(self.start_of_week), |monday| {
            monday.checked_add_days(Days::new(WEEK_DAYS))
        })
        .take_while(move |monday| *monday <= end)
    }

    pub fn week_count(&self) -> usize {
        self.week_starts().count()
    }

    /// Last date an event can fall on: the Sunday of the final week.
    pub fn last_projected_day(&self) -> NaiveDate {
        self.week_starts()
            .last()
            .and_then(|monday| monday.checked_add_days(Days::new(WEEK_DAYS - 1)))
            .unwrap_or(self.end_of_month)
    }
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next_first| next_first.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_start_of_week_is_monday() {
        // Monday stays put
        assert_eq!(ProjectionWindow::containing(date(2024, 6, 3)).start_of_week, date(2024, 6, 3));
        // Thursday
        assert_eq!(ProjectionWindow::containing(date(2024, 6, 6)).start_of_week, date(2024, 6, 3));
        // Sunday is the end of its week, not the start of the next
        assert_eq!(ProjectionWindow::containing(date(2024, 6, 9)).start_of_week, date(2024, 6, 3));
    }

    #[test]
    fn test_start_of_week_can_fall_in_previous_month() {
        let window = ProjectionWindow::containing(date(2024, 6, 1));
        assert_eq!(window.start_of_week, date(2024, 5, 27));
        assert_eq!(window.end_of_month, date(2024, 6, 30));
    }

    #[test]
    fn test_end_of_month() {
        assert_eq!(ProjectionWindow::containing(date(2024, 2, 10)).end_of_month, date(2024, 2, 29));
        assert_eq!(ProjectionWindow::containing(date(2023, 2, 10)).end_of_month, date(2023, 2, 28));
        assert_eq!(ProjectionWindow::containing(date(2024, 12, 31)).end_of_month, date(2024, 12, 31));
        assert_eq!(ProjectionWindow::containing(date(2024, 4, 15)).end_of_month, date(2024, 4, 30));
    }

    #[test]
    fn test_january_2024_has_five_weeks() {
        let window = ProjectionWindow::containing(date(2024, 1, 1));
        let mondays: Vec<_> = window.week_starts().collect();
        assert_eq!(
            mondays,
            vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15), date(2024, 1, 22), date(2024, 1, 29)]
        );
        assert_eq!(window.last_projected_day(), date(2024, 2, 4));
    }

    #[test]
    fn test_month_starting_on_wednesday() {
        // May 2024: the 1st is a Wednesday, 31 days
        let window = ProjectionWindow::containing(date(2024, 5, 1));
        let mondays: Vec<_> = window.week_starts().collect();
        assert_eq!(
            mondays,
            vec![date(2024, 4, 29), date(2024, 5, 6), date(2024, 5, 13), date(2024, 5, 20), date(2024, 5, 27)]
        );
    }

    #[test]
    fn test_june_2024_from_first_monday() {
        let window = ProjectionWindow::containing(date(2024, 6, 3));
        assert_eq!(window.week_count(), 4);
    }

    #[test]
    fn test_late_reference_date_projects_single_week() {
        // 2024-06-25 is a Tuesday; the next Monday (July 1) is past month end
        let window = ProjectionWindow::containing(date(2024, 6, 25));
        assert_eq!(window.week_starts().collect::<Vec<_>>(), vec![date(2024, 6, 24)]);
    }
}
