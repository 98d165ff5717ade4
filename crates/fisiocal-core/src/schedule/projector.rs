use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveTime, TimeDelta, Timelike};
use tracing::{debug, warn};

use crate::models::{CalendarEvent, Student};

use super::ProjectionWindow;

/// Background color the clinic calendar uses for schedule events.
pub const DEFAULT_EVENT_COLOR: &str = "#2E8B57";

/// Every occurrence lasts exactly one hour.
const SLOT_DURATION_HOURS: i64 = 1;

/// `"{n} aluno(s)"`
pub fn default_title(group_size: usize) -> String {
    format!("{} aluno(s)", group_size)
}

/// Project a roster onto the calendar with the default color and title.
pub fn project(students: &[Student], reference_date: NaiveDate) -> Vec<CalendarEvent> {
    Projector::default().project(students, reference_date)
}

/// Expands recurring weekly slots into calendar events.
#[derive(Debug, Clone)]
pub struct Projector {
    color_hint: Option<String>,
    title: fn(usize) -> String,
}

impl Default for Projector {
    fn default() -> Self {
        Self {
            color_hint: Some(DEFAULT_EVENT_COLOR.to_string()),
            title: default_title,
        }
    }
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color_hint(mut self, color_hint: Option<String>) -> Self {
        self.color_hint = color_hint;
        self
    }

    /// Replace the event title, e.g. to localize it.
    pub fn with_title(mut self, title: fn(usize) -> String) -> Self {
        self.title = title;
        self
    }

    /// Build every event from the Monday of `reference_date`'s week through
    /// the end of its month.
    ///
    /// Events come out week by week, ordered by date then hour inside each
    /// week. Students inside an event keep roster order. Slots with a
    /// weekday outside 0..=6 or an hour outside 0..=23 are skipped with a
    /// warning; the rest of the roster is still projected.
    pub fn project(&self, students: &[Student], reference_date: NaiveDate) -> Vec<CalendarEvent> {
        let window = ProjectionWindow::containing(reference_date);
        let groups = group_by_slot(students);

        let mut events = Vec::with_capacity(groups.len() * window.week_count());
        for monday in window.week_starts() {
            for (&(offset, start_time), group) in &groups {
                let Some(date) = monday.checked_add_days(Days::new(offset)) else {
                    continue;
                };
                events.push(self.build_event(date, start_time, group));
            }
        }

        debug!(
            reference = %reference_date,
            students = students.len(),
            slots = groups.len(),
            weeks = window.week_count(),
            events = events.len(),
            "Projected weekly schedule"
        );

        events
    }

    fn build_event(&self, date: NaiveDate, start_time: NaiveTime, group: &[&Student]) -> CalendarEvent {
        let start = date.and_time(start_time);
        CalendarEvent {
            id: CalendarEvent::event_id(date, start_time.hour()),
            title: (self.title)(group.len()),
            start,
            end: start + TimeDelta::hours(SLOT_DURATION_HOURS),
            color_hint: self.color_hint.clone(),
            grouped_students: group.iter().map(|s| (*s).clone()).collect(),
            occurrence_count: group.len(),
        }
    }
}

/// Group students by (day offset from Monday, start time).
///
/// The grouping is the same for every week, so it is built once. A student
/// listed twice for the same slot is only counted once.
fn group_by_slot(students: &[Student]) -> BTreeMap<(u64, NaiveTime), Vec<&Student>> {
    let mut groups: BTreeMap<(u64, NaiveTime), Vec<&Student>> = BTreeMap::new();

    for student in students {
        for slot in &student.slots {
            match slot.validate() {
                Ok(key) => {
                    let group = groups.entry(key).or_default();
                    if !group.iter().any(|s| s.id == student.id) {
                        group.push(student);
                    }
                }
                Err(e) => {
                    warn!(
                        student_id = student.id,
                        weekday = slot.weekday,
                        hour = slot.hour,
                        error = %e,
                        "Skipping malformed schedule slot"
                    );
                }
            }
        }
    }

    groups
}
