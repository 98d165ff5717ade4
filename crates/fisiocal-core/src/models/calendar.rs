use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use super::Student;

/// One occurrence of a weekly slot, shared by every student booked at that
/// date and hour.
///
/// Serialized in the shape calendar widgets expect: camelCase keys and
/// `start`/`end` as local ISO datetimes without offset
/// (`2024-06-03T08:00:00`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// `{isoDate}-{hour}`, e.g. `2024-06-03-8`
    pub id: String,
    pub title: String,
    #[serde(rename = "startIsoDateTime")]
    pub start: NaiveDateTime,
    #[serde(rename = "endIsoDateTime")]
    pub end: NaiveDateTime,
    pub color_hint: Option<String>,
    pub grouped_students: Vec<Student>,
    pub occurrence_count: usize,
}

impl CalendarEvent {
    /// Build the stable identifier for an occurrence.
    pub fn event_id(date: NaiveDate, hour: u32) -> String {
        format!("{}-{}", date.format("%Y-%m-%d"), hour)
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn hour(&self) -> u32 {
        self.start.hour()
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    pub fn start_iso(&self) -> String {
        self.start.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format("%Y-%m-%dT%H:%M:%S").to_string()
    }

    /// "08:00 - 09:00"
    pub fn time_range_label(&self) -> String {
        format!("{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }

    /// Heading for the list of students in this event.
    pub fn students_heading(&self) -> String {
        format!("Alunos do Horário - {}", self.start.format("%H:%M"))
    }

    pub fn contains_student(&self, student_id: i64) -> bool {
        self.grouped_students.iter().any(|s| s.id == student_id)
    }
}
