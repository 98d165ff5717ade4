use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::schedule::SlotError;

/// First hour the clinic takes appointments.
pub const CLINIC_OPENING_HOUR: u32 = 6;

/// Hour the clinic closes; the last bookable slot starts one hour earlier.
pub const CLINIC_CLOSING_HOUR: u32 = 22;

const WEEKDAY_LABELS: [&str; 7] = [
    "Segunda-feira",
    "Terça-feira",
    "Quarta-feira",
    "Quinta-feira",
    "Sexta-feira",
    "Sábado",
    "Domingo",
];

/// A recurring weekly commitment: every `weekday` at `hour`.
///
/// `weekday` counts from Monday (0) to Sunday (6). Both values are kept as
/// signed integers exactly as the API sent them; [`Slot::validate`] decides
/// whether they can be placed on a calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Slot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub weekday: i32,
    pub hour: i32,
}

impl Slot {
    pub fn new(weekday: i32, hour: i32) -> Self {
        Self {
            id: None,
            weekday,
            hour,
        }
    }

    /// Check the slot and return its day offset from Monday and start time.
    pub fn validate(&self) -> Result<(u64, NaiveTime), SlotError> {
        let offset = u64::try_from(self.weekday)
            .ok()
            .filter(|d| *d < 7)
            .ok_or(SlotError::WeekdayOutOfRange(self.weekday))?;

        let start = u32::try_from(self.hour)
            .ok()
            .and_then(|h| NaiveTime::from_hms_opt(h, 0, 0))
            .ok_or(SlotError::HourOutOfRange(self.hour))?;

        Ok((offset, start))
    }

    /// Portuguese weekday name, e.g. "Segunda-feira"
    pub fn weekday_label(&self) -> Option<&'static str> {
        usize::try_from(self.weekday)
            .ok()
            .and_then(|i| WEEKDAY_LABELS.get(i).copied())
    }

    /// Zero-padded start hour: "08:00"
    pub fn hour_label(&self) -> String {
        format!("{:02}:00", self.hour)
    }

    /// Whether the slot falls inside clinic opening hours.
    pub fn within_opening_hours(&self) -> bool {
        (CLINIC_OPENING_HOUR as i32..CLINIC_CLOSING_HOUR as i32).contains(&self.hour)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ModalityDetails {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    // "MONTHLY" or "SESSION"
    #[serde(default)]
    pub payment_type: Option<String>,
}

/// A student as returned by `GET /api/students/`.
///
/// Only the fields the calendar needs are modelled; everything else the API
/// sends (payment status, contact info, commission) is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Student {
    pub id: i64,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub modality_details: Option<ModalityDetails>,
    #[serde(default)]
    pub physiotherapist: Option<i64>,
    #[serde(
        rename = "schedules",
        alias = "slots",
        default,
        deserialize_with = "deserialize_slots"
    )]
    pub slots: Vec<Slot>,
}

fn default_active() -> bool {
    true
}

/// Accept a missing, null, or partly malformed schedule list.
/// Entries that are not a `{weekday, hour}` pair of integers are dropped.
fn deserialize_slots<'de, D>(deserializer: D) -> Result<Vec<Slot>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<serde_json::Value>> = Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Slot>(value) {
            Ok(slot) => Some(slot),
            Err(e) => {
                warn!(error = %e, "Dropping unreadable schedule entry");
                None
            }
        })
        .collect())
}

impl Student {
    pub fn new(id: i64, name: impl Into<String>, slots: Vec<Slot>) -> Self {
        Self {
            id,
            name: name.into(),
            active: true,
            modality_details: None,
            physiotherapist: None,
            slots,
        }
    }

    pub fn modality_name(&self) -> Option<&str> {
        self.modality_details.as_ref().map(|m| m.name.as_str())
    }

    pub fn modality_label(&self) -> &str {
        self.modality_name().unwrap_or("Sem modalidade")
    }

    pub fn status_label(&self) -> &'static str {
        if self.active {
            "Ativo"
        } else {
            "Inativo"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_full_week() {
        for weekday in 0..7 {
            let (offset, start) = Slot::new(weekday, 8).validate().unwrap();
            assert_eq!(offset, weekday as u64);
            assert_eq!(start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert_eq!(
            Slot::new(7, 8).validate(),
            Err(SlotError::WeekdayOutOfRange(7))
        );
        assert_eq!(
            Slot::new(-1, 8).validate(),
            Err(SlotError::WeekdayOutOfRange(-1))
        );
        assert_eq!(Slot::new(0, 24).validate(), Err(SlotError::HourOutOfRange(24)));
        assert_eq!(Slot::new(0, -3).validate(), Err(SlotError::HourOutOfRange(-3)));
    }

    #[test]
    fn test_slot_labels() {
        assert_eq!(Slot::new(0, 7).weekday_label(), Some("Segunda-feira"));
        assert_eq!(Slot::new(6, 7).weekday_label(), Some("Domingo"));
        assert_eq!(Slot::new(9, 7).weekday_label(), None);
        assert_eq!(Slot::new(0, 7).hour_label(), "07:00");
        assert_eq!(Slot::new(0, 18).hour_label(), "18:00");
    }

    #[test]
    fn test_within_opening_hours() {
        assert!(Slot::new(0, 6).within_opening_hours());
        assert!(Slot::new(0, 21).within_opening_hours());
        assert!(!Slot::new(0, 22).within_opening_hours());
        assert!(!Slot::new(0, 5).within_opening_hours());
    }

    #[test]
    fn test_parse_student_from_api() {
        let json = r#"{
            "id": 12,
            "name": "Maria Souza",
            "email": null,
            "active": true,
            "physiotherapist": 3,
            "modality": 1,
            "modality_details": {"id": 1, "name": "Pilates", "price": "250.00", "payment_type": "MONTHLY"},
            "schedules": [
                {"id": 40, "student": 12, "weekday": 0, "weekday_display": "Segunda-feira", "hour": 8, "hour_display": "08:00"},
                {"id": 41, "student": 12, "weekday": 2, "weekday_display": "Quarta-feira", "hour": 8, "hour_display": "08:00"}
            ],
            "payment_status": {"payment_type": "MONTHLY", "paid_current_month": true}
        }"#;

        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.id, 12);
        assert_eq!(student.physiotherapist, Some(3));
        assert_eq!(student.modality_name(), Some("Pilates"));
        assert_eq!(student.slots.len(), 2);
        assert_eq!(student.slots[1].weekday, 2);
        assert_eq!(student.slots[0].id, Some(40));
    }

    #[test]
    fn test_parse_student_without_schedules() {
        let missing: Student = serde_json::from_str(r#"{"id": 1, "name": "A"}"#).unwrap();
        assert!(missing.slots.is_empty());
        assert!(missing.active);

        let null: Student =
            serde_json::from_str(r#"{"id": 1, "name": "A", "schedules": null}"#).unwrap();
        assert!(null.slots.is_empty());
    }

    #[test]
    fn test_parse_drops_unreadable_slots() {
        let json = r#"{"id": 1, "name": "A", "schedules": [
            {"weekday": "monday", "hour": 8},
            {"weekday": 1},
            {"weekday": 1, "hour": 9}
        ]}"#;
        let student: Student = serde_json::from_str(json).unwrap();
        assert_eq!(student.slots, vec![Slot::new(1, 9)]);
    }

    #[test]
    fn test_slots_alias() {
        let student: Student =
            serde_json::from_str(r#"{"id": 1, "name": "A", "slots": [{"weekday": 3, "hour": 10}]}"#)
                .unwrap();
        assert_eq!(student.slots, vec![Slot::new(3, 10)]);
    }

    #[test]
    fn test_display_labels() {
        let mut student = Student::new(1, "Ana", vec![]);
        assert_eq!(student.modality_label(), "Sem modalidade");
        assert_eq!(student.status_label(), "Ativo");

        student.active = false;
        student.modality_details = Some(ModalityDetails {
            id: Some(2),
            name: "RPG".to_string(),
            payment_type: Some("SESSION".to_string()),
        });
        assert_eq!(student.modality_label(), "RPG");
        assert_eq!(student.status_label(), "Inativo");
    }
}
