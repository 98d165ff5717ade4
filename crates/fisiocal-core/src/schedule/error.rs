use thiserror::Error;

/// Why a slot cannot be placed on the calendar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("weekday {0} is outside 0 (Monday) to 6 (Sunday)")]
    WeekdayOutOfRange(i32),

    #[error("hour {0} is outside 0 to 23")]
    HourOutOfRange(i32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SlotError::WeekdayOutOfRange(9).to_string(),
            "weekday 9 is outside 0 (Monday) to 6 (Sunday)"
        );
        assert_eq!(SlotError::HourOutOfRange(25).to_string(), "hour 25 is outside 0 to 23");
    }
}
