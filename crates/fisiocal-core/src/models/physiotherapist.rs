use serde::{Deserialize, Serialize};

/// A physiotherapist as returned by `GET /api/physiotherapists/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Physiotherapist {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl Physiotherapist {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name() {
        let physio: Physiotherapist = serde_json::from_str(
            r#"{"id": 3, "first_name": "Carla", "last_name": "Mendes", "crefito": "12345-F"}"#,
        )
        .unwrap();
        assert_eq!(physio.full_name(), "Carla Mendes");

        let partial: Physiotherapist =
            serde_json::from_str(r#"{"id": 4, "first_name": "Bruno"}"#).unwrap();
        assert_eq!(partial.full_name(), "Bruno");
    }
}
