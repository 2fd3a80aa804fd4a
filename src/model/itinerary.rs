use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TravelItinerary {
    pub trip_title: String,
    pub summary: String,
    pub days: Vec<DayPlan>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DayPlan {
    /// Taken verbatim from the response, never renumbered.
    pub day_number: DayNumber,
    pub title: String,
    pub theme: String,
    pub activities: Vec<Activity>,
    pub accommodation: String,
    pub meals: Meals,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Activity {
    /// Free-form label such as "Morning" or "09:00".
    pub time: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Meals {
    pub lunch: String,
    pub dinner: String,
}

/// `dayNumber` as the model sent it. The schema declares NUMBER, so this may
/// be `3`, `3.0` or even `2.5`; integral values display without a fraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DayNumber(pub f64);

impl DayNumber {
    fn as_integer(&self) -> Option<i64> {
        let n = self.0;
        (n.fract() == 0.0 && n.abs() < i64::MAX as f64).then_some(n as i64)
    }
}

impl From<u32> for DayNumber {
    fn from(n: u32) -> Self {
        DayNumber(n as f64)
    }
}

impl fmt::Display for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_integer() {
            Some(n) => write!(f, "{}", n),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for DayNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_integer() {
            Some(n) => serializer.serialize_i64(n),
            None => serializer.serialize_f64(self.0),
        }
    }
}

impl TravelItinerary {
    pub fn parse(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_schema_shaped_response() {
        let text = r#"{
            "tripTitle": "Imperial Cities",
            "summary": "Five days of souks.",
            "days": [{
                "dayNumber": 1.0,
                "title": "Arrival",
                "theme": "Culture",
                "activities": [{ "time": "Morning", "description": "Jemaa el-Fnaa", "location": "Medina" }],
                "accommodation": "Riad Yasmine",
                "meals": { "lunch": "Tagine", "dinner": "Couscous" }
            }]
        }"#;
        let it = TravelItinerary::parse(text).unwrap();
        assert_eq!(it.trip_title, "Imperial Cities");
        assert_eq!(it.days[0].day_number, DayNumber(1.0));
        assert_eq!(it.days[0].activities[0].location.as_deref(), Some("Medina"));
        assert_eq!(it.days[0].meals.dinner, "Couscous");
    }

    #[test]
    fn absent_fields_default_to_empty() {
        let it = TravelItinerary::parse(r#"{ "days": [{ "dayNumber": 4 }] }"#).unwrap();
        assert_eq!(it.trip_title, "");
        assert_eq!(it.days[0].day_number.to_string(), "4");
        assert!(it.days[0].activities.is_empty());
    }

    #[test]
    fn odd_day_numbers_are_kept_verbatim() {
        let it = TravelItinerary::parse(
            r#"{ "days": [{ "dayNumber": 1.5 }, { "dayNumber": -2 }, { "dayNumber": 3.0 }] }"#,
        )
        .unwrap();
        let labels: Vec<String> = it.days.iter().map(|d| d.day_number.to_string()).collect();
        assert_eq!(labels, ["1.5", "-2", "3"]);
    }

    #[test]
    fn integral_day_numbers_serialize_as_integers() {
        let day = DayPlan { day_number: 3.into(), ..Default::default() };
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["dayNumber"], serde_json::json!(3));
    }
}
