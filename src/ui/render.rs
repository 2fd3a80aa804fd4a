//! Plain-text layout of an itinerary.

use crate::model::{DayPlan, TravelItinerary};

const WIDTH: usize = 76;

pub const NARRATION_HINT: &str = "Press [n] to hear a spoken summary of your trip.";

/// One label per day, in the order received.
pub fn timeline_labels(itinerary: &TravelItinerary) -> Vec<String> {
    itinerary
        .days
        .iter()
        .map(|day| format!("Day {}", day.day_number))
        .collect()
}

fn wrap_into(lines: &mut Vec<String>, text: &str, indent: &str) {
    let options = textwrap::Options::new(WIDTH)
        .initial_indent(indent)
        .subsequent_indent(indent);
    lines.extend(textwrap::wrap(text, options).into_iter().map(|l| l.into_owned()));
}

fn render_day(lines: &mut Vec<String>, day: &DayPlan) {
    let heading = if day.title.is_empty() {
        format!("Day {}", day.day_number)
    } else {
        format!("Day {}: {}", day.day_number, day.title)
    };
    lines.push(heading);
    if !day.theme.is_empty() {
        wrap_into(lines, &day.theme, "   ");
    }

    for activity in &day.activities {
        let mut text = format!("{}  {}", activity.time, activity.description);
        if let Some(location) = activity.location.as_deref().filter(|l| !l.is_empty()) {
            text.push_str(&format!(" ({})", location));
        }
        wrap_into(lines, &text, "   * ");
    }

    if !day.accommodation.is_empty() {
        wrap_into(lines, &format!("Stay: {}", day.accommodation), "   ");
    }
    if !day.meals.lunch.is_empty() {
        wrap_into(lines, &format!("Lunch: {}", day.meals.lunch), "   ");
    }
    if !day.meals.dinner.is_empty() {
        wrap_into(lines, &format!("Dinner: {}", day.meals.dinner), "   ");
    }
}

/// Header (title, quoted summary, narration hint) followed by one timeline
/// entry per day. Day labels come from the data and are not renumbered.
pub fn render_itinerary(itinerary: &TravelItinerary) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(itinerary.trip_title.clone());
    lines.push("=".repeat(itinerary.trip_title.chars().count().clamp(3, WIDTH)));
    wrap_into(&mut lines, &format!("\"{}\"", itinerary.summary), "");
    lines.push(NARRATION_HINT.to_string());

    for day in &itinerary.days {
        lines.push(String::new());
        render_day(&mut lines, day);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activity, Meals};

    fn day(n: u32) -> DayPlan {
        DayPlan {
            day_number: n.into(),
            title: format!("Title {}", n),
            theme: "Medina walks".into(),
            activities: vec![Activity {
                time: "Morning".into(),
                description: "Visit the Bahia Palace".into(),
                location: Some("Marrakech".into()),
            }],
            accommodation: "Riad Yasmine".into(),
            meals: Meals { lunch: "Tagine".into(), dinner: "Couscous".into() },
        }
    }

    #[test]
    fn one_heading_per_day_in_array_order() {
        let itinerary = TravelItinerary {
            trip_title: "Imperial Cities".into(),
            summary: "A loop".into(),
            days: vec![day(2), day(1), day(7)],
        };
        let lines = render_itinerary(&itinerary);
        let headings: Vec<&String> = lines.iter().filter(|l| l.starts_with("Day ")).collect();
        assert_eq!(headings, ["Day 2: Title 2", "Day 1: Title 1", "Day 7: Title 7"]);
        assert_eq!(timeline_labels(&itinerary), ["Day 2", "Day 1", "Day 7"]);
        assert!(lines.iter().any(|l| l.contains("Visit the Bahia Palace (Marrakech)")));
        assert!(lines.iter().any(|l| l.contains("Stay: Riad Yasmine")));
    }

    #[test]
    fn fractional_day_number_is_rendered_as_received() {
        let mut half = day(2);
        half.day_number = crate::model::DayNumber(2.5);
        let itinerary = TravelItinerary { days: vec![day(1), half], ..Default::default() };
        assert_eq!(timeline_labels(&itinerary), ["Day 1", "Day 2.5"]);
    }

    #[test]
    fn empty_days_still_render_header() {
        let itinerary = TravelItinerary {
            trip_title: "Nothing yet".into(),
            summary: "Quiet".into(),
            days: vec![],
        };
        let lines = render_itinerary(&itinerary);
        assert_eq!(lines[0], "Nothing yet");
        assert!(lines.contains(&"\"Quiet\"".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some(NARRATION_HINT));
        assert!(timeline_labels(&itinerary).is_empty());
    }
}
