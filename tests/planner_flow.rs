use std::cell::RefCell;

use serde_json::{Value, json};

use atlas_voyager::api::ModelBackend;
use atlas_voyager::app::{App, Page};
use atlas_voyager::config::Config;
use atlas_voyager::error::{AppError, AppResult};
use atlas_voyager::model::{BudgetTier, PreferenceForm, Role};
use atlas_voyager::ui::assistant::AssistantPage;
use atlas_voyager::ui::{render_itinerary, timeline_labels};

/// Answers every call with `reply` and remembers the request bodies.
struct MockBackend {
    reply: AppResult<Value>,
    requests: RefCell<Vec<(String, Value)>>,
}

impl MockBackend {
    fn answering(text: String) -> Self {
        Self {
            reply: Ok(json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: Err(AppError::Request("connection refused".into())),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn prompt(&self, index: usize) -> String {
        self.requests.borrow()[index].1["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .to_string()
    }
}

impl ModelBackend for MockBackend {
    fn generate_content(&self, model: &str, body: &Value) -> AppResult<Value> {
        self.requests.borrow_mut().push((model.to_string(), body.clone()));
        match &self.reply {
            Ok(v) => Ok(v.clone()),
            Err(e) => Err(AppError::Request(e.to_string())),
        }
    }
}

fn itinerary_json(days: u32) -> String {
    let days: Vec<Value> = (1..=days)
        .map(|n| {
            json!({
                "dayNumber": n,
                "title": format!("Day in the medina {}", n),
                "theme": "Culture",
                "activities": [{ "time": "Morning", "description": "Walk the souks", "location": "Medina" }],
                "accommodation": "Riad",
                "meals": { "lunch": "Tagine", "dinner": "Harira" }
            })
        })
        .collect();
    json!({ "tripTitle": "Imperial Marrakech & Fes", "summary": "Two cities, five days.", "days": days })
        .to_string()
}

#[test]
fn marrakech_fes_five_day_plan() {
    let backend = MockBackend::answering(itinerary_json(5));
    let mut form = PreferenceForm::new();
    form.toggle_destination("Marrakech");
    form.toggle_destination("Fes");
    form.toggle_interest("Culture & History");
    form.set_duration(5);
    form.set_travelers(2);
    form.set_budget(BudgetTier::Balanced);
    let prefs = form.submit();

    let mut app = App::new();
    assert!(app.generate(&backend, &Config::default(), &prefs));

    let prompt = backend.prompt(0);
    for needle in ["5-day", "2 people", "Marrakech, Fes", "Balanced", "Culture & History"] {
        assert!(prompt.contains(needle), "prompt is missing {:?}", needle);
    }
    assert_eq!(backend.requests.borrow()[0].0, "gemini-2.5-flash");

    let itinerary = app.itinerary().unwrap();
    assert_eq!(
        timeline_labels(itinerary),
        ["Day 1", "Day 2", "Day 3", "Day 4", "Day 5"]
    );
    assert_eq!(app.page, Page::Itinerary);
    assert!(app.day_notice().is_none());
    assert!(render_itinerary(itinerary)[0].contains("Imperial Marrakech & Fes"));
}

#[test]
fn rejected_generation_shows_banner() {
    let backend = MockBackend::failing();
    let mut app = App::new();
    app.navigate(Page::Form);
    let ok = app.generate(&backend, &Config::default(), &PreferenceForm::new().submit());

    assert!(ok);
    assert!(!app.is_loading());
    assert!(app.itinerary().is_none());
    assert_eq!(app.page, Page::Form);
    assert_eq!(
        app.banner().message(),
        Some("We encountered an issue while consulting the spirits of travel. Please try again.")
    );
}

#[test]
fn unparsable_itinerary_is_a_generation_failure() {
    let backend = MockBackend::answering("Sorry, I can only answer in prose.".into());
    let mut app = App::new();
    app.generate(&backend, &Config::default(), &PreferenceForm::new().submit());
    assert!(app.itinerary().is_none());
    assert!(app.banner().is_visible());
}

#[test]
fn empty_days_render_header_only() {
    let backend = MockBackend::answering(
        json!({ "tripTitle": "Pending", "summary": "Nothing planned", "days": [] }).to_string(),
    );
    let mut app = App::new();
    app.generate(&backend, &Config::default(), &PreferenceForm::new().submit());
    let itinerary = app.itinerary().unwrap();
    assert!(timeline_labels(itinerary).is_empty());
    assert_eq!(render_itinerary(itinerary)[0], "Pending");
    assert_eq!(app.day_notice().map(|n| n.received), Some(0));
}

#[test]
fn result_arriving_after_reset_is_ignored() {
    let mut app = App::new();
    let prefs = PreferenceForm::new().submit();
    let ticket = app.begin_generation(&prefs);
    app.reset();

    let backend = MockBackend::answering(itinerary_json(7));
    let late = atlas_voyager::api::generate_travel_plan(&backend, &Config::default(), &prefs);
    assert!(!app.finish_generation(ticket, late));
    assert!(app.itinerary().is_none());
    assert_eq!(app.page, Page::Form);
}

#[test]
fn chat_failure_then_recovery() {
    let failing = MockBackend::failing();
    let mut page = AssistantPage::new("gemini-2.5-flash");
    assert!(page.send(&failing, "Is it hot in July?").is_err());

    let apology = page.transcript().last().unwrap();
    assert!(apology.failed);
    assert_eq!(
        apology.text,
        "I'm having trouble connecting to the spirits of the desert. Please try again."
    );

    let working = MockBackend::answering("Very, especially in the south.".into());
    page.send(&working, "And in the mountains?").unwrap();
    let contents = working.requests.borrow()[0].1["contents"].as_array().unwrap().clone();
    assert_eq!(contents.len(), 1, "failed exchange must not be sent as context");

    let last = page.transcript().last().unwrap();
    assert_eq!(last.role, Role::Assistant);
    assert!(!last.failed);
}
