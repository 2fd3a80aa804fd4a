//! Plain data carried between the form, the model calls and the renderer.

pub mod chat;
pub mod itinerary;
pub mod preferences;

pub use chat::{ChatMessage, Role, Transcript};
pub use itinerary::{Activity, DayNumber, DayPlan, Meals, TravelItinerary};
pub use preferences::{BudgetTier, PreferenceForm, TravelPreferences, CITIES, INTERESTS};
