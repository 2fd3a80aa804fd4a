//! Travel preferences and the form state that builds them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CITIES: [&str; 8] = [
    "Marrakech",
    "Fes",
    "Chefchaouen",
    "Casablanca",
    "Essaouira",
    "Merzouga (Desert)",
    "Tangier",
    "Atlas Mountains",
];

pub const INTERESTS: [&str; 6] = [
    "Culture & History",
    "Food & Dining",
    "Adventure & Hiking",
    "Relaxation & Spa",
    "Photography",
    "Shopping (Souks)",
];

/// Catalogue spelling of `name`, matched case-insensitively.
pub fn catalogue_entry(catalogue: &[&'static str], name: &str) -> Option<&'static str> {
    let name = name.trim();
    catalogue.iter().copied().find(|entry| entry.eq_ignore_ascii_case(name))
}

pub const MIN_DURATION: u32 = 3;
pub const MAX_DURATION: u32 = 21;
pub const MIN_TRAVELERS: u32 = 1;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BudgetTier {
    Luxury,
    Budget,
    #[default]
    Balanced,
    Adventure,
}

impl BudgetTier {
    pub const ALL: [BudgetTier; 4] = [
        BudgetTier::Luxury,
        BudgetTier::Budget,
        BudgetTier::Balanced,
        BudgetTier::Adventure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetTier::Luxury => "Luxury",
            BudgetTier::Budget => "Budget",
            BudgetTier::Balanced => "Balanced",
            BudgetTier::Adventure => "Adventure",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BudgetTier::ALL
            .into_iter()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown budget tier '{}'", s))
    }
}

/// A submitted set of preferences. Built only through [`PreferenceForm::submit`].
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TravelPreferences {
    pub destinations: Vec<String>,
    pub duration: u32,
    pub travelers: u32,
    pub budget: BudgetTier,
    pub interests: Vec<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreferenceForm {
    destinations: Vec<String>,
    duration: u32,
    travelers: u32,
    budget: BudgetTier,
    interests: Vec<String>,
    notes: String,
}

impl Default for PreferenceForm {
    fn default() -> Self {
        Self {
            destinations: Vec::new(),
            duration: 7,
            travelers: 2,
            budget: BudgetTier::Balanced,
            interests: Vec::new(),
            notes: String::new(),
        }
    }
}

fn select(list: &mut Vec<String>, item: &str) {
    if !list.iter().any(|i| i == item) {
        list.push(item.to_string());
    }
}

fn toggle(list: &mut Vec<String>, item: &str) {
    if let Some(pos) = list.iter().position(|i| i == item) {
        list.remove(pos);
    } else {
        list.push(item.to_string());
    }
}

impl PreferenceForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_destination(&mut self, city: &str) {
        toggle(&mut self.destinations, city);
    }

    pub fn toggle_interest(&mut self, interest: &str) {
        toggle(&mut self.interests, interest);
    }

    /// Adds `city` unless it is already chosen.
    pub fn select_destination(&mut self, city: &str) {
        select(&mut self.destinations, city);
    }

    pub fn select_interest(&mut self, interest: &str) {
        select(&mut self.interests, interest);
    }

    pub fn set_duration(&mut self, days: u32) {
        self.duration = days.clamp(MIN_DURATION, MAX_DURATION);
    }

    pub fn set_travelers(&mut self, count: u32) {
        self.travelers = count.max(MIN_TRAVELERS);
    }

    pub fn increment_travelers(&mut self) {
        self.travelers = self.travelers.saturating_add(1);
    }

    pub fn decrement_travelers(&mut self) {
        self.travelers = self.travelers.saturating_sub(1).max(MIN_TRAVELERS);
    }

    pub fn set_budget(&mut self, budget: BudgetTier) {
        self.budget = budget;
    }

    pub fn set_notes(&mut self, notes: &str) {
        self.notes = notes.to_string();
    }

    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn travelers(&self) -> u32 {
        self.travelers
    }

    pub fn budget(&self) -> BudgetTier {
        self.budget
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn is_destination_selected(&self, city: &str) -> bool {
        self.destinations.iter().any(|c| c == city)
    }

    pub fn is_interest_selected(&self, interest: &str) -> bool {
        self.interests.iter().any(|i| i == interest)
    }

    pub fn submit(self) -> TravelPreferences {
        let notes = self.notes.trim();
        TravelPreferences {
            destinations: self.destinations,
            duration: self.duration,
            travelers: self.travelers,
            budget: self.budget,
            interests: self.interests,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        }
    }
}
