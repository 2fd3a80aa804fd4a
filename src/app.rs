//! Application state shared by the terminal pages.

use std::fmt;

use crate::api::{ModelBackend, generate_travel_plan};
use crate::config::Config;
use crate::error::AppResult;
use crate::model::{TravelItinerary, TravelPreferences};
use crate::ui::banner::{Banner, Reporter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Home,
    Form,
    Itinerary,
    Assistant,
    About,
}

/// Identifies one generation request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Hands out tickets; only the latest one is current.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
    pending: bool,
}

impl RequestTracker {
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        self.pending = true;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.pending && ticket.0 == self.latest
    }

    /// Marks every outstanding ticket stale.
    pub fn invalidate(&mut self) {
        self.latest += 1;
        self.pending = false;
    }

    fn complete(&mut self) {
        self.pending = false;
    }
}

/// The model returned a different number of days than were asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayCountNotice {
    pub requested: u32,
    pub received: usize,
}

impl fmt::Display for DayCountNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "You asked for {} days; the plan below covers {}.",
            self.requested, self.received
        )
    }
}

#[derive(Debug, Default)]
pub struct App {
    pub page: Page,
    itinerary: Option<TravelItinerary>,
    loading: bool,
    banner: Banner,
    tracker: RequestTracker,
    requested_days: Option<u32>,
    day_notice: Option<DayCountNotice>,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn itinerary(&self) -> Option<&TravelItinerary> {
        self.itinerary.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }

    pub fn reporter(&mut self) -> &mut dyn Reporter {
        &mut self.banner
    }

    pub fn day_notice(&self) -> Option<DayCountNotice> {
        self.day_notice
    }

    pub fn navigate(&mut self, page: Page) {
        if page != self.page {
            if self.loading {
                crate::log_info!("[App] Leaving {:?}, dropping pending generation", self.page);
                self.tracker.invalidate();
                self.loading = false;
            }
            self.banner.clear();
        }
        self.page = page;
    }

    pub fn begin_generation(&mut self, prefs: &TravelPreferences) -> Ticket {
        self.loading = true;
        self.banner.clear();
        self.requested_days = Some(prefs.duration);
        self.tracker.begin()
    }

    /// Applies a generation result if `ticket` is still current. Returns
    /// whether it was applied.
    pub fn finish_generation(&mut self, ticket: Ticket, result: AppResult<TravelItinerary>) -> bool {
        if !self.tracker.is_current(ticket) {
            crate::log_info!("[App] Dropping stale generation result {:?}", ticket);
            return false;
        }
        self.tracker.complete();
        self.loading = false;

        match result {
            Ok(itinerary) => {
                self.day_notice = self
                    .requested_days
                    .filter(|&requested| requested as usize != itinerary.days.len())
                    .map(|requested| DayCountNotice {
                        requested,
                        received: itinerary.days.len(),
                    });
                if let Some(notice) = self.day_notice {
                    crate::log_info!("[App] Day count mismatch: {}", notice);
                }
                self.itinerary = Some(itinerary);
                self.page = Page::Itinerary;
            }
            Err(e) => {
                crate::log_error!("[App] Generation failed: {}", e);
                self.itinerary = None;
                self.banner.report(&e);
            }
        }
        true
    }

    /// Runs one generation to completion on the calling thread.
    pub fn generate(
        &mut self,
        backend: &dyn ModelBackend,
        config: &Config,
        prefs: &TravelPreferences,
    ) -> bool {
        let ticket = self.begin_generation(prefs);
        let result = generate_travel_plan(backend, config, prefs);
        self.finish_generation(ticket, result)
    }

    /// Discards the itinerary and returns to the form.
    pub fn reset(&mut self) {
        self.tracker.invalidate();
        self.itinerary = None;
        self.loading = false;
        self.day_notice = None;
        self.requested_days = None;
        self.banner.clear();
        self.page = Page::Form;
    }
}
