//! Status message banner with a single auto-hide deadline.
//!
//! Showing a message replaces whatever the banner held before, including its
//! hide deadline. There is only ever one pending hide, so an older message's
//! timer can never hide a newer message.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BannerState {
    Hidden,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct MessageBanner {
    state: BannerState,
    hide_at: Option<Instant>,
    hide_after: Duration,
}

impl MessageBanner {
    pub fn new(hide_after: Duration) -> Self {
        Self {
            state: BannerState::Hidden,
            hide_at: None,
            hide_after,
        }
    }

    pub fn show_success(&mut self, text: impl Into<String>, now: Instant) {
        self.show(BannerState::Success(text.into()), now);
    }

    pub fn show_error(&mut self, text: impl Into<String>, now: Instant) {
        self.show(BannerState::Error(text.into()), now);
    }

    /// A delay too large to represent as an `Instant` leaves the message up
    /// until it is dismissed or replaced.
    fn show(&mut self, state: BannerState, now: Instant) {
        self.state = state;
        self.hide_at = now.checked_add(self.hide_after);
    }

    /// Advances the timer. Returns true when this call hid the banner.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.dismiss();
                true
            }
            _ => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.state = BannerState::Hidden;
        self.hide_at = None;
    }

    pub fn state(&self) -> &BannerState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state != BannerState::Hidden
    }

    pub fn text(&self) -> Option<&str> {
        match &self.state {
            BannerState::Hidden => None,
            BannerState::Success(text) | BannerState::Error(text) => Some(text),
        }
    }

    /// Time until the pending hide, for scheduling the next repaint.
    pub fn time_until_hide(&self, now: Instant) -> Option<Duration> {
        self.hide_at
            .map(|deadline| deadline.saturating_duration_since(now))
    }
}
