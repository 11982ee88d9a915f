//! Render model for the activity roster: one card per activity plus the
//! options of the activity selector. Front ends draw from this model and
//! never from the raw [`Roster`].

use std::fmt;

use signup_shared::domain::{Activity, ActivityName, Roster};

pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";
pub const LOADING_TEXT: &str = "Loading activities...";
pub const LOAD_FAILED_TEXT: &str = "Failed to load activities. Please try again later.";
pub const NO_PARTICIPANTS_TEXT: &str = "No participants yet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParticipantsView {
    Empty,
    Listed(Vec<String>),
}

impl ParticipantsView {
    fn from_participants(participants: &[String]) -> Self {
        if participants.is_empty() {
            ParticipantsView::Empty
        } else {
            ParticipantsView::Listed(participants.to_vec())
        }
    }

    pub fn rows(&self) -> &[String] {
        match self {
            ParticipantsView::Empty => &[],
            ParticipantsView::Listed(rows) => rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: ActivityName,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: ParticipantsView,
}

impl ActivityCard {
    pub fn from_activity(name: &ActivityName, activity: &Activity) -> Self {
        Self {
            name: name.clone(),
            description: activity.description.clone(),
            schedule: activity.schedule.clone(),
            spots_left: activity.spots_left(),
            participants: ParticipantsView::from_participants(&activity.participants),
        }
    }

    pub fn availability_text(&self) -> String {
        format!("{} spots left", self.spots_left)
    }

    /// Drops the first row for `email`. The empty placeholder replaces the
    /// list once the last row is gone. Returns false if no row matched.
    pub fn remove_participant(&mut self, email: &str) -> bool {
        let ParticipantsView::Listed(rows) = &mut self.participants else {
            return false;
        };
        let Some(index) = rows.iter().position(|row| row == email) else {
            return false;
        };
        rows.remove(index);
        if rows.is_empty() {
            self.participants = ParticipantsView::Empty;
        }
        true
    }

    /// Re-derives availability from a freshly fetched copy of this activity.
    /// Participant rows are left as they are.
    pub fn refresh_availability(&mut self, activity: &Activity) {
        self.spots_left = activity.spots_left();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub value: ActivityName,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Cards(Vec<ActivityCard>),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterView {
    list: ListView,
    options: Vec<SelectorOption>,
}

impl Default for RosterView {
    fn default() -> Self {
        Self::new()
    }
}

impl RosterView {
    pub fn new() -> Self {
        Self {
            list: ListView::Loading,
            options: Vec::new(),
        }
    }

    /// Replaces cards and selector options with `roster`, discarding
    /// everything rendered before.
    pub fn render(&mut self, roster: &Roster) {
        let mut cards = Vec::with_capacity(roster.len());
        let mut options = Vec::with_capacity(roster.len());
        for (name, activity) in roster.iter() {
            cards.push(ActivityCard::from_activity(name, activity));
            options.push(SelectorOption {
                value: name.clone(),
                label: name.to_string(),
            });
        }
        self.list = ListView::Cards(cards);
        self.options = options;
    }

    /// Shows the failure text in place of the list. Selector options from the
    /// last successful render stay.
    pub fn render_failure(&mut self) {
        self.list = ListView::Failed;
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn cards(&self) -> &[ActivityCard] {
        match &self.list {
            ListView::Cards(cards) => cards,
            ListView::Loading | ListView::Failed => &[],
        }
    }

    pub fn card_mut(&mut self, name: &ActivityName) -> Option<&mut ActivityCard> {
        match &mut self.list {
            ListView::Cards(cards) => cards.iter_mut().find(|card| card.name == *name),
            ListView::Loading | ListView::Failed => None,
        }
    }

    /// Activity options, without the leading placeholder.
    pub fn options(&self) -> &[SelectorOption] {
        &self.options
    }

    pub fn has_option(&self, name: &ActivityName) -> bool {
        self.options.iter().any(|option| option.value == *name)
    }
}

impl fmt::Display for RosterView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = match &self.list {
            ListView::Loading => return writeln!(f, "{LOADING_TEXT}"),
            ListView::Failed => return writeln!(f, "{LOAD_FAILED_TEXT}"),
            ListView::Cards(cards) => cards,
        };
        for (index, card) in cards.iter().enumerate() {
            if index > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", card.name)?;
            writeln!(f, "  {}", card.description)?;
            writeln!(f, "  Schedule: {}", card.schedule)?;
            writeln!(f, "  Availability: {}", card.availability_text())?;
            match &card.participants {
                ParticipantsView::Empty => writeln!(f, "  {NO_PARTICIPANTS_TEXT}")?,
                ParticipantsView::Listed(rows) => {
                    writeln!(f, "  Participants:")?;
                    for row in rows {
                        writeln!(f, "    - {row}")?;
                    }
                }
            }
        }
        Ok(())
    }
}
