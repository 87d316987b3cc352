//! Volunteer opportunities and signups.
//!
//! Opportunities are a fixed board of upcoming events. Each has a head count
//! at publication plus a hard cap; signups recorded through the store add to
//! the head count and are refused once the cap is reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::campaign::{ALL_CATEGORIES, ALL_LOCATIONS};
use crate::donation::{email_regex, MIN_NAME_LEN};
use crate::error::{Error, Result};

/// An upcoming volunteering event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opportunity {
    /// Board identifier.
    pub id: u32,
    /// Short title.
    pub title: &'static str,
    /// What volunteers will do.
    pub description: &'static str,
    /// Cause area.
    pub category: &'static str,
    /// City and state.
    pub location: &'static str,
    /// Event date, `YYYY-MM-DD`.
    pub date: &'static str,
    /// Shift, as shown to volunteers.
    pub time: &'static str,
    /// Volunteers signed up so far.
    pub volunteers: u32,
    /// Most volunteers the event can take.
    pub max_volunteers: u32,
    /// Skills the organisers are looking for.
    pub skills: Vec<&'static str>,
    /// Needs volunteers soon.
    pub is_urgent: bool,
}

impl Opportunity {
    /// Places still open.
    #[must_use]
    pub fn spots_left(&self) -> u32 {
        self.max_volunteers.saturating_sub(self.volunteers)
    }

    /// No places left.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.spots_left() == 0
    }

    fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
            || self.skills.iter().any(|s| s.to_lowercase().contains(&term))
    }
}

/// The opportunities on the volunteer board, with their published head counts.
#[must_use]
pub fn opportunities() -> Vec<Opportunity> {
    vec![
        Opportunity {
            id: 1,
            title: "Food Distribution Drive",
            description: "Help distribute meals to homeless individuals in Mumbai",
            category: "Food & Nutrition",
            location: "Mumbai, Maharashtra",
            date: "2024-01-20",
            time: "10:00 AM - 2:00 PM",
            volunteers: 15,
            max_volunteers: 25,
            skills: vec!["Physical Work", "Communication"],
            is_urgent: true,
        },
        Opportunity {
            id: 2,
            title: "Teaching Assistant",
            description: "Assist teachers in rural schools with basic education",
            category: "Education",
            location: "Pune, Maharashtra",
            date: "2024-01-22",
            time: "9:00 AM - 3:00 PM",
            volunteers: 8,
            max_volunteers: 12,
            skills: vec!["Teaching", "Patience", "Hindi/English"],
            is_urgent: false,
        },
        Opportunity {
            id: 3,
            title: "Medical Camp Support",
            description: "Support medical professionals during health checkup camps",
            category: "Healthcare",
            location: "Delhi NCR",
            date: "2024-01-25",
            time: "8:00 AM - 4:00 PM",
            volunteers: 12,
            max_volunteers: 20,
            skills: vec!["Medical Background", "Organization"],
            is_urgent: false,
        },
        Opportunity {
            id: 4,
            title: "Digital Literacy Training",
            description: "Teach basic computer skills to elderly citizens",
            category: "Digital Literacy",
            location: "Bangalore, Karnataka",
            date: "2024-01-27",
            time: "2:00 PM - 6:00 PM",
            volunteers: 5,
            max_volunteers: 10,
            skills: vec!["Computer Skills", "Teaching", "Patience"],
            is_urgent: false,
        },
    ]
}

/// Filter criteria for the volunteer board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolunteerQuery {
    /// Case-insensitive substring matched against title, description and skills.
    pub search: Option<String>,
    /// Exact category; `None` or [`ALL_CATEGORIES`] matches everything.
    pub category: Option<String>,
    /// Case-insensitive location substring; `None` or [`ALL_LOCATIONS`]
    /// matches everything.
    pub location: Option<String>,
    /// Required skill, compared ignoring case.
    pub skill: Option<String>,
    /// Only urgent opportunities.
    pub urgent_only: bool,
    /// Hide opportunities with no places left.
    pub open_only: bool,
}

impl VolunteerQuery {
    /// Check whether an opportunity passes the filters.
    #[must_use]
    pub fn matches(&self, opportunity: &Opportunity) -> bool {
        let matches_search = self
            .search
            .as_deref()
            .map_or(true, |term| opportunity.matches_search(term));

        let matches_category = self
            .category
            .as_deref()
            .map_or(true, |c| c == ALL_CATEGORIES || c == opportunity.category);

        let matches_location = self.location.as_deref().map_or(true, |loc| {
            loc.eq_ignore_ascii_case(ALL_LOCATIONS)
                || opportunity
                    .location
                    .to_lowercase()
                    .contains(&loc.to_lowercase())
        });

        let matches_skill = self.skill.as_deref().map_or(true, |skill| {
            opportunity
                .skills
                .iter()
                .any(|s| s.eq_ignore_ascii_case(skill))
        });

        matches_search
            && matches_category
            && matches_location
            && matches_skill
            && (!self.urgent_only || opportunity.is_urgent)
            && (!self.open_only || !opportunity.is_full())
    }

    /// The opportunities that pass the filters, in board order.
    #[must_use]
    pub fn apply<'a>(&self, opportunities: &'a [Opportunity]) -> Vec<&'a Opportunity> {
        opportunities.iter().filter(|o| self.matches(o)).collect()
    }
}

/// A volunteer's details, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignupForm {
    /// Volunteer's name.
    pub name: String,
    /// Volunteer's email.
    pub email: String,
}

impl SignupForm {
    /// Validate the form, returning it with whitespace trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSignup`] naming the first offending field.
    pub fn validate(mut self) -> Result<Self> {
        self.name = self.name.trim().to_string();
        if self.name.chars().count() < MIN_NAME_LEN {
            return Err(Error::InvalidSignup {
                field: "name",
                message: format!("Name must be at least {MIN_NAME_LEN} characters"),
            });
        }

        self.email = self.email.trim().to_string();
        if !email_regex().is_match(&self.email) {
            return Err(Error::InvalidSignup {
                field: "email",
                message: "Please enter a valid email".to_string(),
            });
        }

        Ok(self)
    }
}

/// A recorded volunteer signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signup {
    /// Opportunity signed up for.
    pub opportunity_id: u32,
    /// Volunteer's name.
    pub name: String,
    /// Volunteer's email.
    pub email: String,
    /// When the signup was recorded.
    pub signed_up_at: DateTime<Utc>,
}

impl Signup {
    /// Record a validated form against an opportunity, now.
    #[must_use]
    pub fn new(opportunity_id: u32, form: SignupForm) -> Self {
        Self {
            opportunity_id,
            name: form.name,
            email: form.email,
            signed_up_at: Utc::now(),
        }
    }
}

/// The board with every recorded signup added to its opportunity's head count.
///
/// Signups for ids not on the board are ignored.
#[must_use]
pub fn board(signups: &[Signup]) -> Vec<Opportunity> {
    let mut board = opportunities();
    for opportunity in &mut board {
        let joined = signups
            .iter()
            .filter(|s| s.opportunity_id == opportunity.id)
            .count();
        opportunity.volunteers = opportunity
            .volunteers
            .saturating_add(u32::try_from(joined).unwrap_or(u32::MAX));
    }
    board
}

/// Check that `email` may join the opportunity with the given id.
///
/// # Errors
///
/// Returns [`Error::OpportunityNotFound`] for an id not on the board,
/// [`Error::OpportunityFull`] when no places are left, and
/// [`Error::AlreadySignedUp`] when the email (ignoring case) has already
/// joined.
pub fn check_signup(signups: &[Signup], opportunity_id: u32, email: &str) -> Result<()> {
    let board = board(signups);
    let opportunity = board
        .iter()
        .find(|o| o.id == opportunity_id)
        .ok_or_else(|| Error::OpportunityNotFound(opportunity_id.to_string()))?;

    if opportunity.is_full() {
        return Err(Error::OpportunityFull {
            id: opportunity_id,
            capacity: opportunity.max_volunteers,
        });
    }

    if signups
        .iter()
        .any(|s| s.opportunity_id == opportunity_id && s.email.eq_ignore_ascii_case(email))
    {
        return Err(Error::AlreadySignedUp {
            id: opportunity_id,
            email: email.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn form(name: &str, email: &str) -> SignupForm {
        SignupForm {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn signup(opportunity_id: u32, n: u32) -> Signup {
        Signup::new(opportunity_id, form("Volunteer", &format!("v{n}@example.org")))
    }

    #[test]
    fn test_board_ids_unique_and_not_full() {
        let board = opportunities();
        let ids: HashSet<_> = board.iter().map(|o| o.id).collect();
        assert_eq!(ids.len(), board.len());
        assert!(board.iter().all(|o| !o.is_full()));
        assert_eq!(board[0].spots_left(), 10);
    }

    #[test]
    fn test_board_counts_signups() {
        let signups = vec![signup(4, 1), signup(4, 2), signup(2, 3), signup(99, 4)];
        let board = board(&signups);
        assert_eq!(board[3].volunteers, 7);
        assert_eq!(board[1].volunteers, 9);
        assert_eq!(board[0].volunteers, 15);
    }

    #[test]
    fn test_query_search_covers_skills() {
        let board = opportunities();
        let query = VolunteerQuery {
            search: Some("patience".to_string()),
            ..VolunteerQuery::default()
        };
        let ids: Vec<u32> = query.apply(&board).iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_query_filters() {
        let board = opportunities();

        let urgent = VolunteerQuery {
            urgent_only: true,
            ..VolunteerQuery::default()
        };
        assert_eq!(urgent.apply(&board).len(), 1);

        let maharashtra = VolunteerQuery {
            location: Some("maharashtra".to_string()),
            ..VolunteerQuery::default()
        };
        assert_eq!(maharashtra.apply(&board).len(), 2);

        let teaching = VolunteerQuery {
            skill: Some("TEACHING".to_string()),
            category: Some("Education".to_string()),
            ..VolunteerQuery::default()
        };
        assert_eq!(teaching.apply(&board)[0].id, 2);
    }

    #[test]
    fn test_query_sentinels_match_everything() {
        let board = opportunities();
        let query = VolunteerQuery {
            category: Some(ALL_CATEGORIES.to_string()),
            location: Some(ALL_LOCATIONS.to_string()),
            ..VolunteerQuery::default()
        };
        assert_eq!(query.apply(&board).len(), board.len());
    }

    #[test]
    fn test_query_open_only_hides_full() {
        let signups: Vec<Signup> = (0..5).map(|n| signup(4, n)).collect();
        let board = board(&signups);
        assert!(board[3].is_full());

        let open = VolunteerQuery {
            open_only: true,
            ..VolunteerQuery::default()
        };
        assert!(open.apply(&board).iter().all(|o| o.id != 4));
    }

    #[test]
    fn test_form_validation() {
        let valid = form("  Ravi  ", " ravi@example.org ").validate().unwrap();
        assert_eq!(valid.name, "Ravi");
        assert_eq!(valid.email, "ravi@example.org");

        let err = form("R", "ravi@example.org").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidSignup { field: "name", .. }));

        let err = form("Ravi", "not-an-email").validate().unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_check_signup_enforces_capacity() {
        let mut signups: Vec<Signup> = (0..4).map(|n| signup(4, n)).collect();
        assert!(check_signup(&signups, 4, "last@example.org").is_ok());

        signups.push(signup(4, 4));
        let err = check_signup(&signups, 4, "late@example.org").unwrap_err();
        assert!(matches!(err, Error::OpportunityFull { id: 4, capacity: 10 }));
    }

    #[test]
    fn test_check_signup_rejects_duplicate_and_unknown() {
        let signups = vec![signup(1, 7)];
        let err = check_signup(&signups, 1, "V7@Example.org").unwrap_err();
        assert!(matches!(err, Error::AlreadySignedUp { id: 1, .. }));
        assert!(check_signup(&signups, 2, "v7@example.org").is_ok());

        assert!(check_signup(&signups, 42, "a@b.co").unwrap_err().is_not_found());
    }
}
