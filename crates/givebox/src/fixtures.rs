//! Built-in campaigns seeded into an empty store.

use crate::campaign::Campaign;

/// The campaigns every fresh store starts with.
#[must_use]
pub fn seed_campaigns() -> Vec<Campaign> {
    vec![
        Campaign {
            id: "1".to_string(),
            title: "Education for Underprivileged Children".to_string(),
            description: "Help provide quality education and school supplies to children in rural areas.".to_string(),
            category: "Education".to_string(),
            target_amount: 500_000,
            raised_amount: 350_000,
            donor_count: 234,
            image_url: "https://images.pexels.com/photos/8617843/pexels-photo-8617843.jpeg".to_string(),
            is_urgent: false,
            end_date: None,
            location: "Rural Rajasthan".to_string(),
        },
        Campaign {
            id: "2".to_string(),
            title: "Emergency Food Relief".to_string(),
            description: "Provide immediate food assistance to families affected by natural disasters.".to_string(),
            category: "Food & Nutrition".to_string(),
            target_amount: 200_000,
            raised_amount: 180_000,
            donor_count: 156,
            image_url: "https://images.pexels.com/photos/6646918/pexels-photo-6646918.jpeg".to_string(),
            is_urgent: true,
            end_date: None,
            location: "Flood-affected Kerala".to_string(),
        },
        Campaign {
            id: "3".to_string(),
            title: "Clean Water Initiative".to_string(),
            description: "Install water purification systems and build wells in water-scarce regions.".to_string(),
            category: "Water & Sanitation".to_string(),
            target_amount: 750_000,
            raised_amount: 420_000,
            donor_count: 289,
            image_url: "https://images.pexels.com/photos/1029615/pexels-photo-1029615.jpeg".to_string(),
            is_urgent: false,
            end_date: None,
            location: "Drought-hit Maharashtra".to_string(),
        },
    ]
}
