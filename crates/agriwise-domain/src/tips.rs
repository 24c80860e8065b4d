//! Static farming tips

use serde::{Deserialize, Serialize};

/// Crop marker meaning "applies to every crop"
pub const ALL_CROPS: &str = "all";

/// Tip importance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Nice to know
    Low,
    /// Worth acting on
    Medium,
    /// Act now
    High,
}

/// One farming tip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmingTip {
    /// Short title
    pub title: String,
    /// Tip body
    pub content: String,
    /// Topic (irrigation, soil_management, ...)
    pub category: String,
    /// Importance
    pub priority: Priority,
    /// Crops the tip is relevant to, or `["all"]`
    pub applicable_crops: Vec<String>,
}

impl FarmingTip {
    fn new(
        title: &str,
        content: &str,
        category: &str,
        priority: Priority,
        applicable_crops: &[&str],
    ) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            category: category.to_string(),
            priority,
            applicable_crops: applicable_crops.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Whether the tip applies to `crop`
    pub fn applies_to(&self, crop: &str) -> bool {
        self.applicable_crops
            .iter()
            .any(|c| c == ALL_CROPS || c.eq_ignore_ascii_case(crop))
    }
}

/// The full tip catalog
pub fn catalog() -> Vec<FarmingTip> {
    vec![
        FarmingTip::new(
            "Water Conservation",
            "Use drip irrigation systems to reduce water wastage by up to 60%.",
            "irrigation",
            Priority::High,
            &["maize", "beans", "tomatoes"],
        ),
        FarmingTip::new(
            "Soil Health",
            "Practice crop rotation and use organic fertilizers to maintain soil fertility.",
            "soil_management",
            Priority::High,
            &[ALL_CROPS],
        ),
        FarmingTip::new(
            "Pest Management",
            "Use integrated pest management techniques to reduce chemical use.",
            "pest_control",
            Priority::Medium,
            &["tomatoes", "beans"],
        ),
        FarmingTip::new(
            "Market Timing",
            "Monitor market prices and plan harvest timing for maximum profit.",
            "marketing",
            Priority::Medium,
            &[ALL_CROPS],
        ),
    ]
}

/// Tips for an optional crop and season
///
/// The season is accepted for forward compatibility; no tip is seasonal yet,
/// so it does not filter anything.
pub fn farming_tips(crop_type: Option<&str>, _season: Option<&str>) -> Vec<FarmingTip> {
    let tips = catalog();

    match crop_type {
        Some(crop) if !crop.trim().is_empty() => tips
            .into_iter()
            .filter(|tip| tip.applies_to(crop.trim()))
            .collect(),
        _ => tips,
    }
}
