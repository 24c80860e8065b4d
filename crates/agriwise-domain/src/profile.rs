//! Farmer profile - the input to a loan assessment

use crate::ValidationError;
use serde::{Deserialize, Serialize};

/// Lowest credit score accepted by validation
pub const MIN_CREDIT_SCORE: i32 = 300;

/// Highest credit score accepted by validation
pub const MAX_CREDIT_SCORE: i32 = 850;

/// Self-reported income band
///
/// Deserialization goes through [`IncomeLevel::parse`], so JSON and query
/// input accept the same spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum IncomeLevel {
    /// Low income (a risk indicator)
    Low,
    /// Medium income
    Medium,
    /// High income
    High,
}

impl IncomeLevel {
    /// Get the income level name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeLevel::Low => "low",
            IncomeLevel::Medium => "medium",
            IncomeLevel::High => "high",
        }
    }

    /// Parse an income level (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(IncomeLevel::Low),
            "medium" => Some(IncomeLevel::Medium),
            "high" => Some(IncomeLevel::High),
            _ => None,
        }
    }
}

impl std::str::FromStr for IncomeLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::UnknownIncomeLevel(s.to_string()))
    }
}

impl TryFrom<String> for IncomeLevel {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Crops the assistant knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum CropType {
    /// Maize
    Maize,
    /// Beans
    Beans,
    /// Tomatoes
    Tomatoes,
    /// Potatoes
    Potatoes,
}

impl CropType {
    /// All supported crops, in catalog order
    pub const ALL: [CropType; 4] = [
        CropType::Maize,
        CropType::Beans,
        CropType::Tomatoes,
        CropType::Potatoes,
    ];

    /// Get the crop identifier as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Maize => "maize",
            CropType::Beans => "beans",
            CropType::Tomatoes => "tomatoes",
            CropType::Potatoes => "potatoes",
        }
    }

    /// Parse a crop identifier (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "maize" => Some(CropType::Maize),
            "beans" => Some(CropType::Beans),
            "tomatoes" => Some(CropType::Tomatoes),
            "potatoes" => Some(CropType::Potatoes),
            _ => None,
        }
    }
}

impl std::str::FromStr for CropType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::UnsupportedCrop(s.to_string()))
    }
}

impl TryFrom<String> for CropType {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Farmer profile consumed once per assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmerProfile {
    /// Farm size in acres (> 0)
    pub farm_size: f64,
    /// Main crop grown
    pub crop_type: CropType,
    /// Years of farming experience
    pub experience_years: u32,
    /// Number of loans taken before
    pub previous_loans: u32,
    /// Credit score (300-850)
    pub credit_score: i32,
    /// Income band
    pub income_level: IncomeLevel,
    /// Free-form location, unused by scoring
    #[serde(default)]
    pub location: String,
}

impl FarmerProfile {
    /// Check every field against its documented domain
    ///
    /// # Errors
    /// Returns the first field found outside its domain
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.farm_size.is_finite() || self.farm_size <= 0.0 {
            return Err(ValidationError::NonPositiveFarmSize(self.farm_size));
        }

        if !(MIN_CREDIT_SCORE..=MAX_CREDIT_SCORE).contains(&self.credit_score) {
            return Err(ValidationError::CreditScoreOutOfRange {
                min: MIN_CREDIT_SCORE,
                max: MAX_CREDIT_SCORE,
                actual: self.credit_score,
            });
        }

        Ok(())
    }
}
