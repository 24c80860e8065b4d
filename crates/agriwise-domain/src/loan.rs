//! Loan risk assessment
//!
//! Scores a farmer profile against five risk indicators, perturbs the score
//! with Gaussian noise, and derives the eligibility decision, the loan
//! ceiling and the human-readable explanation:
//! 1. Risk scoring (indicator count / 5, plus noise, upper clamp)
//! 2. Eligibility decision
//! 3. Loan-amount sizing by risk tier
//! 4. Confidence (informational)
//! 5. Factors and recommendations
//!
//! Everything except the noise term is a pure function of the profile.

use crate::{FarmerProfile, IncomeLevel, LoanAssessor, ValidationError};
use rand::{Rng, RngCore};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Scores at or above this are not eligible
pub const ELIGIBILITY_THRESHOLD: f64 = 0.7;

/// Currency units (KES) lent per acre before risk adjustment
pub const AMOUNT_PER_ACRE: f64 = 50_000.0;

/// Standard deviation of the score perturbation
pub const NOISE_STD_DEV: f64 = 0.1;

/// Upper clamp applied after the perturbation
pub const MAX_RISK_SCORE: f64 = 1.0;

/// Number of risk indicators contributing to the score
pub const INDICATOR_COUNT: usize = 5;

/// Factor text for a farm under the small-farm threshold
pub const FACTOR_SMALL_FARM: &str = "Small farm size";
/// Factor text for limited experience
pub const FACTOR_LIMITED_EXPERIENCE: &str = "Limited farming experience";
/// Factor text for a low credit score
pub const FACTOR_LOW_CREDIT: &str = "Low credit score";
/// Factor text for low income
pub const FACTOR_LOW_INCOME: &str = "Low income level";

/// Recommendation for limited experience
pub const RECOMMEND_TRAINING: &str = "Consider farming training programs";
/// Recommendation for a low credit score
pub const RECOMMEND_CREDIT_HISTORY: &str = "Improve credit history with small loans";
/// Recommendation for a small farm
pub const RECOMMEND_EXPAND_FARM: &str = "Consider expanding farm size gradually";

/// Policy constants for loan assessment
///
/// `Default` is the production policy. Every field can be overridden from the
/// server's `[loan_policy]` config table; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanPolicy {
    /// Scores strictly below this are eligible
    pub eligibility_threshold: f64,
    /// Currency units per acre
    pub amount_per_acre: f64,
    /// Standard deviation of the Gaussian perturbation (0 disables noise)
    pub noise_std_dev: f64,
    /// Scores below this are in the low tier
    pub low_tier_upper: f64,
    /// Scores below this (and at or above `low_tier_upper`) are moderate
    pub moderate_tier_upper: f64,
    /// Multiplier for the low tier
    pub low_tier_multiplier: f64,
    /// Multiplier for the moderate tier
    pub moderate_tier_multiplier: f64,
    /// Multiplier for the high tier
    pub high_tier_multiplier: f64,
    /// Farms under this many acres are small
    pub small_farm_acres: f64,
    /// Farmers with fewer years than this are inexperienced
    pub min_experience_years: u32,
    /// Farmers with more loans than this are over-leveraged
    pub max_previous_loans: u32,
    /// Credit scores below this are a risk
    pub min_credit_score: i32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            eligibility_threshold: ELIGIBILITY_THRESHOLD,
            amount_per_acre: AMOUNT_PER_ACRE,
            noise_std_dev: NOISE_STD_DEV,
            low_tier_upper: 0.3,
            moderate_tier_upper: 0.6,
            low_tier_multiplier: 1.5,
            moderate_tier_multiplier: 1.0,
            high_tier_multiplier: 0.5,
            small_farm_acres: 2.0,
            min_experience_years: 3,
            max_previous_loans: 2,
            min_credit_score: 600,
        }
    }
}

/// Risk band driving the loan-amount multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// score < 0.3
    Low,
    /// 0.3 <= score < 0.6
    Moderate,
    /// score >= 0.6
    High,
}

impl RiskTier {
    /// Classify a (clamped) risk score
    pub fn from_score(score: f64, policy: &LoanPolicy) -> Self {
        if score < policy.low_tier_upper {
            RiskTier::Low
        } else if score < policy.moderate_tier_upper {
            RiskTier::Moderate
        } else {
            RiskTier::High
        }
    }

    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "low",
            RiskTier::Moderate => "moderate",
            RiskTier::High => "high",
        }
    }
}

/// The five boolean risk indicators for one profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RiskIndicators {
    /// farm_size below the small-farm threshold
    pub small_farm: bool,
    /// experience_years below the minimum
    pub inexperienced: bool,
    /// previous_loans above the maximum
    pub over_leveraged: bool,
    /// credit_score below the minimum
    pub poor_credit: bool,
    /// income_level is low
    pub low_income: bool,
}

impl RiskIndicators {
    /// Evaluate every indicator against the profile
    pub fn evaluate(profile: &FarmerProfile, policy: &LoanPolicy) -> Self {
        Self {
            small_farm: profile.farm_size < policy.small_farm_acres,
            inexperienced: profile.experience_years < policy.min_experience_years,
            over_leveraged: profile.previous_loans > policy.max_previous_loans,
            poor_credit: profile.credit_score < policy.min_credit_score,
            low_income: profile.income_level == IncomeLevel::Low,
        }
    }

    /// Number of indicators that fired
    pub fn triggered_count(&self) -> usize {
        [
            self.small_farm,
            self.inexperienced,
            self.over_leveraged,
            self.poor_credit,
            self.low_income,
        ]
        .iter()
        .filter(|&&fired| fired)
        .count()
    }

    /// Score before noise: fraction of indicators that fired
    pub fn deterministic_score(&self) -> f64 {
        self.triggered_count() as f64 / INDICATOR_COUNT as f64
    }
}

/// Loan decision derived from one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// True iff `risk_score` is below the eligibility threshold
    pub eligible: bool,
    /// Aggregated, perturbed and upper-clamped risk
    pub risk_score: f64,
    /// Capped loan ceiling in whole currency units
    pub recommended_amount: u64,
    /// Informational confidence, 3 decimal places
    pub confidence: f64,
    /// Tier that selected the amount multiplier
    pub risk_tier: RiskTier,
    /// Triggered risk conditions
    pub factors: Vec<String>,
    /// Suggested mitigations
    pub recommendations: Vec<String>,
}

impl LoanPolicy {
    /// Check that the policy constants are usable
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidPolicy`] describing the first problem
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.noise_std_dev.is_finite() || self.noise_std_dev < 0.0 {
            return Err(ValidationError::InvalidPolicy(format!(
                "noise_std_dev must be finite and >= 0, got {}",
                self.noise_std_dev
            )));
        }

        if !self.amount_per_acre.is_finite() || self.amount_per_acre < 0.0 {
            return Err(ValidationError::InvalidPolicy(format!(
                "amount_per_acre must be finite and >= 0, got {}",
                self.amount_per_acre
            )));
        }

        if self.low_tier_upper > self.moderate_tier_upper {
            return Err(ValidationError::InvalidPolicy(format!(
                "low_tier_upper ({}) must not exceed moderate_tier_upper ({})",
                self.low_tier_upper, self.moderate_tier_upper
            )));
        }

        let multipliers = [
            self.low_tier_multiplier,
            self.moderate_tier_multiplier,
            self.high_tier_multiplier,
        ];
        if multipliers.iter().any(|m| !m.is_finite() || *m < 0.0) {
            return Err(ValidationError::InvalidPolicy(
                "tier multipliers must be finite and >= 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Step 1a: deterministic score plus Gaussian noise, not clamped
    pub fn raw_score<R: Rng + ?Sized>(&self, indicators: &RiskIndicators, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        indicators.deterministic_score() + z * self.noise_std_dev
    }

    /// Step 1b: clamp the perturbed score from above only
    ///
    /// Scores below zero pass through unchanged, so a noise-dominated
    /// low-risk profile can report a negative score and a confidence above
    /// 1.0. This matches the established scoring behavior and is pending a
    /// product decision.
    pub fn clamp_score(raw: f64) -> f64 {
        raw.min(MAX_RISK_SCORE)
    }

    /// Step 2: eligibility decision
    pub fn is_eligible(&self, score: f64) -> bool {
        score < self.eligibility_threshold
    }

    /// Amount multiplier for a tier
    pub fn multiplier(&self, tier: RiskTier) -> f64 {
        match tier {
            RiskTier::Low => self.low_tier_multiplier,
            RiskTier::Moderate => self.moderate_tier_multiplier,
            RiskTier::High => self.high_tier_multiplier,
        }
    }

    /// Step 3: loan ceiling, `floor(farm_size * per_acre * multiplier)`
    pub fn recommended_amount(&self, farm_size: f64, score: f64) -> u64 {
        let base_amount = farm_size * self.amount_per_acre;
        let tier = RiskTier::from_score(score, self);
        let amount = (base_amount * self.multiplier(tier)).floor();

        if amount.is_finite() && amount > 0.0 {
            amount as u64
        } else {
            0
        }
    }

    /// Step 4: informational confidence rounded to 3 decimal places
    pub fn confidence(&self, score: f64) -> f64 {
        round_to_3(0.85 + (1.0 - score) * 0.15)
    }

    /// Step 5a: triggered risk conditions
    ///
    /// Order: farm size, experience, credit score, income level. The
    /// over-leveraged indicator (`previous_loans`) raises the score but has
    /// no factor text; that asymmetry is intentional until product decides
    /// otherwise.
    pub fn risk_factors(&self, profile: &FarmerProfile) -> Vec<String> {
        let indicators = RiskIndicators::evaluate(profile, self);
        let mut factors = Vec::new();

        if indicators.small_farm {
            factors.push(FACTOR_SMALL_FARM.to_string());
        }
        if indicators.inexperienced {
            factors.push(FACTOR_LIMITED_EXPERIENCE.to_string());
        }
        if indicators.poor_credit {
            factors.push(FACTOR_LOW_CREDIT.to_string());
        }
        if indicators.low_income {
            factors.push(FACTOR_LOW_INCOME.to_string());
        }

        factors
    }

    /// Step 5b: mitigations
    ///
    /// Order: experience, credit score, farm size. Neither previous loans nor
    /// income level has a recommendation.
    pub fn recommendations(&self, profile: &FarmerProfile) -> Vec<String> {
        let indicators = RiskIndicators::evaluate(profile, self);
        let mut recommendations = Vec::new();

        if indicators.inexperienced {
            recommendations.push(RECOMMEND_TRAINING.to_string());
        }
        if indicators.poor_credit {
            recommendations.push(RECOMMEND_CREDIT_HISTORY.to_string());
        }
        if indicators.small_farm {
            recommendations.push(RECOMMEND_EXPAND_FARM.to_string());
        }

        recommendations
    }

    /// Assess a validated profile
    ///
    /// # Errors
    /// Returns a [`ValidationError`] if the profile is outside its domain;
    /// valid input never fails.
    pub fn assess<R: Rng + ?Sized>(
        &self,
        profile: FarmerProfile,
        rng: &mut R,
    ) -> Result<RiskAssessment, ValidationError> {
        profile.validate()?;

        let indicators = RiskIndicators::evaluate(&profile, self);
        let risk_score = Self::clamp_score(self.raw_score(&indicators, rng));

        Ok(RiskAssessment {
            eligible: self.is_eligible(risk_score),
            risk_score,
            recommended_amount: self.recommended_amount(profile.farm_size, risk_score),
            confidence: self.confidence(risk_score),
            risk_tier: RiskTier::from_score(risk_score, self),
            factors: self.risk_factors(&profile),
            recommendations: self.recommendations(&profile),
        })
    }

    /// Policy with the noise term switched off
    pub fn deterministic() -> Self {
        Self {
            noise_std_dev: 0.0,
            ..Self::default()
        }
    }
}

impl LoanAssessor for LoanPolicy {
    fn assess(
        &self,
        profile: FarmerProfile,
        rng: &mut dyn RngCore,
    ) -> Result<RiskAssessment, ValidationError> {
        LoanPolicy::assess(self, profile, rng)
    }
}

fn round_to_3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::fixtures::{high_risk_profile, low_risk_profile};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_low_risk_scenario() {
        let policy = LoanPolicy::deterministic();
        let mut rng = StdRng::seed_from_u64(7);

        let assessment = policy.assess(low_risk_profile(), &mut rng).unwrap();

        assert_eq!(assessment.risk_score, 0.0);
        assert!(assessment.eligible);
        assert_eq!(assessment.risk_tier, RiskTier::Low);
        assert_eq!(assessment.recommended_amount, 375_000);
        assert_eq!(assessment.confidence, 1.0);
        assert!(assessment.factors.is_empty());
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn test_high_risk_scenario() {
        let policy = LoanPolicy::deterministic();
        let mut rng = StdRng::seed_from_u64(7);

        let assessment = policy.assess(high_risk_profile(), &mut rng).unwrap();

        assert_eq!(assessment.risk_score, 1.0);
        assert!(!assessment.eligible);
        assert_eq!(assessment.risk_tier, RiskTier::High);
        assert_eq!(assessment.recommended_amount, 25_000);
        assert_eq!(assessment.confidence, 0.85);
        assert_eq!(
            assessment.factors,
            vec![
                "Small farm size",
                "Limited farming experience",
                "Low credit score",
                "Low income level",
            ]
        );
        assert_eq!(
            assessment.recommendations,
            vec![
                "Consider farming training programs",
                "Improve credit history with small loans",
                "Consider expanding farm size gradually",
            ]
        );
    }

    #[test]
    fn test_indicator_counts() {
        let policy = LoanPolicy::default();

        let none = RiskIndicators::evaluate(&low_risk_profile(), &policy);
        assert_eq!(none.triggered_count(), 0);
        assert_eq!(none.deterministic_score(), 0.0);

        let all = RiskIndicators::evaluate(&high_risk_profile(), &policy);
        assert_eq!(all.triggered_count(), 5);
        assert_eq!(all.deterministic_score(), 1.0);
    }

    #[test]
    fn test_indicator_thresholds_are_strict() {
        let policy = LoanPolicy::default();
        let mut profile = low_risk_profile();
        profile.farm_size = 2.0;
        profile.experience_years = 3;
        profile.previous_loans = 2;
        profile.credit_score = 600;

        let indicators = RiskIndicators::evaluate(&profile, &policy);
        assert_eq!(indicators.triggered_count(), 0);
    }

    #[test]
    fn test_previous_loans_scores_without_explanation() {
        let policy = LoanPolicy::deterministic();
        let mut profile = low_risk_profile();
        profile.previous_loans = 5;

        let mut rng = StdRng::seed_from_u64(1);
        let assessment = policy.assess(profile, &mut rng).unwrap();

        assert!((assessment.risk_score - 0.2).abs() < 1e-12);
        assert!(assessment.factors.is_empty());
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn test_income_has_factor_but_no_recommendation() {
        let policy = LoanPolicy::default();
        let mut profile = low_risk_profile();
        profile.income_level = IncomeLevel::Low;

        assert_eq!(policy.risk_factors(&profile), vec!["Low income level"]);
        assert!(policy.recommendations(&profile).is_empty());
    }

    #[test]
    fn test_upper_clamp_only() {
        assert_eq!(LoanPolicy::clamp_score(1.25), 1.0);
        assert_eq!(LoanPolicy::clamp_score(0.4), 0.4);
        // Negative scores are not clamped
        assert_eq!(LoanPolicy::clamp_score(-0.2), -0.2);
    }

    #[test]
    fn test_negative_score_boundary_behavior() {
        let policy = LoanPolicy::default();
        let score = LoanPolicy::clamp_score(-0.2);

        assert!(policy.is_eligible(score));
        assert_eq!(RiskTier::from_score(score, &policy), RiskTier::Low);
        assert!((policy.confidence(score) - 1.03).abs() < 1e-9);
        assert!(policy.confidence(score) > 1.0);
    }

    #[test]
    fn test_eligibility_threshold() {
        let policy = LoanPolicy::default();
        assert!(policy.is_eligible(0.6999));
        assert!(!policy.is_eligible(0.7));
        assert!(!policy.is_eligible(1.0));
    }

    #[test]
    fn test_tier_boundaries() {
        let policy = LoanPolicy::default();
        assert_eq!(RiskTier::from_score(0.2999, &policy), RiskTier::Low);
        assert_eq!(RiskTier::from_score(0.3, &policy), RiskTier::Moderate);
        assert_eq!(RiskTier::from_score(0.5999, &policy), RiskTier::Moderate);
        assert_eq!(RiskTier::from_score(0.6, &policy), RiskTier::High);
    }

    #[test]
    fn test_recommended_amount_floors() {
        let policy = LoanPolicy::default();
        // 50000.5 * 1.5 = 75000.75
        assert_eq!(policy.recommended_amount(1.00001, 0.1), 75_000);
        assert_eq!(policy.recommended_amount(1.5, 0.9), 37_500);
        assert_eq!(policy.recommended_amount(4.0, 0.45), 200_000);
    }

    #[test]
    fn test_confidence_values() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.confidence(0.0), 1.0);
        assert_eq!(policy.confidence(1.0), 0.85);
        assert_eq!(policy.confidence(0.4), 0.94);
        assert_eq!(policy.confidence(0.123456), 0.981);
    }

    #[test]
    fn test_invalid_profile_rejected_before_scoring() {
        let policy = LoanPolicy::default();
        let mut profile = low_risk_profile();
        profile.farm_size = -1.0;

        let mut rng = StdRng::seed_from_u64(3);
        let result = policy.assess(profile, &mut rng);
        assert_eq!(result, Err(ValidationError::NonPositiveFarmSize(-1.0)));
    }

    #[test]
    fn test_seeded_assessments_are_reproducible() {
        let policy = LoanPolicy::default();

        let a = policy
            .assess(high_risk_profile(), &mut StdRng::seed_from_u64(99))
            .unwrap();
        let b = policy
            .assess(high_risk_profile(), &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_noise_is_statistically_bounded() {
        let policy = LoanPolicy::default();
        let mut profile = low_risk_profile();
        profile.farm_size = 1.0;
        profile.credit_score = 550;
        let indicators = RiskIndicators::evaluate(&profile, &policy);
        assert_eq!(indicators.triggered_count(), 2);

        let trials = 10_000;
        let mut rng = StdRng::seed_from_u64(2024);
        let samples: Vec<f64> = (0..trials)
            .map(|_| policy.raw_score(&indicators, &mut rng))
            .collect();

        let mean = samples.iter().sum::<f64>() / trials as f64;
        let variance =
            samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (trials - 1) as f64;
        let standard_error = NOISE_STD_DEV / (trials as f64).sqrt();

        assert!(
            (mean - 0.4).abs() < 4.0 * standard_error,
            "mean {} too far from 0.4",
            mean
        );
        assert!((variance.sqrt() - NOISE_STD_DEV).abs() < 0.005);
    }

    #[test]
    fn test_policy_validation() {
        assert!(LoanPolicy::default().validate().is_ok());
        assert!(LoanPolicy::deterministic().validate().is_ok());

        let policy = LoanPolicy {
            noise_std_dev: -0.1,
            ..LoanPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(ValidationError::InvalidPolicy(_))
        ));

        let policy = LoanPolicy {
            low_tier_upper: 0.8,
            ..LoanPolicy::default()
        };
        assert!(policy.validate().is_err());

        let policy = LoanPolicy {
            high_tier_multiplier: f64::INFINITY,
            ..LoanPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_assessor_trait_object() {
        let assessor: Box<dyn LoanAssessor> = Box::new(LoanPolicy::deterministic());
        let mut rng = StdRng::seed_from_u64(5);

        let assessment = assessor.assess(low_risk_profile(), &mut rng).unwrap();
        assert_eq!(assessment.recommended_amount, 375_000);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::profile::fixtures::low_risk_profile;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    proptest! {
        /// Property: eligibility is exactly `risk_score < 0.7`
        #[test]
        fn test_eligibility_matches_score(
            seed in any::<u64>(),
            farm_size in 0.1f64..20.0,
            experience_years in 0u32..10,
            previous_loans in 0u32..6,
            credit_score in 300i32..=850,
            low_income in any::<bool>(),
        ) {
            let mut profile = low_risk_profile();
            profile.farm_size = farm_size;
            profile.experience_years = experience_years;
            profile.previous_loans = previous_loans;
            profile.credit_score = credit_score;
            if low_income {
                profile.income_level = IncomeLevel::Low;
            }

            let policy = LoanPolicy::default();
            let assessment = policy
                .assess(profile, &mut StdRng::seed_from_u64(seed))
                .unwrap();

            prop_assert_eq!(assessment.eligible, assessment.risk_score < 0.7);
            prop_assert!(assessment.risk_score <= MAX_RISK_SCORE);
        }

        /// Property: amounts never increase with the risk tier
        #[test]
        fn test_amount_monotone_in_tier(farm_size in 0.01f64..1000.0) {
            let policy = LoanPolicy::default();
            let low = policy.recommended_amount(farm_size, 0.1);
            let moderate = policy.recommended_amount(farm_size, 0.45);
            let high = policy.recommended_amount(farm_size, 0.8);

            prop_assert!(low >= moderate);
            prop_assert!(moderate >= high);
        }

        /// Property: doubling the farm doubles the amount (up to flooring)
        #[test]
        fn test_amount_linear_in_farm_size(
            farm_size in 0.01f64..1000.0,
            score in -0.5f64..1.0,
        ) {
            let policy = LoanPolicy::default();
            let single = policy.recommended_amount(farm_size, score);
            let double = policy.recommended_amount(farm_size * 2.0, score);

            prop_assert!(double >= single * 2);
            prop_assert!(double <= single * 2 + 1);
        }

        /// Property: confidence always carries at most 3 decimal places
        #[test]
        fn test_confidence_three_decimals(score in -0.5f64..1.0) {
            let policy = LoanPolicy::default();
            let confidence = policy.confidence(score);

            prop_assert_eq!((confidence * 1000.0).round() / 1000.0, confidence);
        }

        /// Property: factors and recommendations ignore the random draw
        #[test]
        fn test_explanations_deterministic(seed_a in any::<u64>(), seed_b in any::<u64>()) {
            let mut profile = low_risk_profile();
            profile.experience_years = 1;
            profile.credit_score = 420;

            let policy = LoanPolicy::default();
            let a = policy.assess(profile.clone(), &mut StdRng::seed_from_u64(seed_a)).unwrap();
            let b = policy.assess(profile, &mut StdRng::seed_from_u64(seed_b)).unwrap();

            prop_assert_eq!(a.factors, b.factors);
            prop_assert_eq!(a.recommendations, b.recommendations);
        }
    }
}
