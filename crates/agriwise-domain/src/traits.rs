//! Trait definitions for the seams between domain logic and its callers
//!
//! The server depends on these traits rather than on concrete types so that
//! tests can inject a fixed random seed or an alternative policy.

use crate::{FarmerProfile, RiskAssessment, ValidationError};
use rand::rngs::StdRng;
use rand::RngCore;

/// Supplies a random generator for a single operation
///
/// Each call hands out an independent generator; nothing is shared between
/// concurrent assessments.
pub trait RandomSource: Send + Sync {
    /// Produce the generator for one operation
    fn rng(&self) -> StdRng;
}

/// Turns a farmer profile into a loan decision
///
/// Implemented by [`crate::LoanPolicy`]
pub trait LoanAssessor: Send + Sync {
    /// Assess a profile, drawing any noise from `rng`
    fn assess(
        &self,
        profile: FarmerProfile,
        rng: &mut dyn RngCore,
    ) -> Result<RiskAssessment, ValidationError>;
}
