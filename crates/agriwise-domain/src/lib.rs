//! AgriWise Domain Layer
//!
//! This crate contains the core business logic for the AgriWise agricultural
//! assistant. It performs no I/O and no logging; every source of randomness is
//! passed in by the caller so results can be reproduced in tests.
//!
//! ## Key Concepts
//!
//! - **FarmerProfile**: The validated input to a loan assessment
//! - **Risk indicator**: One boolean predicate over a profile field
//! - **Risk tier**: The score band driving the loan-amount multiplier
//! - **RiskAssessment**: The derived decision, never mutated after creation
//!
//! The simulated assistant features (disease detection, farming tips, voice
//! replies, analytics) live here too. They are placeholders for real models
//! and only share the injectable randomness with the loan assessor.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analytics;
pub mod disease;
pub mod error;
pub mod loan;
pub mod profile;
pub mod random;
pub mod tips;
pub mod traits;
pub mod voice;

// Re-exports for convenience
pub use disease::{DiseaseDetector, DiseaseDiagnosis};
pub use error::ValidationError;
pub use loan::{LoanPolicy, RiskAssessment, RiskIndicators, RiskTier};
pub use profile::{CropType, FarmerProfile, IncomeLevel};
pub use random::{EntropySource, SeededSource};
pub use traits::{LoanAssessor, RandomSource};
