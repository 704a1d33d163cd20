pub mod config;
pub mod factors;
pub mod engine;
pub mod readiness;
pub mod tier;
pub mod validation;

pub use config::*;
pub use engine::{compute_health, HealthBreakdown, HealthResult, RiskRank};
pub use readiness::ReadinessSummary;
pub use tier::{HealthTier, TierBand, TIERS};
pub use validation::validate_scoring;
