//! #  Cropyield - A Rust library for crop yield and profit calculations.
//!
//! ## Overview
//!
//! Given static plant data and how many of each plant were put in the ground,
//! this library derives yield, cost, revenue and profit, optionally adjusted by
//! an environmental scenario (sun, wind, temperature, ...).
//!
//! Figures build on each other in a strict chain:
//!
//! - **Plant yield**: base yield × Π `(percentage + 100) / 100` per applied factor
//! - **Crop yield**: plant yield × number of plants
//! - **Cost**: number of plants × plant price
//! - **Revenue**: sale price × crop yield
//! - **Profit**: revenue − cost
//!
//! Portfolio totals sum the per-planting figures.
//!
//! ## Quick Start
//!
//! ```rust
//! use cropyield::{EnvironmentFactors, FarmPortfolio, Plant, YieldCalculator};
//!
//! let corn = Plant::new("corn", 30.0, 1.0, 3.0)
//!     .with_factor("sun", [("low", -50), ("medium", 0), ("high", 50)]);
//!
//! let calc = YieldCalculator::default();
//! let env = EnvironmentFactors::new().with("sun", "low");
//!
//! assert_eq!(calc.plant_yield(&corn, &EnvironmentFactors::none()), Ok(30.0));
//! assert_eq!(calc.plant_yield(&corn, &env), Ok(15.0));
//!
//! let farm = FarmPortfolio::new().with_planting(corn, 10.0);
//! assert_eq!(calc.total_profit(&farm, &env), Ok(440.0));
//! ```
//!
//! ## Missing levels
//!
//! When a scenario selects a level a plant has no percentage for, the
//! calculator's [`MissingLevelPolicy`] decides: `Strict` (the default) returns
//! [`YieldError::InvalidInput`], `Permissive` yields `NaN`.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for plants, plantings,
//!   portfolios, scenarios, outcomes and calculator settings
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Yield, cost, revenue and profit calculations.
pub mod calculator;
/// Error types.
pub mod error;
/// Plants, plantings, portfolios and environmental scenarios.
pub mod model;

pub use calculator::{CropOutcome, DEFAULT_FACTORS, MissingLevelPolicy, YieldCalculator};
pub use error::{ParsePolicyError, Result, YieldError};
pub use model::{CropPlanting, EnvironmentFactors, FarmPortfolio, LevelTable, Plant};
