use std::fmt::Display;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::{ParsePolicyError, Result, YieldError};
use crate::model::{CropPlanting, EnvironmentFactors, FarmPortfolio, LevelTable, Plant};

/// Factors a calculator checks when none are configured, in evaluation order
pub const DEFAULT_FACTORS: [&str; 3] = ["sun", "wind", "temp"];

/// What to do when a scenario selects a level the plant has no percentage for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[must_use]
pub enum MissingLevelPolicy {
    /// Reject the computation with [`YieldError::InvalidInput`]
    #[default]
    Strict,
    /// Let the lookup contribute `NaN`, which propagates to every derived figure
    Permissive,
}

impl MissingLevelPolicy {
    /// Lowercase name, as accepted by [`FromStr`]
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Permissive => "permissive",
        }
    }

    /// Returns true if missing levels are rejected
    #[inline]
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }

    /// Returns true if missing levels become `NaN`
    #[inline]
    #[must_use]
    pub const fn is_permissive(self) -> bool {
        matches!(self, Self::Permissive)
    }
}

impl From<MissingLevelPolicy> for &'static str {
    #[inline]
    fn from(policy: MissingLevelPolicy) -> Self {
        policy.as_str()
    }
}

impl Display for MissingLevelPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MissingLevelPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            _ => Err(ParsePolicyError(s.to_string())),
        }
    }
}

/// Yield, cost, revenue and profit of one planting (or a sum of plantings)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CropOutcome {
    /// Adjusted yield
    #[cfg_attr(feature = "serde", serde(rename = "yield"))]
    pub crop_yield: f64,
    /// Planting cost
    pub cost: f64,
    /// Sale value of the yield
    pub revenue: f64,
    /// `revenue - cost`
    pub profit: f64,
}

impl Add for CropOutcome {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            crop_yield: self.crop_yield + rhs.crop_yield,
            cost: self.cost + rhs.cost,
            revenue: self.revenue + rhs.revenue,
            profit: self.profit + rhs.profit,
        }
    }
}

impl Sum for CropOutcome {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Derives yield and money figures for plantings under a scenario
///
/// The calculator holds only configuration: the ordered list of factor names
/// it checks and the [`MissingLevelPolicy`]. Every operation is a pure
/// function of its arguments.
///
/// A factor contributes `(percentage + 100) / 100` to a plant's yield only when
/// the factor is configured here, set in the scenario, *and* declared by the
/// plant. Any other combination leaves the yield untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct YieldCalculator {
    #[cfg_attr(feature = "serde", serde(deserialize_with = "deserialize_factors"))]
    factors: Vec<String>,
    policy: MissingLevelPolicy,
}

impl Default for YieldCalculator {
    /// Checks `sun`, `wind`, `temp` in that order and rejects missing levels
    fn default() -> Self {
        Self::new(MissingLevelPolicy::default())
    }
}

impl YieldCalculator {
    /// Creates a calculator over [`DEFAULT_FACTORS`] with the given policy
    #[must_use]
    pub fn new(policy: MissingLevelPolicy) -> Self {
        Self {
            factors: DEFAULT_FACTORS.iter().map(ToString::to_string).collect(),
            policy,
        }
    }

    /// Default factors, missing levels rejected
    #[must_use]
    pub fn strict() -> Self {
        Self::new(MissingLevelPolicy::Strict)
    }

    /// Default factors, missing levels become `NaN`
    #[must_use]
    pub fn permissive() -> Self {
        Self::new(MissingLevelPolicy::Permissive)
    }

    /// Replaces the missing level policy
    #[must_use]
    pub fn with_policy(mut self, policy: MissingLevelPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the checked factor names; evaluation follows iteration order
    ///
    /// Repeated names are checked once, at their first position.
    #[must_use]
    pub fn with_factors<I, S>(mut self, factors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.factors = unique_factors(factors.into_iter().map(Into::into));
        self
    }

    /// Appends one factor name unless it is already checked
    #[must_use]
    pub fn with_factor(mut self, factor: impl Into<String>) -> Self {
        let factor = factor.into();
        if !self.factors.contains(&factor) {
            self.factors.push(factor);
        }
        self
    }

    /// Factor names checked, in evaluation order
    #[must_use]
    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    /// The active missing level policy
    pub fn policy(&self) -> MissingLevelPolicy {
        self.policy
    }

    /// Yield of a single plant under `env`
    ///
    /// # Errors
    ///
    /// [`YieldError::InvalidInput`] if the policy is strict and `env` selects a
    /// level missing from the plant's table for a factor both declare.
    pub fn plant_yield(&self, plant: &Plant, env: &EnvironmentFactors) -> Result<f64> {
        let mut adjustment = 1.0;
        for factor in &self.factors {
            let (Some(level), Some(levels)) = (env.level(factor), plant.levels(factor)) else {
                continue;
            };
            adjustment *= self.multiplier(plant, factor, level, levels)?;
        }
        Ok(plant.base_yield * adjustment)
    }

    fn multiplier(
        &self,
        plant: &Plant,
        factor: &str,
        level: &str,
        levels: &LevelTable,
    ) -> Result<f64> {
        if let Some(&pct) = levels.get(level) {
            let multiplier = (f64::from(pct) + 100.0) / 100.0;
            trace!(plant = %plant.name, factor, level, pct, multiplier, "applying factor");
            return Ok(multiplier);
        }
        match self.policy {
            MissingLevelPolicy::Strict => {
                debug!(plant = %plant.name, factor, level, "rejecting unknown factor level");
                Err(YieldError::invalid_input(&plant.name, factor, level))
            }
            MissingLevelPolicy::Permissive => {
                warn!(plant = %plant.name, factor, level, "unknown factor level, yield is NaN");
                Ok(f64::NAN)
            }
        }
    }

    /// Yield of a planting: plant yield times number of plants
    ///
    /// # Errors
    ///
    /// Same as [`plant_yield`](Self::plant_yield).
    pub fn crop_yield(&self, planting: &CropPlanting, env: &EnvironmentFactors) -> Result<f64> {
        Ok(self.plant_yield(&planting.crop, env)? * planting.num_crops)
    }

    /// Sum of [`crop_yield`](Self::crop_yield) over the portfolio; `0` when empty
    ///
    /// # Errors
    ///
    /// The first planting that fails [`plant_yield`](Self::plant_yield).
    pub fn total_yield(&self, portfolio: &FarmPortfolio, env: &EnvironmentFactors) -> Result<f64> {
        portfolio
            .iter()
            .try_fold(0.0, |total, planting| Ok(total + self.crop_yield(planting, env)?))
    }

    /// Cost of seeding a planting; independent of the environment
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn cost_for_crop(&self, planting: &CropPlanting) -> f64 {
        planting.num_crops * planting.crop.price
    }

    /// Sum of [`cost_for_crop`](Self::cost_for_crop) over the portfolio
    #[must_use]
    pub fn total_cost(&self, portfolio: &FarmPortfolio) -> f64 {
        portfolio
            .iter()
            .fold(0.0, |total, planting| total + self.cost_for_crop(planting))
    }

    /// Sale value of a planting's yield
    ///
    /// # Errors
    ///
    /// Same as [`plant_yield`](Self::plant_yield).
    pub fn revenue_for_crop(
        &self,
        planting: &CropPlanting,
        env: &EnvironmentFactors,
    ) -> Result<f64> {
        Ok(planting.crop.sale_price * self.crop_yield(planting, env)?)
    }

    /// Sum of [`revenue_for_crop`](Self::revenue_for_crop) over the portfolio
    ///
    /// # Errors
    ///
    /// The first planting that fails [`plant_yield`](Self::plant_yield).
    pub fn total_revenue(
        &self,
        portfolio: &FarmPortfolio,
        env: &EnvironmentFactors,
    ) -> Result<f64> {
        portfolio
            .iter()
            .try_fold(0.0, |total, planting| Ok(total + self.revenue_for_crop(planting, env)?))
    }

    /// Revenue minus cost of a planting
    ///
    /// # Errors
    ///
    /// Same as [`plant_yield`](Self::plant_yield).
    pub fn profit_for_crop(
        &self,
        planting: &CropPlanting,
        env: &EnvironmentFactors,
    ) -> Result<f64> {
        Ok(self.revenue_for_crop(planting, env)? - self.cost_for_crop(planting))
    }

    /// Sum of [`profit_for_crop`](Self::profit_for_crop) over the portfolio; `0` when empty
    ///
    /// # Errors
    ///
    /// The first planting that fails [`plant_yield`](Self::plant_yield).
    pub fn total_profit(&self, portfolio: &FarmPortfolio, env: &EnvironmentFactors) -> Result<f64> {
        portfolio
            .iter()
            .try_fold(0.0, |total, planting| Ok(total + self.profit_for_crop(planting, env)?))
    }

    /// All four figures for one planting
    ///
    /// # Errors
    ///
    /// Same as [`plant_yield`](Self::plant_yield).
    pub fn crop_outcome(
        &self,
        planting: &CropPlanting,
        env: &EnvironmentFactors,
    ) -> Result<CropOutcome> {
        let crop_yield = self.crop_yield(planting, env)?;
        let cost = self.cost_for_crop(planting);
        let revenue = planting.crop.sale_price * crop_yield;
        Ok(CropOutcome {
            crop_yield,
            cost,
            revenue,
            profit: revenue - cost,
        })
    }

    /// Per-figure sums of [`crop_outcome`](Self::crop_outcome) over the portfolio
    ///
    /// # Errors
    ///
    /// The first planting that fails [`plant_yield`](Self::plant_yield).
    pub fn portfolio_outcome(
        &self,
        portfolio: &FarmPortfolio,
        env: &EnvironmentFactors,
    ) -> Result<CropOutcome> {
        portfolio
            .iter()
            .map(|planting| self.crop_outcome(planting, env))
            .sum()
    }
}

/// Keeps the first occurrence of each factor name, in order
fn unique_factors(factors: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::new();
    for factor in factors {
        if !unique.contains(&factor) {
            unique.push(factor);
        }
    }
    unique
}

#[cfg(feature = "serde")]
fn deserialize_factors<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Vec::<String>::deserialize(deserializer).map(unique_factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tomato() -> Plant {
        Plant::new("tomato", 10.0, 2.0, 5.0)
            .with_factor("sun", [("low", -20), ("high", 50)])
            .with_factor("soil", [("poor", -50), ("rich", 20)])
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("strict".parse::<MissingLevelPolicy>(), Ok(MissingLevelPolicy::Strict));
        assert_eq!(
            " Permissive ".parse::<MissingLevelPolicy>(),
            Ok(MissingLevelPolicy::Permissive)
        );
        assert_eq!(
            "lenient".parse::<MissingLevelPolicy>(),
            Err(ParsePolicyError("lenient".to_string()))
        );
    }

    #[test]
    fn test_policy_names() {
        let s: &str = MissingLevelPolicy::Permissive.into();
        assert_eq!(s, "permissive");
        assert_eq!(MissingLevelPolicy::Strict.to_string(), "strict");
        assert!(MissingLevelPolicy::default().is_strict());
        assert!(MissingLevelPolicy::Permissive.is_permissive());
    }

    #[test]
    fn test_default_calculator() {
        let calc = YieldCalculator::default();
        assert_eq!(calc.factors(), ["sun", "wind", "temp"]);
        assert_eq!(calc.policy(), MissingLevelPolicy::Strict);
        assert_eq!(calc, YieldCalculator::strict());
    }

    #[test]
    fn test_unconfigured_factor_is_ignored() {
        let env = EnvironmentFactors::new().with("soil", "poor");
        let calc = YieldCalculator::default();
        assert_relative_eq!(calc.plant_yield(&tomato(), &env).unwrap(), 10.0);
    }

    #[test]
    fn test_configured_open_factor_applies() {
        let env = EnvironmentFactors::new().with("soil", "poor").with("sun", "high");
        let calc = YieldCalculator::default().with_factor("soil");
        assert_eq!(calc.factors().len(), 4);
        assert_relative_eq!(calc.plant_yield(&tomato(), &env).unwrap(), 7.5);
    }

    #[test]
    fn test_with_factor_skips_duplicates() {
        let calc = YieldCalculator::default().with_factor("sun");
        assert_eq!(calc.factors().len(), 3);
    }

    #[test]
    fn test_with_factors_removes_duplicates() {
        let corn = Plant::new("corn", 30.0, 1.0, 3.0).with_factor("sun", [("low", -50)]);
        let env = EnvironmentFactors::new().with("sun", "low");
        let calc = YieldCalculator::default().with_factors(["sun", "wind", "sun"]);

        assert_eq!(calc.factors(), ["sun", "wind"]);
        assert_relative_eq!(calc.plant_yield(&corn, &env).unwrap(), 15.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialized_factors_remove_duplicates() {
        let calc: YieldCalculator =
            serde_json::from_str(r#"{ "factors": ["sun", "sun", "temp"] }"#).unwrap();
        assert_eq!(calc.factors(), ["sun", "temp"]);
        assert_eq!(calc.policy(), MissingLevelPolicy::Strict);
    }

    #[test]
    fn test_factor_missing_on_plant_is_ignored() {
        let env = EnvironmentFactors::new().with("wind", "high").with("temp", "low");
        let calc = YieldCalculator::strict();
        assert_relative_eq!(calc.plant_yield(&tomato(), &env).unwrap(), 10.0);
    }

    #[test]
    fn test_strict_rejects_unknown_level() {
        let env = EnvironmentFactors::new().with("sun", "medium");
        let err = YieldCalculator::strict()
            .plant_yield(&tomato(), &env)
            .unwrap_err();
        assert_eq!(err, YieldError::invalid_input("tomato", "sun", "medium"));
    }

    #[test]
    fn test_permissive_propagates_nan() {
        let env = EnvironmentFactors::new().with("sun", "medium");
        let calc = YieldCalculator::permissive();
        let planting = CropPlanting::new(tomato(), 4.0);

        assert!(calc.plant_yield(&tomato(), &env).unwrap().is_nan());
        assert!(calc.profit_for_crop(&planting, &env).unwrap().is_nan());
        assert_relative_eq!(calc.cost_for_crop(&planting), 8.0);
    }

    #[test]
    fn test_strict_error_surfaces_from_totals() {
        let env = EnvironmentFactors::new().with("sun", "medium");
        let portfolio = FarmPortfolio::new()
            .with_planting(Plant::new("bean", 5.0, 1.0, 1.0), 3.0)
            .with_planting(tomato(), 2.0);
        let calc = YieldCalculator::strict();

        assert!(calc.total_yield(&portfolio, &env).is_err());
        assert!(calc.total_profit(&portfolio, &env).is_err());
        assert!(calc.portfolio_outcome(&portfolio, &env).is_err());
        assert_relative_eq!(calc.total_cost(&portfolio), 7.0);
    }

    #[test]
    fn test_crop_outcome_matches_operations() {
        let env = EnvironmentFactors::new().with("sun", "low");
        let calc = YieldCalculator::default();
        let planting = CropPlanting::new(tomato(), 6.0);
        let outcome = calc.crop_outcome(&planting, &env).unwrap();

        assert_relative_eq!(outcome.crop_yield, calc.crop_yield(&planting, &env).unwrap());
        assert_relative_eq!(outcome.cost, calc.cost_for_crop(&planting));
        assert_relative_eq!(outcome.revenue, calc.revenue_for_crop(&planting, &env).unwrap());
        assert_relative_eq!(outcome.profit, calc.profit_for_crop(&planting, &env).unwrap());
    }

    #[test]
    fn test_outcome_sum_of_nothing_is_zero() {
        let total: CropOutcome = std::iter::empty::<CropOutcome>().sum();
        assert_eq!(total, CropOutcome::default());
        assert!(total.profit.is_sign_positive());
    }
}
