use std::collections::HashMap;
use std::collections::hash_map;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Level label → signed percentage adjustment (e.g. `"low" => -50`)
pub type LevelTable = HashMap<String, i32>;

/// Static reference data describing one crop species
///
/// A plant carries its base yield, what it costs to put one in the ground,
/// what a unit of its yield sells for, and how sensitive it is to each
/// environmental factor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Plant {
    /// Identifier, informational only
    pub name: String,
    /// Base yield of a single plant
    #[cfg_attr(feature = "serde", serde(rename = "yield"))]
    pub base_yield: f64,
    /// Cost to plant one unit
    pub price: f64,
    /// Sale price per unit of yield
    pub sale_price: f64,
    /// Factor name → level table
    #[cfg_attr(feature = "serde", serde(default))]
    pub factors: HashMap<String, LevelTable>,
}

impl Plant {
    /// Creates a plant with no environmental sensitivity
    #[must_use]
    pub fn new(name: impl Into<String>, base_yield: f64, price: f64, sale_price: f64) -> Self {
        Self {
            name: name.into(),
            base_yield,
            price,
            sale_price,
            factors: HashMap::new(),
        }
    }

    /// Adds (or replaces) the level table for `factor`
    #[must_use]
    pub fn with_factor<I, L>(mut self, factor: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = (L, i32)>,
        L: Into<String>,
    {
        let table = levels
            .into_iter()
            .map(|(level, pct)| (level.into(), pct))
            .collect();
        self.factors.insert(factor.into(), table);
        self
    }

    /// Returns the level table for `factor`, if the plant declares it
    #[inline]
    #[must_use]
    pub fn levels(&self, factor: &str) -> Option<&LevelTable> {
        self.factors.get(factor)
    }

    /// Returns true if the plant reacts to `factor`
    #[inline]
    #[must_use]
    pub fn has_factor(&self, factor: &str) -> bool {
        self.factors.contains_key(factor)
    }
}

/// A quantity of a given [`Plant`] actually planted
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CropPlanting {
    /// The plant, shared read-only between plantings
    pub crop: Arc<Plant>,
    /// Number of plants; zero is valid
    pub num_crops: f64,
}

impl CropPlanting {
    /// Creates a planting of `num_crops` units of `crop`
    #[must_use]
    pub fn new(crop: impl Into<Arc<Plant>>, num_crops: f64) -> Self {
        Self {
            crop: crop.into(),
            num_crops,
        }
    }
}

/// An ordered list of plantings evaluated under one scenario
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FarmPortfolio {
    /// Plantings in insertion order
    #[cfg_attr(feature = "serde", serde(default))]
    pub crops: Vec<CropPlanting>,
}

impl FarmPortfolio {
    /// Creates an empty portfolio
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a planting, builder style
    #[must_use]
    pub fn with_planting(mut self, crop: impl Into<Arc<Plant>>, num_crops: f64) -> Self {
        self.push(CropPlanting::new(crop, num_crops));
        self
    }

    /// Appends a planting
    pub fn push(&mut self, planting: CropPlanting) {
        self.crops.push(planting);
    }

    /// Iterates over the plantings in order
    pub fn iter(&self) -> std::slice::Iter<'_, CropPlanting> {
        self.crops.iter()
    }

    /// Number of plantings
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.crops.len()
    }

    /// Returns true if there are no plantings
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }
}

impl FromIterator<CropPlanting> for FarmPortfolio {
    fn from_iter<I: IntoIterator<Item = CropPlanting>>(iter: I) -> Self {
        Self {
            crops: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a FarmPortfolio {
    type Item = &'a CropPlanting;
    type IntoIter = std::slice::Iter<'a, CropPlanting>;

    fn into_iter(self) -> Self::IntoIter {
        self.crops.iter()
    }
}

/// A scenario: factor name → selected level label
///
/// The empty scenario means "no adjustment".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EnvironmentFactors(HashMap<String, String>);

impl EnvironmentFactors {
    /// Creates an empty scenario
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The empty scenario; reads better at call sites that want no adjustment
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Sets `factor` to `level`, builder style
    #[must_use]
    pub fn with(mut self, factor: impl Into<String>, level: impl Into<String>) -> Self {
        self.insert(factor, level);
        self
    }

    /// Sets `factor` to `level`, returning the previous level if any
    pub fn insert(&mut self, factor: impl Into<String>, level: impl Into<String>) -> Option<String> {
        self.0.insert(factor.into(), level.into())
    }

    /// Returns the level selected for `factor`
    #[inline]
    #[must_use]
    pub fn level(&self, factor: &str) -> Option<&str> {
        self.0.get(factor).map(String::as_str)
    }

    /// Iterates over `(factor, level)` pairs in arbitrary order
    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Number of factors set
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no factor is set
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F, L> FromIterator<(F, L)> for EnvironmentFactors
where
    F: Into<String>,
    L: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, L)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(factor, level)| (factor.into(), level.into()))
                .collect(),
        )
    }
}
