//! Load combinations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Factored sum of load cases solved as one right-hand side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    /// Combination id
    pub id: String,
    /// Factors for each load case (case id -> factor)
    pub factors: HashMap<String, f64>,
    /// Design code the combination comes from (informational)
    #[serde(default)]
    pub code: Option<String>,
    /// Free-form labels, e.g. "uls", "sls"
    #[serde(default)]
    pub tags: Vec<String>,
}

impl LoadCombination {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            factors: HashMap::new(),
            code: None,
            tags: Vec::new(),
        }
    }

    /// One case at factor 1.0
    pub fn single(id: &str, case: &str) -> Self {
        Self::new(id).with_case(case, 1.0)
    }

    /// Include `case` with partial factor `factor`
    pub fn with_case(mut self, case: &str, factor: f64) -> Self {
        self.factors.insert(case.to_string(), factor);
        self
    }

    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    /// Partial factor of `case`, 0 when absent
    pub fn factor(&self, case: &str) -> f64 {
        self.factors.get(case).copied().unwrap_or(0.0)
    }

    /// Whether `case` takes part in the combination
    pub fn includes(&self, case: &str) -> bool {
        self.factor(case).abs() > 1e-10
    }

    /// Case ids in a stable order
    pub fn case_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factors.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// EN 1990 ultimate limit state, snow leading
    pub fn uls_snow() -> Self {
        Self::new("1.35G + 1.5S")
            .with_case("Dead", 1.35)
            .with_case("Snow", 1.5)
            .with_code("EN 1990")
            .with_tag("uls")
    }

    /// EN 1990 ultimate limit state, wind leading with snow accompanying
    pub fn uls_wind() -> Self {
        Self::new("1.35G + 1.5W + 0.75S")
            .with_case("Dead", 1.35)
            .with_case("Wind", 1.5)
            .with_case("Snow", 0.75)
            .with_code("EN 1990")
            .with_tag("uls")
    }

    /// Characteristic serviceability combination
    pub fn sls_characteristic() -> Self {
        Self::new("G + S")
            .with_case("Dead", 1.0)
            .with_case("Snow", 1.0)
            .with_code("EN 1990")
            .with_tag("sls")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factors() {
        let combo = LoadCombination::uls_wind();
        assert_eq!(combo.factor("Wind"), 1.5);
        assert_eq!(combo.factor("Live"), 0.0);
        assert!(combo.includes("Snow"));
        assert_eq!(combo.case_ids(), vec!["Dead", "Snow", "Wind"]);
    }

    #[test]
    fn test_serviceability_is_unfactored() {
        let combo = LoadCombination::sls_characteristic();
        assert_eq!(combo.factor("Dead"), 1.0);
        assert_eq!(combo.factor("Snow"), 1.0);
        assert_eq!(combo.tags, vec!["sls".to_string()]);
    }
}
