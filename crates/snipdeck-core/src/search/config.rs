//! Configuration for hybrid search.

use serde::{Deserialize, Serialize};

/// Hybrid search settings.
///
/// Weights and floor are tuning knobs for the scorer; the rest bound the
/// work done per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Weight of vector similarity in the hybrid score.
    /// Default: 0.7
    pub vector_weight: f64,

    /// Score bonus for a title keyword match.
    /// Default: 0.3
    pub keyword_weight: f64,

    /// Similarity a candidate must exceed to be included without a keyword match.
    /// Range: -1.0-1.0. Default: 0.3
    pub similarity_floor: f64,

    /// Results returned when the caller gives no limit.
    /// Default: 20
    pub default_limit: usize,

    /// Rows pulled from each storage query before ranking.
    /// Default: 50
    pub candidate_pool: usize,

    /// Budget for the query embedding call, in milliseconds.
    /// Default: 5000
    pub embed_timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            vector_weight: 0.7,
            keyword_weight: 0.3,
            similarity_floor: 0.3,
            default_limit: 20,
            candidate_pool: 50,
            embed_timeout_ms: 5000,
        }
    }
}

impl SearchConfig {
    /// Validate configuration values are in valid ranges.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.vector_weight < 0.0 || self.keyword_weight < 0.0 {
            return Err("search weights must be non-negative");
        }
        if !(-1.0..=1.0).contains(&self.similarity_floor) {
            return Err("similarity_floor must be between -1.0 and 1.0");
        }
        if self.default_limit == 0 {
            return Err("default_limit must be at least 1");
        }
        if self.candidate_pool == 0 {
            return Err("candidate_pool must be at least 1");
        }
        if self.embed_timeout_ms == 0 {
            return Err("embed_timeout_ms must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert!((config.vector_weight - 0.7).abs() < 1e-6);
        assert!((config.keyword_weight - 0.3).abs() < 1e-6);
        assert!((config.similarity_floor - 0.3).abs() < 1e-6);
        assert_eq!(config.default_limit, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let negative = SearchConfig {
            keyword_weight: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let floor = SearchConfig {
            similarity_floor: 1.5,
            ..Default::default()
        };
        assert!(floor.validate().is_err());

        let pool = SearchConfig {
            candidate_pool: 0,
            ..Default::default()
        };
        assert!(pool.validate().is_err());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: SearchConfig = serde_json::from_str(r#"{"similarity_floor": 0.5}"#).unwrap();
        assert!((config.similarity_floor - 0.5).abs() < 1e-6);
        assert_eq!(config.candidate_pool, 50);
    }
}
