//! Linear model over binary and real-valued features.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

#[derive(Debug, Default, Clone)]
pub struct FeatureWeights {
    weights: HashMap<String, f32>,
}

impl FeatureWeights {
    /// Loads whitespace-separated `<feature> <weight>` pairs.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("open weights {}", path.display()))?;
        let weights = Self::parse(&text).with_context(|| format!("parse {}", path.display()))?;
        info!(path = %path.display(), features = weights.len(), "loaded feature weights");
        Ok(weights)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut weights = HashMap::new();
        let mut fields = text.split_whitespace();
        while let Some(feature) = fields.next() {
            let Some(value) = fields.next() else {
                bail!("feature {feature:?} has no weight");
            };
            let weight: f32 = value
                .parse()
                .with_context(|| format!("bad weight {value:?} for {feature:?}"))?;
            weights.insert(feature.to_string(), weight);
        }
        Ok(Self { weights })
    }

    pub fn get(&self, feature: &str) -> Option<f32> {
        self.weights.get(feature).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Probability that the target is pleonastic.
    pub fn predict(&self, binary: &[String], real: &[(String, f32)]) -> f32 {
        let mut score: f32 = binary.iter().filter_map(|f| self.get(f)).sum();
        score += real
            .iter()
            .filter_map(|(f, v)| self.get(f).map(|w| w * v))
            .sum::<f32>();
        logistic(score)
    }
}

/// `1 / (1 + e^-score)`, arranged so `exp` never overflows.
pub fn logistic(score: f32) -> f32 {
    if score >= 0.0 {
        1.0 / (1.0 + (-score).exp())
    } else {
        let e = score.exp();
        e / (1.0 + e)
    }
}
