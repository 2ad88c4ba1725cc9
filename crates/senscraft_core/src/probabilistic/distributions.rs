//! Random weight distributions.
//!
//! Each distribution draws raw samples, takes absolute values, and divides
//! by their sum so every draw is a valid weight vector.

use ndarray::Array1;
use rand::Rng;
use rand::distr::{Distribution, Open01};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SensitivityError};

/// Names accepted by [`WeightDistribution::from_name`]
pub const DISTRIBUTION_NAMES: &[&str] = &[
    "chisquare",
    "laplace",
    "normal",
    "random",
    "triangular",
    "uniform",
];

fn default_df() -> f64 {
    1.0
}

fn default_scale() -> f64 {
    1.0
}

fn default_mode() -> f64 {
    0.5
}

fn default_upper() -> f64 {
    1.0
}

/// Source distribution for random weight vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum WeightDistribution {
    ChiSquare {
        #[serde(default = "default_df")]
        df: f64,
    },
    Laplace {
        #[serde(default)]
        loc: f64,
        #[serde(default = "default_scale")]
        scale: f64,
    },
    Normal {
        #[serde(default)]
        loc: f64,
        #[serde(default = "default_scale")]
        scale: f64,
    },
    /// Uniform on `[0, 1)`
    Random,
    Triangular {
        #[serde(default)]
        left: f64,
        #[serde(default = "default_mode")]
        mode: f64,
        #[serde(default = "default_upper")]
        right: f64,
    },
    Uniform {
        #[serde(default)]
        low: f64,
        #[serde(default = "default_upper")]
        high: f64,
    },
}

impl Default for WeightDistribution {
    fn default() -> Self {
        WeightDistribution::Uniform {
            low: 0.0,
            high: 1.0,
        }
    }
}

impl WeightDistribution {
    /// Build a distribution from its name and keyword parameters.
    ///
    /// Missing parameters take their defaults; unknown names or parameters
    /// are rejected.
    pub fn from_name(name: &str, params: &FxHashMap<String, f64>) -> Result<Self> {
        let (allowed, distribution): (&[&str], _) = match name {
            "chisquare" => (&["df"], WeightDistribution::ChiSquare {
                df: params.get("df").copied().unwrap_or_else(default_df),
            }),
            "laplace" => (&["loc", "scale"], WeightDistribution::Laplace {
                loc: params.get("loc").copied().unwrap_or_default(),
                scale: params.get("scale").copied().unwrap_or_else(default_scale),
            }),
            "normal" => (&["loc", "scale"], WeightDistribution::Normal {
                loc: params.get("loc").copied().unwrap_or_default(),
                scale: params.get("scale").copied().unwrap_or_else(default_scale),
            }),
            "random" => (&[], WeightDistribution::Random),
            "triangular" => (&["left", "mode", "right"], WeightDistribution::Triangular {
                left: params.get("left").copied().unwrap_or_default(),
                mode: params.get("mode").copied().unwrap_or_else(default_mode),
                right: params.get("right").copied().unwrap_or_else(default_upper),
            }),
            "uniform" => (&["low", "high"], WeightDistribution::Uniform {
                low: params.get("low").copied().unwrap_or_default(),
                high: params.get("high").copied().unwrap_or_else(default_upper),
            }),
            _ => {
                return Err(SensitivityError::UnknownDistribution {
                    name: name.to_string(),
                    allowed: DISTRIBUTION_NAMES,
                });
            }
        };

        if let Some(unknown) = params.keys().find(|k| !allowed.contains(&k.as_str())) {
            return Err(SensitivityError::InvalidDistribution {
                distribution: distribution.name(),
                reason: format!("unexpected parameter `{unknown}`"),
            });
        }
        distribution.validate()?;
        Ok(distribution)
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            WeightDistribution::ChiSquare { .. } => "chisquare",
            WeightDistribution::Laplace { .. } => "laplace",
            WeightDistribution::Normal { .. } => "normal",
            WeightDistribution::Random => "random",
            WeightDistribution::Triangular { .. } => "triangular",
            WeightDistribution::Uniform { .. } => "uniform",
        }
    }

    fn invalid(&self, reason: &str) -> SensitivityError {
        SensitivityError::InvalidDistribution {
            distribution: self.name(),
            reason: reason.to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            WeightDistribution::ChiSquare { df } if !(df > 0.0 && df.is_finite()) => {
                Err(self.invalid("df should be positive and finite"))
            }
            WeightDistribution::Laplace { scale, .. } | WeightDistribution::Normal { scale, .. }
                if !(scale >= 0.0 && scale.is_finite()) =>
            {
                Err(self.invalid("scale should be non-negative and finite"))
            }
            WeightDistribution::Triangular { left, mode, right }
                if !(left <= mode && mode <= right && left < right) =>
            {
                Err(self.invalid("expected left <= mode <= right with left < right"))
            }
            WeightDistribution::Uniform { low, high } if !(low < high) => {
                Err(self.invalid("low should be less than high"))
            }
            _ => Ok(()),
        }
    }

    /// Draw one raw sample.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64> {
        match *self {
            WeightDistribution::ChiSquare { df } => rand_distr::ChiSquared::new(df)
                .map(|d| d.sample(rng))
                .map_err(|_| self.invalid("df should be positive and finite")),
            WeightDistribution::Laplace { loc, scale } => {
                // rand_distr has no Laplace; inverse CDF on u in (-0.5, 0.5)
                let x: f64 = Open01.sample(rng);
                let u = x - 0.5;
                Ok(loc - scale * u.signum() * (1.0 - 2.0 * u.abs()).ln())
            }
            WeightDistribution::Normal { loc, scale } => rand_distr::Normal::new(loc, scale)
                .map(|d| d.sample(rng))
                .map_err(|_| self.invalid("scale should be non-negative and finite")),
            WeightDistribution::Random => Ok(rng.random::<f64>()),
            WeightDistribution::Triangular { left, mode, right } => {
                rand_distr::Triangular::new(left, right, mode)
                    .map(|d| d.sample(rng))
                    .map_err(|_| self.invalid("expected left <= mode <= right"))
            }
            WeightDistribution::Uniform { low, high } => rand_distr::Uniform::new(low, high)
                .map(|d| d.sample(rng))
                .map_err(|_| self.invalid("low should be less than high")),
        }
    }

    /// Draw `size` samples and normalize their absolute values to sum to one.
    pub fn sample_weights<R: Rng + ?Sized>(&self, size: usize, rng: &mut R) -> Result<Array1<f64>> {
        let raw = (0..size)
            .map(|_| self.sample(rng).map(f64::abs))
            .collect::<Result<Vec<_>>>()?;
        let total: f64 = raw.iter().sum();
        if !(total > 0.0 && total.is_finite()) {
            return Err(self.invalid("drawn samples do not have a positive finite sum"));
        }
        Ok(Array1::from_vec(raw) / total)
    }
}
