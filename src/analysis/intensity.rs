use crate::error::{HeatmapError, HmResult};
use serde::Serialize;
use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum NormalizationKind {
    Power,
    Log,
    Linear,
}

/// How a position inside `[min, max]` is bent before coloring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Normalization {
    /// `t^gamma`; `gamma < 1` lifts rarely used keys off the floor.
    Power { gamma: f64 },
    /// `ln(1 + c - min) / ln(1 + max - min)`.
    Log,
    Linear,
}

impl Normalization {
    pub fn power(gamma: f64) -> HmResult<Self> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(HeatmapError::Config(format!(
                "gamma must be a positive number, got {}",
                gamma
            )));
        }
        Ok(Self::Power { gamma })
    }

    pub fn from_kind(kind: NormalizationKind, gamma: f64) -> HmResult<Self> {
        match kind {
            NormalizationKind::Power => Self::power(gamma),
            NormalizationKind::Log => Ok(Self::Log),
            NormalizationKind::Linear => Ok(Self::Linear),
        }
    }

    /// Maps `offset` in `[0, span]` to `[0, 1]`. `span` is always >= 1.
    fn apply(&self, offset: f64, span: f64) -> f64 {
        match *self {
            Self::Power { gamma } => (offset / span).powf(gamma),
            Self::Log => offset.ln_1p() / span.ln_1p(),
            Self::Linear => offset / span,
        }
    }
}

impl Default for Normalization {
    fn default() -> Self {
        Self::Power { gamma: 0.6 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntensityScale {
    pub min: f64,
    pub max: f64,
    pub normalization: Normalization,
}

impl IntensityScale {
    /// Scale over the observed counts. A flat or empty set is widened to
    /// `[min, min + 1]` so the mapping stays strictly increasing.
    pub fn from_counts<I>(counts: I, normalization: Normalization) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let (min, max) = counts
            .into_iter()
            .fold(None, |acc: Option<(u64, u64)>, c| match acc {
                None => Some((c, c)),
                Some((lo, hi)) => Some((lo.min(c), hi.max(c))),
            })
            .map(|(lo, hi)| (lo as f64, hi as f64))
            .unwrap_or((0.0, 0.0));

        let max = if min >= max { min + 1.0 } else { max };

        Self {
            min,
            max,
            normalization,
        }
    }

    /// Normalized intensity in `[0, 1]`; counts outside the scale clamp.
    pub fn intensity(&self, count: u64) -> f64 {
        let span = self.max - self.min;
        let offset = (count as f64 - self.min).clamp(0.0, span);
        self.normalization.apply(offset, span).clamp(0.0, 1.0)
    }
}
