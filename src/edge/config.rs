use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the baseline (pre-edge) line is obtained
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeMethod {
    /// Grow the line while `ln(1 - R²)` does not get worse than the best
    /// score plus `epsilon_limit`
    #[serde(rename = "Inchworm")]
    Inchworm,

    /// Grow the line while the residual of each new point stays below the
    /// first residual scaled by `epsilon_limit`
    #[serde(rename = "Inchworm_VIT")]
    InchwormVit,

    /// Horizontal line at the intensity of the seed point
    #[default]
    #[serde(rename = "const")]
    Constant,
}

impl EdgeMethod {
    /// Returns all accepted configuration names.
    pub fn variants() -> &'static [&'static str] {
        &["Inchworm", "Inchworm_VIT", "const"]
    }
}

impl fmt::Display for EdgeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeMethod::Inchworm => write!(f, "Inchworm"),
            EdgeMethod::InchwormVit => write!(f, "Inchworm_VIT"),
            EdgeMethod::Constant => write!(f, "const"),
        }
    }
}

impl FromStr for EdgeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Inchworm" => Ok(EdgeMethod::Inchworm),
            "Inchworm_VIT" => Ok(EdgeMethod::InchwormVit),
            "const" => Ok(EdgeMethod::Constant),
            _ => Err(format!(
                "Unknown edge method '{}'. Valid options: {}",
                s,
                Self::variants().join(", ")
            )),
        }
    }
}

/// Empirical constants of the edge search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeParameters {
    /// Points skipped between the edge line and the slider start
    /// (`const_skip`)
    pub points_to_skip: usize,

    /// Inchworm forgiveness (`const_eps`)
    pub epsilon_limit: f64,

    /// Boxcar half-width applied to intensities before differentiation
    /// (`const_smooth1`)
    pub smoothing_intensities: usize,

    /// Boxcar half-width applied to the derivative (`const_smooth2`)
    pub smoothing_derivatives: usize,

    /// Half-width of the derivative-maximum search window around the previous
    /// maximum (`const_1DHalfW`)
    pub search_half_width: usize,

    /// Slider forgiveness above the running derivative minimum
    /// (`const_slider`)
    pub slider_limit: f64,

    /// Baseline line method (`absorbtion_edge`)
    pub method: EdgeMethod,
}

impl Default for EdgeParameters {
    fn default() -> Self {
        Self {
            points_to_skip: 5,
            epsilon_limit: 1.2,
            smoothing_intensities: 10,
            smoothing_derivatives: 10,
            search_half_width: 20,
            slider_limit: 0.0,
            method: EdgeMethod::Constant,
        }
    }
}

impl EdgeParameters {
    /// Check that the floating-point constants are usable.
    pub fn validate(&self) -> Result<(), String> {
        if !self.epsilon_limit.is_finite() {
            return Err(format!("epsilon limit must be finite, got {}", self.epsilon_limit));
        }
        if !self.slider_limit.is_finite() {
            return Err(format!("slider limit must be finite, got {}", self.slider_limit));
        }
        Ok(())
    }
}
