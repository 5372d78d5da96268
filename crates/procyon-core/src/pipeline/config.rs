use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_CROP_MARGIN;
use crate::curve::{ControlPoint, ControlPointSet, CurveMethod};
use crate::tracker::StepTag;

/// Ordered, conditionally-executed step list for one run.
///
/// Built once from user selection (or a TOML file) and treated as immutable
/// input to the runner.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_steps")]
    pub steps: Vec<StepConfig>,
    /// Persist an artifact after every enabled step instead of only the
    /// final one. The final save happens in either mode.
    #[serde(default)]
    pub save_every_step: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            save_every_step: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(flatten)]
    pub step: Step,
}

impl StepConfig {
    pub fn enabled(step: Step) -> Self {
        Self {
            enabled: true,
            step,
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// A named pipeline step with its parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Unclip,
    BackgroundExtraction(BackgroundExtractionParams),
    PlateSolve,
    Crop(CropParams),
    ColorCalibration(ColorCalibrationParams),
    StarSeparation,
    Stretch(StretchParams),
    StarRecombination(StarRecombinationParams),
    RemoveGreen,
    Curves(CurvesParams),
    Adjustments(AdjustmentsParams),
}

impl Step {
    /// Short code appended to artifact names when this step completes.
    pub fn tag(&self) -> StepTag {
        match self {
            Self::Unclip => "UC",
            Self::BackgroundExtraction(_) => "BE",
            Self::PlateSolve => "PS",
            Self::Crop(_) => "CR",
            Self::ColorCalibration(_) => "SPCC",
            Self::StarSeparation => "StarSep",
            Self::Stretch(_) => "ST",
            Self::StarRecombination(_) => "StarComb",
            Self::RemoveGreen => "DG",
            Self::Curves(_) => "Curves",
            Self::Adjustments(_) => "Adj",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unclip => write!(f, "Unclip stars"),
            Self::BackgroundExtraction(_) => write!(f, "Background extraction"),
            Self::PlateSolve => write!(f, "Plate solve"),
            Self::Crop(_) => write!(f, "Crop"),
            Self::ColorCalibration(_) => write!(f, "Color calibration"),
            Self::StarSeparation => write!(f, "Star separation"),
            Self::Stretch(_) => write!(f, "Stretch"),
            Self::StarRecombination(_) => write!(f, "Star recombination"),
            Self::RemoveGreen => write!(f, "Remove green"),
            Self::Curves(_) => write!(f, "Curves"),
            Self::Adjustments(_) => write!(f, "Adjustments"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BackgroundExtractionParams {
    pub samples: u32,
    pub tolerance: f32,
    pub smooth: f32,
}

impl Default for BackgroundExtractionParams {
    fn default() -> Self {
        Self {
            samples: 20,
            tolerance: 3.0,
            smooth: 0.5,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CropParams {
    /// Fraction of each dimension removed from each side.
    pub margin: f32,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            margin: DEFAULT_CROP_MARGIN,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorCalibrationParams {
    pub catalog: String,
    pub white_reference: String,
    pub sensor: String,
    pub filter: String,
}

impl Default for ColorCalibrationParams {
    fn default() -> Self {
        Self {
            catalog: "gaia".into(),
            white_reference: "Average Spiral Galaxy".into(),
            sensor: "ZWO Seestar S50".into(),
            filter: "UV/IR Block".into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StretchParams {
    pub shadow_clip: f32,
    pub target_background: f32,
}

impl Default for StretchParams {
    fn default() -> Self {
        Self {
            shadow_clip: -2.8,
            target_background: 0.20,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StarRecombinationParams {
    /// Arcsinh stretch strength applied to the star mask before recombining.
    pub stretch_amount: f32,
}

impl Default for StarRecombinationParams {
    fn default() -> Self {
        Self { stretch_amount: 7.5 }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CurvesParams {
    pub method: CurveMethod,
}

impl Default for CurvesParams {
    fn default() -> Self {
        // Pull down the shadows slightly, boost the mid-to-light midtones.
        let points = ControlPointSet::new(vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(0.07, 0.035),
            ControlPoint::new(0.6, 0.75),
            ControlPoint::new(1.0, 1.0),
        ])
        .expect("default control points are valid");
        Self {
            method: CurveMethod::CubicSpline(points),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdjustmentsParams {
    pub saturation: f32,
}

impl Default for AdjustmentsParams {
    fn default() -> Self {
        Self { saturation: 0.15 }
    }
}

/// The full default step sequence, in execution order, all enabled.
pub fn default_steps() -> Vec<StepConfig> {
    vec![
        StepConfig::enabled(Step::Unclip),
        StepConfig::enabled(Step::BackgroundExtraction(Default::default())),
        StepConfig::enabled(Step::PlateSolve),
        StepConfig::enabled(Step::Crop(Default::default())),
        StepConfig::enabled(Step::ColorCalibration(Default::default())),
        StepConfig::enabled(Step::StarSeparation),
        StepConfig::enabled(Step::Stretch(Default::default())),
        StepConfig::enabled(Step::StarRecombination(Default::default())),
        StepConfig::enabled(Step::RemoveGreen),
        StepConfig::enabled(Step::Curves(Default::default())),
        StepConfig::enabled(Step::Adjustments(Default::default())),
    ]
}
