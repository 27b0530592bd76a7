use std::path::PathBuf;

use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::error::{LindenwarpError, LindenwarpResult};
use crate::grammar::expand::{MAX_ITERATIONS, Ruleset};

/// Full configuration for one warp invocation.
///
/// Every field has a default, so an empty JSON object (`{}`) is a usable
/// recipe: the classic dragon-curve grammar drawn in red and warped at
/// amplitude 100.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WarpRecipe {
    pub axiom: String,
    pub rules: Ruleset,
    pub iterations: u32,
    /// Turn angle in degrees applied by `+` (subtracted) and `-` (added).
    pub turn_angle: f64,
    /// Heading in degrees at the first instruction. `None` derives
    /// `turn_angle * iterations / 2`, which keeps the net orientation
    /// stable as the iteration count changes.
    pub initial_heading: Option<f64>,
    /// Margin in pixels reserved on every side when fitting the step length.
    pub margin: f64,
    /// Overlay start position in pixels. `None` means the canvas center.
    pub start: Option<Point>,
    pub line_color: Rgba8,
    pub stroke_width: f64,
    /// Peak-to-peak displacement in pixels driven by the overlay.
    pub amplitude: f64,
}

impl Default for WarpRecipe {
    fn default() -> Self {
        Self {
            axiom: "FX+FX+FX".to_owned(),
            rules: [('X', "X+YF+".to_owned()), ('Y', "-FX-Y".to_owned())]
                .into_iter()
                .collect(),
            iterations: 15,
            turn_angle: 90.0,
            initial_heading: None,
            margin: 35.0,
            start: None,
            line_color: Rgba8::new(255, 0, 0, 255),
            stroke_width: 2.0,
            amplitude: 100.0,
        }
    }
}

impl WarpRecipe {
    /// Heading in effect at the first instruction.
    pub fn initial_heading(&self) -> f64 {
        self.initial_heading
            .unwrap_or(self.turn_angle * f64::from(self.iterations) / 2.0)
    }

    /// Overlay start position for `canvas`.
    pub fn start_for(&self, canvas: Canvas) -> Point {
        self.start.unwrap_or_else(|| canvas.center())
    }

    /// Canvas-independent parameter checks.
    pub fn validate(&self) -> LindenwarpResult<()> {
        if self.iterations > MAX_ITERATIONS {
            return Err(LindenwarpError::invalid_config(format!(
                "iterations must be <= {MAX_ITERATIONS}, got {}",
                self.iterations
            )));
        }
        if !self.turn_angle.is_finite() {
            return Err(LindenwarpError::invalid_config("turn_angle must be finite"));
        }
        if let Some(h) = self.initial_heading
            && !h.is_finite()
        {
            return Err(LindenwarpError::invalid_config(
                "initial_heading must be finite",
            ));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(LindenwarpError::invalid_config(
                "margin must be finite and >= 0",
            ));
        }
        if let Some(p) = self.start
            && (!p.x.is_finite() || !p.y.is_finite())
        {
            return Err(LindenwarpError::invalid_config("start must be finite"));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(LindenwarpError::invalid_config("stroke_width must be > 0"));
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(LindenwarpError::invalid_config(
                "amplitude must be finite and >= 0",
            ));
        }
        Ok(())
    }

    /// [`validate`](Self::validate) plus checks against the target canvas.
    pub fn validate_for(&self, canvas: Canvas) -> LindenwarpResult<()> {
        self.validate()?;
        if canvas.width == 0 || canvas.height == 0 {
            return Err(LindenwarpError::invalid_config(
                "canvas width/height must be > 0",
            ));
        }
        let min_dim = f64::from(canvas.width.min(canvas.height));
        if 2.0 * self.margin >= min_dim {
            return Err(LindenwarpError::invalid_config(format!(
                "margin {} leaves no drawable area on a {}x{} canvas",
                self.margin, canvas.width, canvas.height
            )));
        }
        Ok(())
    }
}

/// One batch entry: warp `source` into `output` with `recipe`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct WarpJob {
    pub source: PathBuf,
    pub output: PathBuf,
    #[serde(default)]
    pub recipe: WarpRecipe,
}

/// Batch file: a list of jobs run through the same runner.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BatchManifest {
    pub jobs: Vec<WarpJob>,
}

impl BatchManifest {
    /// Validate every job's recipe, naming the offending job on failure.
    pub fn validate(&self) -> LindenwarpResult<()> {
        for (idx, job) in self.jobs.iter().enumerate() {
            if let Err(e) = job.recipe.validate() {
                return Err(match e {
                    LindenwarpError::InvalidConfig(msg) => {
                        LindenwarpError::invalid_config(format!(
                            "job {idx} ({}): {msg}",
                            job.source.display()
                        ))
                    }
                    other => other,
                });
            }
        }
        Ok(())
    }
}
