//! lindenwarp turns an L-system grammar into an image distortion.
//!
//! A recipe (`WarpRecipe`) describes a fractal and how hard it should pull
//! on the picture; the pipeline turns that into pixels in four stages:
//!
//! 1. **Expand**: `axiom + rules + iterations -> instruction sequence`
//! 2. **Measure**: unit-step turtle walk -> path bounds and origin offsets
//! 3. **Render**: scaled turtle walk -> stroked path on a transparent overlay
//! 4. **Warp**: the overlay's red channel drives a per-pixel backward
//!    displacement of the source image
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: one recipe and one source image always
//!   produce the same output bytes.
//! - **No IO in the pipeline**: [`warp_frame`] is pure; decode/encode live
//!   at the [`load_rgba8`] / [`save_rgba8`] boundary and in the CLI.
#![forbid(unsafe_code)]

mod assets;
mod foundation;
mod grammar;
mod recipe;
mod turtle;
mod warp;

pub use assets::io::{load_rgba8, save_rgba8};
pub use foundation::core::{BezPath, Canvas, FrameRGBA, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{LindenwarpError, LindenwarpResult};
pub use grammar::expand::{MAX_INSTRUCTIONS, MAX_ITERATIONS, Ruleset, expand};
pub use recipe::model::{BatchManifest, WarpJob, WarpRecipe};
pub use turtle::overlay::{composite_over, rasterize_path};
pub use turtle::trace::{PathBounds, TurtleState, trace_bounds, trace_path};
pub use warp::displace::warp_rgba8;
pub use warp::pipeline::{
    BatchFailure, BatchOpts, BatchReport, fit_step, render_overlay, warp_batch, warp_frame,
};
