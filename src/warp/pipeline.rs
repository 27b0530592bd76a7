use std::path::PathBuf;

use rayon::prelude::*;

use crate::{
    assets::io::{load_rgba8, save_rgba8},
    foundation::core::{Canvas, FrameRGBA},
    foundation::error::{LindenwarpError, LindenwarpResult},
    grammar::expand::expand,
    recipe::model::{WarpJob, WarpRecipe},
    turtle::overlay::rasterize_path,
    turtle::trace::{PathBounds, trace_bounds, trace_path},
    warp::displace::warp_rgba8,
};

/// Step length that fits `bounds` inside `canvas` with `margin` pixels
/// reserved on every side.
///
/// A degenerate extent contributes a scale of 1.0 instead of dividing by
/// zero; the other axis still constrains the fit.
pub fn fit_step(canvas: Canvas, margin: f64, bounds: PathBounds) -> f64 {
    let scale_x = if bounds.width > 0.0 {
        (f64::from(canvas.width) - 2.0 * margin) / bounds.width
    } else {
        1.0
    };
    let scale_y = if bounds.height > 0.0 {
        (f64::from(canvas.height) - 2.0 * margin) / bounds.height
    } else {
        1.0
    };
    scale_x.min(scale_y)
}

/// Expand the grammar, measure it, fit the step length, and rasterize the
/// stroked path into a transparent overlay sized to `canvas`.
#[tracing::instrument(skip(recipe))]
pub fn render_overlay(recipe: &WarpRecipe, canvas: Canvas) -> LindenwarpResult<FrameRGBA> {
    recipe.validate_for(canvas)?;

    let instructions = expand(&recipe.axiom, &recipe.rules, recipe.iterations)?;
    let heading = recipe.initial_heading();
    let bounds = trace_bounds(&instructions, recipe.turn_angle, heading);
    let step = fit_step(canvas, recipe.margin, bounds);
    tracing::debug!(
        instructions = instructions.len(),
        bounds_w = bounds.width,
        bounds_h = bounds.height,
        step,
        "traced fractal path"
    );

    let path = trace_path(
        &instructions,
        recipe.turn_angle,
        heading,
        recipe.start_for(canvas),
        step,
    );
    rasterize_path(canvas, &path, recipe.line_color, recipe.stroke_width)
}

/// Run the full pipeline for one source frame: overlay render followed by
/// the displacement warp. Pure; the only inputs are the arguments.
#[tracing::instrument(skip(recipe, source))]
pub fn warp_frame(recipe: &WarpRecipe, source: &FrameRGBA) -> LindenwarpResult<FrameRGBA> {
    let canvas = source.canvas();
    let overlay = render_overlay(recipe, canvas)?;
    let data = warp_rgba8(
        &source.data,
        &overlay.data,
        canvas.width,
        canvas.height,
        recipe.amplitude,
    )?;
    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
        premultiplied: source.premultiplied,
    })
}

/// Threading configuration for [`warp_batch`].
#[derive(Clone, Debug, Default)]
pub struct BatchOpts {
    pub parallel: bool,
    pub threads: Option<usize>,
}

/// One failed batch entry.
#[derive(Debug)]
pub struct BatchFailure {
    pub source: PathBuf,
    pub error: LindenwarpError,
}

/// Outcome bookkeeping for a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub completed: usize,
    pub failures: Vec<BatchFailure>,
}

/// Run every job through load -> warp -> save, collecting per-job failures
/// instead of aborting the batch. Jobs share no mutable state, so the
/// parallel path hands them to a dedicated rayon pool as-is.
pub fn warp_batch(jobs: &[WarpJob], opts: &BatchOpts) -> LindenwarpResult<BatchReport> {
    let results: Vec<LindenwarpResult<()>> = if opts.parallel {
        let pool = build_thread_pool(opts.threads)?;
        pool.install(|| jobs.par_iter().map(run_job).collect())
    } else {
        jobs.iter().map(run_job).collect()
    };

    let mut report = BatchReport::default();
    for (job, result) in jobs.iter().zip(results) {
        match result {
            Ok(()) => report.completed += 1,
            Err(error) => report.failures.push(BatchFailure {
                source: job.source.clone(),
                error,
            }),
        }
    }
    Ok(report)
}

fn run_job(job: &WarpJob) -> LindenwarpResult<()> {
    let source = load_rgba8(&job.source)?;
    let frame = warp_frame(&job.recipe, &source)?;
    save_rgba8(&job.output, &frame)
}

fn build_thread_pool(threads: Option<usize>) -> LindenwarpResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LindenwarpError::invalid_config(
            "batch 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Point;

    fn flat_frame(width: u32, height: u32, px: [u8; 4]) -> FrameRGBA {
        FrameRGBA {
            width,
            height,
            data: px.repeat((width * height) as usize),
            premultiplied: false,
        }
    }

    #[test]
    fn fit_step_picks_the_smaller_axis_scale() {
        let bounds = PathBounds {
            width: 40.0,
            height: 40.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let step = fit_step(Canvas::new(100, 200), 10.0, bounds);
        assert_eq!(step, 2.0);
    }

    #[test]
    fn fit_step_substitutes_degenerate_axes() {
        let flat = PathBounds {
            width: 0.0,
            height: 90.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let step = fit_step(Canvas::new(200, 200), 10.0, flat);
        assert!(step.is_finite());
        assert_eq!(step, 1.0);

        let point = PathBounds {
            width: 0.0,
            height: 0.0,
            offset_x: 0.0,
            offset_y: 0.0,
        };
        assert_eq!(fit_step(Canvas::new(200, 200), 10.0, point), 1.0);
    }

    #[test]
    fn render_overlay_paints_something_for_a_simple_square() {
        let recipe = WarpRecipe {
            axiom: "F+F+F+F".to_owned(),
            iterations: 0,
            margin: 5.0,
            start: Some(Point::new(16.0, 32.0)),
            ..WarpRecipe::default()
        };
        let overlay = render_overlay(&recipe, Canvas::new(64, 64)).unwrap();
        assert_eq!(overlay.canvas(), Canvas::new(64, 64));
        let painted = overlay.data.chunks_exact(4).filter(|px| px[3] != 0).count();
        assert!(painted > 0);
    }

    #[test]
    fn warp_frame_amplitude_zero_is_identity() {
        let recipe = WarpRecipe {
            iterations: 6,
            margin: 8.0,
            amplitude: 0.0,
            ..WarpRecipe::default()
        };
        let source = flat_frame(96, 80, [9, 8, 7, 255]);
        let out = warp_frame(&recipe, &source).unwrap();
        assert_eq!(out.data, source.data);
        assert_eq!(out.canvas(), source.canvas());
    }

    #[test]
    fn warp_frame_rejects_invalid_recipes_before_working() {
        let recipe = WarpRecipe {
            stroke_width: 0.0,
            ..WarpRecipe::default()
        };
        let source = flat_frame(96, 96, [0, 0, 0, 255]);
        let err = warp_frame(&recipe, &source).unwrap_err();
        assert!(matches!(err, LindenwarpError::InvalidConfig(_)));
    }

    #[test]
    fn batch_collects_per_job_failures() {
        let jobs = vec![
            WarpJob {
                source: PathBuf::from("definitely/missing/a.png"),
                output: PathBuf::from("ignored/a out.png"),
                recipe: WarpRecipe::default(),
            },
            WarpJob {
                source: PathBuf::from("definitely/missing/b.png"),
                output: PathBuf::from("ignored/b_out.png"),
                recipe: WarpRecipe::default(),
            },
        ];
        let report = warp_batch(&jobs, &BatchOpts::default()).unwrap();
        assert_eq!(report.completed, 0);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].source, jobs[0].source);
        assert!(matches!(
            report.failures[0].error,
            LindenwarpError::ImageLoad(_)
        ));
    }

    #[test]
    fn batch_rejects_zero_threads() {
        let opts = BatchOpts {
            parallel: true,
            threads: Some(0),
        };
        let err = warp_batch(&[], &opts).unwrap_err();
        assert!(matches!(err, LindenwarpError::InvalidConfig(_)));
    }
}
