use std::path::{Path, PathBuf};

use tracing::debug;

use crate::consts::{STARLESS_RESULT, STARMASK_PREFIX, STARMASK_RESULT};
use crate::curve;
use crate::error::Result;
use crate::host::HostSession;
use crate::io::image_io;
use crate::tracker::StepTracker;

use super::config::{
    AdjustmentsParams, BackgroundExtractionParams, ColorCalibrationParams, CropParams,
    CurvesParams, StarRecombinationParams, Step, StretchParams,
};

/// Execute one step body against the host. Each body appends its own tag to
/// the tracker once its work is done (the curves step appends mid-body, before
/// writing its tag-named output).
pub(super) fn execute(
    step: &Step,
    host: &mut dyn HostSession,
    tracker: &mut StepTracker,
    base: &Path,
) -> Result<()> {
    match step {
        Step::Unclip => host.send_command("unclipstars", &[])?,
        Step::BackgroundExtraction(p) => background_extraction(host, p)?,
        Step::PlateSolve => host.send_command("platesolve", &[])?,
        Step::Crop(p) => crop(host, p)?,
        Step::ColorCalibration(p) => color_calibration(host, p)?,
        Step::StarSeparation => star_separation(host)?,
        Step::Stretch(p) => stretch(host, p)?,
        Step::StarRecombination(p) => return star_recombination(host, tracker, base, step, p),
        Step::RemoveGreen => host.send_command("rmgreen", &[])?,
        Step::Curves(p) => return curves(host, tracker, base, step, p),
        Step::Adjustments(p) => adjustments(host, p)?,
    }
    tracker.append(step.tag());
    Ok(())
}

fn background_extraction(
    host: &mut dyn HostSession,
    p: &BackgroundExtractionParams,
) -> Result<()> {
    host.send_command(
        "subsky",
        &[
            "-rbf".into(),
            "-dither".into(),
            format!("-samples={}", p.samples),
            format!("-tolerance={}", p.tolerance),
            format!("-smooth={}", p.smooth),
        ],
    )
}

fn crop(host: &mut dyn HostSession, p: &CropParams) -> Result<()> {
    let (_channels, height, width) = host.image_dimensions()?;
    let h_delta = p.margin * height as f32;
    let w_delta = p.margin * width as f32;
    host.send_command(
        "crop",
        &[
            format!("{w_delta}"),
            format!("{h_delta}"),
            format!("{}", width as f32 - 2.0 * w_delta),
            format!("{}", height as f32 - 2.0 * h_delta),
        ],
    )
}

fn color_calibration(host: &mut dyn HostSession, p: &ColorCalibrationParams) -> Result<()> {
    host.send_command(
        "spcc",
        &[
            format!("-catalog={}", p.catalog),
            format!("-whiteref={}", p.white_reference),
            format!("-oscsensor={}", p.sensor),
            format!("-oscfilter={}", p.filter),
        ],
    )
}

fn star_separation(host: &mut dyn HostSession) -> Result<()> {
    host.send_command("starnet", &["-stretch".into()])?;
    host.save(Path::new(STARLESS_RESULT))?;
    host.load(Path::new(STARLESS_RESULT))
}

fn stretch(host: &mut dyn HostSession, p: &StretchParams) -> Result<()> {
    host.send_command(
        "autostretch",
        &[
            format!("{}", p.shadow_clip),
            format!("{}", p.target_background),
        ],
    )
}

/// Recombine the starless image with its independently-stretched star mask.
///
/// When separation was applied earlier, the current image *is* the processed
/// starless layer and gets re-saved under the starless name. When separation
/// was skipped, the current image stands in as its own starless proxy so the
/// step still completes instead of failing on the missing dependency.
fn star_recombination(
    host: &mut dyn HostSession,
    tracker: &mut StepTracker,
    base: &Path,
    step: &Step,
    p: &StarRecombinationParams,
) -> Result<()> {
    if !tracker.contains("StarSep") {
        debug!("star separation was skipped; using current image as starless proxy");
    }
    host.save(Path::new(STARLESS_RESULT))?;

    let starmask = starmask_path(base);
    debug!(starmask = %starmask.display(), "loading companion star mask");
    host.load(&starmask)?;
    host.send_command(
        "modasinh",
        &["-human".into(), format!("-D={}", p.stretch_amount)],
    )?;
    host.save(Path::new(STARMASK_RESULT))?;
    host.send_command(
        "pm",
        &[format!("${STARLESS_RESULT}$ + ${STARMASK_RESULT}$")],
    )?;

    tracker.append(step.tag());
    Ok(())
}

/// The star-separation tool writes the mask next to the input, prefixed.
fn starmask_path(base: &Path) -> PathBuf {
    let file_name = base
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mask_name = format!("{STARMASK_PREFIX}{file_name}");
    match base.parent() {
        Some(parent) => parent.join(mask_name),
        None => PathBuf::from(mask_name),
    }
}

/// Pixel-level tone curve: materialize the current image as lossless TIFF,
/// transform it locally, write it back under the tag-derived name, and hand
/// it back to the host.
fn curves(
    host: &mut dyn HostSession,
    tracker: &mut StepTracker,
    base: &Path,
    step: &Step,
    p: &CurvesParams,
) -> Result<()> {
    let input = tracker.artifact_name(base, Some(".tif"));
    host.save(&input)?;

    let image = image_io::load_image(&input)?;
    let adjusted = curve::apply(&image, &p.method)?;

    // Tag first: the processed output carries the step in its name.
    tracker.append(step.tag());
    let output = tracker.artifact_name(base, Some(".tif"));
    image_io::save_image(&adjusted, &output)?;

    host.load(&output)
}

fn adjustments(host: &mut dyn HostSession, p: &AdjustmentsParams) -> Result<()> {
    host.send_command("satu", &[format!("{}", p.saturation)])
}
