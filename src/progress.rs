//! Terminal progress reporting shared by training and batch codec calls.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle, style::TemplateError};

/// Creates a styled progress bar with elapsed time, a fixed-width message
/// label, and position/total counters.
///
/// When `visible` is false the bar is still returned but never renders, so
/// callers can drive it unconditionally.
///
/// # Errors
///
/// Returns a [`TemplateError`] if the progress bar style template is invalid.
pub(crate) fn progress_bar(
    size: u64,
    msg: impl Into<String>,
    visible: bool,
) -> Result<ProgressBar, TemplateError> {
    let pb = ProgressBar::new(size);

    if !visible {
        pb.set_draw_target(ProgressDrawTarget::hidden());
        return Ok(pb);
    }

    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {msg:<30!} {wide_bar} {pos}/{len}")?;

    pb.set_style(style);
    pb.set_message(msg.into());
    pb.enable_steady_tick(std::time::Duration::from_secs(1));

    Ok(pb)
}
