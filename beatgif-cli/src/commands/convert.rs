// beatgif-cli/src/commands/convert.rs
//
// Runs the clip pipeline with the production ffprobe, ffmpeg and catalog
// implementations and prints the per-output summary.

use std::path::Path;

use beatgif_core::metadata::beatsaver::DEFAULT_REQUEST_TIMEOUT;
use beatgif_core::{
    BeatSaverClient, ClipReport, CoreResult, EncodeConfig, FfprobeProber, SidecarSpawner,
    process_clip,
};

use crate::terminal;

/// Converts `input` and returns the report of both outputs.
pub fn run_convert(config: &EncodeConfig, input: &Path) -> CoreResult<ClipReport> {
    let resolver = BeatSaverClient::new(&config.metadata_base_url, DEFAULT_REQUEST_TIMEOUT);
    let prober = FfprobeProber::new(&config.ffprobe_path, config.tool_timeout);

    let report = process_clip(config, &resolver, &prober, &SidecarSpawner, input)?;
    print_report(&report);
    Ok(report)
}

fn print_report(report: &ClipReport) {
    terminal::print_section("Summary");
    if let Some(reason) = &report.metadata_error {
        terminal::print_warning(&format!("Metadata unavailable: {reason}"));
    }
    for output in &report.outputs {
        match &output.result {
            Ok(stats) => terminal::print_status(
                &output.kind.to_string(),
                &format!(
                    "{} ({})",
                    stats.output_path.display(),
                    beatgif_core::format_bytes(stats.output_size)
                ),
                true,
            ),
            Err(e) => terminal::print_status(
                &output.kind.to_string(),
                &format!("failed: {e}"),
                false,
            ),
        }
    }
    if report.succeeded() {
        log::info!("Finished {} ({})", report.clip.map_id, report.clip.label);
    } else {
        log::error!(
            "{} of {} outputs failed for {}",
            report.failed_outputs().count(),
            report.outputs.len(),
            report.clip.map_id
        );
    }
}
