//! Preview clip extraction.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};

/// Default encoder settings for derived preview clips.
const VIDEO_CODEC: &str = "libx264";
const AUDIO_CODEC: &str = "aac";
const CRF: u8 = 23;
const PRESET: &str = "fast";

/// Upper bound on one trim run; preview clips are seconds long, so anything
/// slower indicates a wedged decode.
const TRIM_TIMEOUT_SECS: u64 = 300;

/// Extract and re-encode the `[start_secs, end_secs)` window of a video.
///
/// Re-encoding (rather than stream copy) keeps the output playable from
/// frame zero regardless of where the source's keyframes fall.
pub async fn trim_clip<P: AsRef<Path>>(
    input: P,
    output: P,
    start_secs: f64,
    end_secs: f64,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if start_secs < 0.0 || end_secs <= start_secs {
        return Err(MediaError::InvalidWindow {
            start: start_secs,
            end: end_secs,
        });
    }
    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    info!(
        "Trimming {} -> {} ({:.2}s..{:.2}s)",
        input.display(),
        output.display(),
        start_secs,
        end_secs
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(start_secs)
        .duration(end_secs - start_secs)
        .video_codec(VIDEO_CODEC)
        .preset(PRESET)
        .crf(CRF)
        .audio_codec(AUDIO_CODEC);

    FfmpegRunner::new()
        .with_timeout(TRIM_TIMEOUT_SECS)
        .run(&cmd)
        .await?;

    info!("Preview clip written: {}", output.display());
    Ok(())
}
