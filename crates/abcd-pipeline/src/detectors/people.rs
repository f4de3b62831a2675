//! Connect features read from the face and people channels.

use async_trait::async_trait;

use abcd_models::{FeatureId, FeatureResult, Track};

use crate::error::PipelineResult;

use super::{apply_judge, DetectorContext, FeatureDetector, FIRST_5_SECS};

/// Faces covering at least this fraction of the frame count as a close-up.
const CLOSE_UP_MIN_AREA: f64 = 0.2;

fn track_starts_before(track: &Track, secs: f64) -> bool {
    track.segment.starts_before(secs)
}

fn track_has_close_up(track: &Track) -> bool {
    track
        .timestamped_objects
        .iter()
        .any(|o| o.normalized_bounding_box.area() >= CLOSE_UP_MIN_AREA)
}

/// Visible Face (First 5 seconds) and Visible Face (Close Up).
pub struct VisibleFaceDetector;

#[async_trait]
impl FeatureDetector for VisibleFaceDetector {
    fn name(&self) -> &'static str {
        "visible_face"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[
            FeatureId::VisibleFaceFirst5Secs,
            FeatureId::VisibleFaceCloseUp,
        ]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut first_5 = false;
        let mut close_up = false;

        if ctx.use_annotations {
            for face in &ctx.bundle.face_annotations {
                for track in &face.tracks {
                    if track_starts_before(track, FIRST_5_SECS) {
                        first_5 = true;
                    }
                    if track_has_close_up(track) {
                        close_up = true;
                    }
                }
            }
        }

        let mut first_5 = FeatureResult::new(FeatureId::VisibleFaceFirst5Secs, first_5);
        let mut close_up = FeatureResult::new(FeatureId::VisibleFaceCloseUp, close_up);

        apply_judge(
            ctx,
            &mut first_5,
            "Is a human face visible in the first 5 seconds of the video?",
        )
        .await;
        apply_judge(
            ctx,
            &mut close_up,
            "Is a close-up of a human face shown at any time in the video?",
        )
        .await;

        Ok(vec![first_5, close_up])
    }
}

/// Presence of People and its first-5-seconds variant.
pub struct PresenceOfPeopleDetector;

#[async_trait]
impl FeatureDetector for PresenceOfPeopleDetector {
    fn name(&self) -> &'static str {
        "presence_of_people"
    }

    fn features(&self) -> &'static [FeatureId] {
        &[
            FeatureId::PresenceOfPeople,
            FeatureId::PresenceOfPeopleFirst5Secs,
        ]
    }

    async fn detect(&self, ctx: &DetectorContext<'_>) -> PipelineResult<Vec<FeatureResult>> {
        let mut overall = false;
        let mut first_5 = false;

        if ctx.use_annotations {
            for person in &ctx.bundle.people_annotations {
                for track in &person.tracks {
                    overall = true;
                    if track_starts_before(track, FIRST_5_SECS) {
                        first_5 = true;
                    }
                }
            }
        }

        let mut overall = FeatureResult::new(FeatureId::PresenceOfPeople, overall);
        let mut first_5 = FeatureResult::new(FeatureId::PresenceOfPeopleFirst5Secs, first_5);

        apply_judge(
            ctx,
            &mut overall,
            "Are people present at any time in the video?",
        )
        .await;
        apply_judge(
            ctx,
            &mut first_5,
            "Are people present in the first 5 seconds of the video?",
        )
        .await;

        Ok(vec![overall, first_5])
    }
}
