//! Report rendering: persisted record, tabular matrix, human-readable digest.
//!
//! All three derive from one read-only `BrandAssessment`. The matrix derives
//! its columns from the sorted set of distinct feature names observed across
//! the whole run, so column identity is stable under video permutation and
//! detector catalogue changes; the digest keeps the aggregator's emission
//! order for readability.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use abcd_models::{BrandAssessment, VideoAssessment};
use abcd_storage::{BlobStore, PutPrecondition};

use crate::config::AssessmentConfig;
use crate::error::PipelineResult;

/// URLs of a report uploaded back to the store.
#[derive(Debug, Clone)]
pub struct ReportUrls {
    pub json_url: String,
    pub csv_url: String,
}

/// Serialize the persisted record. Scores stay unrounded; rounding is a
/// per-renderer concern.
pub fn to_json(assessment: &BrandAssessment) -> PipelineResult<String> {
    Ok(serde_json::to_string_pretty(assessment)?)
}

/// Read a persisted record back into the data model.
pub fn from_json(json: &str) -> PipelineResult<BrandAssessment> {
    Ok(serde_json::from_str(json)?)
}

/// Sorted set of distinct feature names observed across all assessments.
fn feature_columns(assessment: &BrandAssessment) -> Vec<String> {
    let mut names = BTreeSet::new();
    for video in &assessment.video_assessments {
        for feature in &video.features {
            names.insert(feature.feature.display_name().to_string());
        }
    }
    names.into_iter().collect()
}

/// Quote a CSV field if needed, doubling embedded quotes.
fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Explanation cell: newlines become spaces and quotes are doubled before
/// the value is placed in the matrix, keeping one record per row.
fn explanation_cell(explanation: &str) -> String {
    let cleaned = explanation.replace('\n', " ").replace('"', "\"\"");
    if cleaned.contains(',') || cleaned.contains('"') {
        format!("\"{}\"", cleaned)
    } else {
        cleaned
    }
}

/// Render the tabular matrix: one row per video, fixed leading columns, then
/// per-feature Detected/Score/Explanation column groups.
pub fn render_csv(assessment: &BrandAssessment) -> String {
    let features = feature_columns(assessment);

    let mut header: Vec<String> = [
        "Video Name",
        "Video URI",
        "Overall Score",
        "Passed Features",
        "Total Features",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    header.extend(features.iter().map(|f| format!("{} - Detected", f)));
    header.extend(features.iter().map(|f| format!("{} - Score", f)));
    header.extend(features.iter().map(|f| format!("{} - Explanation", f)));

    let mut out = String::new();
    out.push_str(
        &header
            .iter()
            .map(|h| csv_field(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');

    for video in &assessment.video_assessments {
        let mut detected: HashMap<&str, bool> = HashMap::new();
        let mut explanations: HashMap<&str, &str> = HashMap::new();
        for feature in &video.features {
            detected.insert(feature.feature.display_name(), feature.feature_detected);
            explanations.insert(feature.feature.display_name(), feature.explanation());
        }

        let mut row: Vec<String> = vec![
            csv_field(&video.video_name),
            csv_field(&video.video_uri),
            format!("{:.2}", video.score),
            video.passed_features_count.to_string(),
            video.total_features().to_string(),
        ];
        // A video that never produced a feature renders "No" / 0 / empty for
        // that feature's columns, keeping row width constant.
        for name in &features {
            let hit = detected.get(name.as_str()).copied().unwrap_or(false);
            row.push(if hit { "Yes" } else { "No" }.to_string());
        }
        for name in &features {
            let hit = detected.get(name.as_str()).copied().unwrap_or(false);
            row.push(if hit { "1" } else { "0" }.to_string());
        }
        for name in &features {
            let explanation = explanations.get(name.as_str()).copied().unwrap_or("");
            row.push(explanation_cell(explanation));
        }

        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Render the human-readable digest.
pub fn render_digest(assessment: &BrandAssessment) -> String {
    let mut out = format!(
        "## ABCD Assessment for brand **{}**\n",
        assessment.brand_name
    );

    for video in &assessment.video_assessments {
        out.push_str(&format!("\n### Asset Name: {}\n", video.video_name));
        out.push_str(&format!(
            "**Video Score**: {:.2}%, adherence ({}/{})\n\n",
            video.score,
            video.passed_features_count,
            video.total_features()
        ));
        out.push_str(&format!("**Asset Result**: {}\n\n", video.classification()));

        out.push_str("**Evaluated Features:**\n");
        for feature in &video.features {
            let mark = if feature.feature_detected { "✅" } else { "❌" };
            out.push_str(&format!("- {} {}\n", mark, feature.feature));
        }
    }

    out
}

/// Persist one video's assessment record locally.
pub fn store_video_assessment_locally(
    dir: &Path,
    brand_name: &str,
    assessment: &VideoAssessment,
) -> PipelineResult<()> {
    let record = serde_json::json!({
        "brand_name": brand_name,
        "assessment": assessment,
    });
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}_{}.json", brand_name, assessment.video_name));
    std::fs::write(&path, serde_json::to_string_pretty(&record)?)?;
    Ok(())
}

/// Upload the persisted record and matrix to `{brand}/assessments/`,
/// returning public or signed URLs per configuration.
pub async fn upload_report(
    store: &Arc<dyn BlobStore>,
    assessment: &BrandAssessment,
    config: &AssessmentConfig,
) -> PipelineResult<ReportUrls> {
    let timestamp = chrono::Utc::now().timestamp();
    let json_key = format!(
        "{}/assessments/assessments_{}_{}.json",
        assessment.brand_name, assessment.brand_name, timestamp
    );
    let csv_key = format!(
        "{}/assessments/abcd_analysis_{}_{}.csv",
        assessment.brand_name, assessment.brand_name, timestamp
    );

    store
        .put_bytes(
            &json_key,
            to_json(assessment)?.into_bytes(),
            PutPrecondition::None,
        )
        .await?;
    store
        .put_bytes(
            &csv_key,
            render_csv(assessment).into_bytes(),
            PutPrecondition::None,
        )
        .await?;

    let urls = ReportUrls {
        json_url: store.signed_url(&json_key, config.signed_url_ttl).await?,
        csv_url: store.signed_url(&csv_key, config.signed_url_ttl).await?,
    };

    info!(
        "Report uploaded for brand {}: {} and {}",
        assessment.brand_name, json_key, csv_key
    );

    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use abcd_models::{FeatureId, FeatureResult, LlmDetail};

    fn video_assessment(name: &str, features: Vec<FeatureResult>) -> VideoAssessment {
        VideoAssessment::from_features(
            name,
            format!("gs://ads/acme/videos/{}", name),
            features,
        )
    }

    fn sample() -> BrandAssessment {
        let mut brand = BrandAssessment::new("acme");
        brand.push(video_assessment(
            "a.mp4",
            vec![
                FeatureResult::new(FeatureId::Supers, true),
                FeatureResult::new(FeatureId::OverallPacing, false),
            ],
        ));
        brand.push(video_assessment(
            "b.mp4",
            vec![
                FeatureResult::new(FeatureId::Supers, false),
                FeatureResult::new(FeatureId::CallToActionText, true)
                    .with_llm_detail(LlmDetail::explanation("says \"shop now\",\nat 0:03")),
            ],
        ));
        brand
    }

    #[test]
    fn test_round_trip() {
        let brand = sample();
        let json = to_json(&brand).unwrap();
        let back = from_json(&json).unwrap();
        assert_eq!(back, brand);
    }

    #[test]
    fn test_csv_columns_are_sorted_and_permutation_invariant() {
        let brand = sample();
        let mut permuted = brand.clone();
        permuted.video_assessments.reverse();

        let header = render_csv(&brand).lines().next().unwrap().to_string();
        let permuted_header = render_csv(&permuted).lines().next().unwrap().to_string();
        assert_eq!(header, permuted_header);

        // Sorted distinct features: Call To Action (Text) < Overall Pacing < Supers
        let expected = "Video Name,Video URI,Overall Score,Passed Features,Total Features,\
                        Call To Action (Text) - Detected,Overall Pacing - Detected,Supers - Detected,\
                        Call To Action (Text) - Score,Overall Pacing - Score,Supers - Score,\
                        Call To Action (Text) - Explanation,Overall Pacing - Explanation,Supers - Explanation";
        assert_eq!(header, expected);
    }

    #[test]
    fn test_csv_rows_have_constant_width_and_absent_features_render_empty() {
        let brand = sample();
        let csv = render_csv(&brand);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);

        // Row a.mp4 never produced Call To Action (Text): "No" flag, 0 score.
        let row_a = lines[1];
        assert!(row_a.starts_with("a.mp4,gs://ads/acme/videos/a.mp4,50.00,1,2,No,No,Yes,0,0,1,"));

        // Row b.mp4: score 50.00, CTA detected.
        let row_b = lines[2];
        assert!(row_b.starts_with("b.mp4,gs://ads/acme/videos/b.mp4,50.00,1,2,Yes,No,No,1,0,0,"));
    }

    #[test]
    fn test_explanation_cell_cleaning() {
        let cell = explanation_cell("says \"shop now\",\nat 0:03");
        // Newline became a space, quotes doubled, field quoted for the comma.
        assert_eq!(cell, "\"says \"\"shop now\"\", at 0:03\"");
    }

    #[test]
    fn test_digest_contents() {
        let digest = render_digest(&sample());
        assert!(digest.starts_with("## ABCD Assessment for brand **acme**"));
        assert!(digest.contains("### Asset Name: a.mp4"));
        assert!(digest.contains("**Video Score**: 50.00%, adherence (1/2)"));
        assert!(digest.contains("**Asset Result**: Needs Review"));
        assert!(digest.contains("- ✅ Supers"));
        assert!(digest.contains("- ❌ Overall Pacing"));
    }

    #[test]
    fn test_digest_keeps_emission_order_per_video() {
        let digest = render_digest(&sample());
        let supers_pos = digest.find("✅ Supers").unwrap();
        let pacing_pos = digest.find("❌ Overall Pacing").unwrap();
        // a.mp4 emitted Supers before Overall Pacing, digest preserves that.
        assert!(supers_pos < pacing_pos);
    }

    #[test]
    fn test_store_locally_writes_wrapped_record() {
        let dir = tempfile::tempdir().unwrap();
        let video = video_assessment("a.mp4", vec![FeatureResult::new(FeatureId::Supers, true)]);

        store_video_assessment_locally(dir.path(), "acme", &video).unwrap();

        let written = std::fs::read_to_string(dir.path().join("acme_a.mp4.json")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["brand_name"], "acme");
        assert_eq!(parsed["assessment"]["video_name"], "a.mp4");
    }

    #[tokio::test]
    async fn test_upload_report_writes_both_artifacts() {
        use abcd_storage::MemoryBlobStore;

        let store: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        let config = AssessmentConfig::default();

        let urls = upload_report(&store, &sample(), &config).await.unwrap();
        assert!(urls.json_url.contains("acme/assessments/assessments_acme_"));
        assert!(urls.csv_url.contains("acme/assessments/abcd_analysis_acme_"));

        let listed = store.list("acme/assessments/").await.unwrap();
        assert_eq!(listed.len(), 2);
    }
}
