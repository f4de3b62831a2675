//! The rubric feature catalogue.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One named rubric check in the ABCD catalogue.
///
/// Serialized by human name so persisted records read naturally and join
/// against historical reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum FeatureId {
    #[serde(rename = "Quick Pacing")]
    QuickPacing,
    #[serde(rename = "Quick Pacing (First 5 seconds)")]
    QuickPacingFirst5Secs,
    #[serde(rename = "Dynamic Start")]
    DynamicStart,
    #[serde(rename = "Supers")]
    Supers,
    #[serde(rename = "Supers with Audio")]
    SupersWithAudio,
    #[serde(rename = "Brand Visuals")]
    BrandVisuals,
    #[serde(rename = "Brand Visuals (First 5 seconds)")]
    BrandVisualsFirst5Secs,
    #[serde(rename = "Brand Mention (Speech)")]
    BrandMentionSpeech,
    #[serde(rename = "Brand Mention (Speech) (First 5 seconds)")]
    BrandMentionSpeechFirst5Secs,
    #[serde(rename = "Product Visuals")]
    ProductVisuals,
    #[serde(rename = "Product Visuals (First 5 seconds)")]
    ProductVisualsFirst5Secs,
    #[serde(rename = "Product Mention (Text)")]
    ProductMentionText,
    #[serde(rename = "Product Mention (Text) (First 5 seconds)")]
    ProductMentionTextFirst5Secs,
    #[serde(rename = "Product Mention (Speech)")]
    ProductMentionSpeech,
    #[serde(rename = "Product Mention (Speech) (First 5 seconds)")]
    ProductMentionSpeechFirst5Secs,
    #[serde(rename = "Visible Face (First 5 seconds)")]
    VisibleFaceFirst5Secs,
    #[serde(rename = "Visible Face (Close Up)")]
    VisibleFaceCloseUp,
    #[serde(rename = "Presence of People")]
    PresenceOfPeople,
    #[serde(rename = "Presence of People (First 5 seconds)")]
    PresenceOfPeopleFirst5Secs,
    #[serde(rename = "Audio Early (First 5 seconds)")]
    AudioEarlyFirst5Secs,
    #[serde(rename = "Overall Pacing")]
    OverallPacing,
    #[serde(rename = "Call To Action (Speech)")]
    CallToActionSpeech,
    #[serde(rename = "Call To Action (Text)")]
    CallToActionText,
}

impl FeatureId {
    /// Human name, identical to the serialized form.
    pub fn display_name(&self) -> &'static str {
        match self {
            FeatureId::QuickPacing => "Quick Pacing",
            FeatureId::QuickPacingFirst5Secs => "Quick Pacing (First 5 seconds)",
            FeatureId::DynamicStart => "Dynamic Start",
            FeatureId::Supers => "Supers",
            FeatureId::SupersWithAudio => "Supers with Audio",
            FeatureId::BrandVisuals => "Brand Visuals",
            FeatureId::BrandVisualsFirst5Secs => "Brand Visuals (First 5 seconds)",
            FeatureId::BrandMentionSpeech => "Brand Mention (Speech)",
            FeatureId::BrandMentionSpeechFirst5Secs => "Brand Mention (Speech) (First 5 seconds)",
            FeatureId::ProductVisuals => "Product Visuals",
            FeatureId::ProductVisualsFirst5Secs => "Product Visuals (First 5 seconds)",
            FeatureId::ProductMentionText => "Product Mention (Text)",
            FeatureId::ProductMentionTextFirst5Secs => "Product Mention (Text) (First 5 seconds)",
            FeatureId::ProductMentionSpeech => "Product Mention (Speech)",
            FeatureId::ProductMentionSpeechFirst5Secs => {
                "Product Mention (Speech) (First 5 seconds)"
            }
            FeatureId::VisibleFaceFirst5Secs => "Visible Face (First 5 seconds)",
            FeatureId::VisibleFaceCloseUp => "Visible Face (Close Up)",
            FeatureId::PresenceOfPeople => "Presence of People",
            FeatureId::PresenceOfPeopleFirst5Secs => "Presence of People (First 5 seconds)",
            FeatureId::AudioEarlyFirst5Secs => "Audio Early (First 5 seconds)",
            FeatureId::OverallPacing => "Overall Pacing",
            FeatureId::CallToActionSpeech => "Call To Action (Speech)",
            FeatureId::CallToActionText => "Call To Action (Text)",
        }
    }

    /// Rubric criteria the feature evaluates.
    pub fn description(&self) -> &'static str {
        match self {
            FeatureId::QuickPacing => {
                "At least 5 shot changes are detected in the video."
            }
            FeatureId::QuickPacingFirst5Secs => {
                "At least 5 shot changes are detected in the first 5 seconds of the video."
            }
            FeatureId::DynamicStart => {
                "The first shot in the video changes in less than 3 seconds."
            }
            FeatureId::Supers => {
                "Any supers (text overlays) have been incorporated at any time in the video."
            }
            FeatureId::SupersWithAudio => {
                "The speech heard in the audio of the video matches or is contextually \
                 supportive of the overlaid text shown on screen."
            }
            FeatureId::BrandVisuals => {
                "The brand name or brand logo is shown in the video at any time."
            }
            FeatureId::BrandVisualsFirst5Secs => {
                "The brand name or brand logo is shown in the first 5 seconds of the video."
            }
            FeatureId::BrandMentionSpeech => {
                "The brand name is heard in the audio or speech at any time in the video."
            }
            FeatureId::BrandMentionSpeechFirst5Secs => {
                "The brand name is heard in the audio or speech in the first 5 seconds of the video."
            }
            FeatureId::ProductVisuals => {
                "A branded product or branded product category is shown in the video at any time."
            }
            FeatureId::ProductVisualsFirst5Secs => {
                "A branded product or branded product category is shown in the first 5 seconds \
                 of the video."
            }
            FeatureId::ProductMentionText => {
                "A branded product or branded product category is shown in on-screen text at \
                 any time in the video."
            }
            FeatureId::ProductMentionTextFirst5Secs => {
                "A branded product or branded product category is shown in on-screen text in \
                 the first 5 seconds of the video."
            }
            FeatureId::ProductMentionSpeech => {
                "A branded product or branded product category is heard in the speech at any \
                 time in the video."
            }
            FeatureId::ProductMentionSpeechFirst5Secs => {
                "A branded product or branded product category is heard in the speech in the \
                 first 5 seconds of the video."
            }
            FeatureId::VisibleFaceFirst5Secs => {
                "A human face is visible in the first 5 seconds of the video."
            }
            FeatureId::VisibleFaceCloseUp => {
                "A close-up of a human face is shown at any time in the video."
            }
            FeatureId::PresenceOfPeople => {
                "People are present at any time in the video."
            }
            FeatureId::PresenceOfPeopleFirst5Secs => {
                "People are present in the first 5 seconds of the video."
            }
            FeatureId::AudioEarlyFirst5Secs => {
                "Speech is heard in the audio within the first 5 seconds of the video."
            }
            FeatureId::OverallPacing => {
                "The pace of the video is at most 2 seconds per shot on average."
            }
            FeatureId::CallToActionSpeech => {
                "A call-to-action phrase is heard or mentioned in the audio or speech at any \
                 time in the video."
            }
            FeatureId::CallToActionText => {
                "A call-to-action phrase is detected in the video supers (overlaid text) at \
                 any time in the video."
            }
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
