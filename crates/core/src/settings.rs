// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job configuration and generation settings
//!
//! Settings are resolved once, when the job is created. Everything downstream
//! reads a fully populated [`GenerationSettings`].

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NUMBER_OF_SCENES: u32 = 5;
/// Scenes are planned up front, so the count is bounded
pub const MAX_NUMBER_OF_SCENES: u32 = 100;

/// Video generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSettings {
    /// Target video length in seconds
    pub video_duration: u32,
    pub number_of_scenes: u32,
    pub aspect_ratio: String,
    pub voiceover_speed: f64,
    pub include_music: bool,
    #[serde(rename = "includeSFX")]
    pub include_sfx: bool,
    pub quality: String,
    pub resolution: String,
    /// Skip the scene review gate
    pub automated_mode: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            video_duration: 60,
            number_of_scenes: DEFAULT_NUMBER_OF_SCENES,
            aspect_ratio: "16:9".to_string(),
            voiceover_speed: 1.0,
            include_music: true,
            include_sfx: false,
            quality: "standard".to_string(),
            resolution: "1080p".to_string(),
            automated_mode: false,
        }
    }
}

/// Caller-supplied settings; anything left `None` takes the default
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOverrides {
    pub video_duration: Option<u32>,
    pub number_of_scenes: Option<u32>,
    pub aspect_ratio: Option<String>,
    pub voiceover_speed: Option<f64>,
    pub include_music: Option<bool>,
    #[serde(rename = "includeSFX")]
    pub include_sfx: Option<bool>,
    pub quality: Option<String>,
    pub resolution: Option<String>,
    pub automated_mode: Option<bool>,
}

impl GenerationSettings {
    /// Fill in defaults and validate
    pub fn resolve(overrides: GenerationOverrides) -> Result<Self, ValidationError> {
        let defaults = Self::default();
        let settings = Self {
            video_duration: overrides.video_duration.unwrap_or(defaults.video_duration),
            number_of_scenes: overrides
                .number_of_scenes
                .unwrap_or(defaults.number_of_scenes),
            aspect_ratio: overrides.aspect_ratio.unwrap_or(defaults.aspect_ratio),
            voiceover_speed: overrides
                .voiceover_speed
                .unwrap_or(defaults.voiceover_speed),
            include_music: overrides.include_music.unwrap_or(defaults.include_music),
            include_sfx: overrides.include_sfx.unwrap_or(defaults.include_sfx),
            quality: overrides.quality.unwrap_or(defaults.quality),
            resolution: overrides.resolution.unwrap_or(defaults.resolution),
            automated_mode: overrides.automated_mode.unwrap_or(defaults.automated_mode),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.number_of_scenes == 0 {
            return Err(ValidationError::InvalidSettings(
                "numberOfScenes must be at least 1".to_string(),
            ));
        }
        if self.number_of_scenes > MAX_NUMBER_OF_SCENES {
            return Err(ValidationError::InvalidSettings(format!(
                "numberOfScenes must be at most {}, got {}",
                MAX_NUMBER_OF_SCENES, self.number_of_scenes
            )));
        }
        if self.video_duration == 0 {
            return Err(ValidationError::InvalidSettings(
                "videoDuration must be at least 1 second".to_string(),
            ));
        }
        if !(self.voiceover_speed.is_finite() && self.voiceover_speed > 0.0) {
            return Err(ValidationError::InvalidSettings(format!(
                "voiceoverSpeed must be positive, got {}",
                self.voiceover_speed
            )));
        }
        Ok(())
    }

    /// Seconds of video allotted to each scene
    pub fn scene_duration(&self) -> u32 {
        (self.video_duration / self.number_of_scenes.max(1)).max(1)
    }
}

/// Model choices for a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelChoices {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

impl Default for ModelChoices {
    fn default() -> Self {
        Self {
            text: "gpt-4o".to_string(),
            image: Some("flux-pro".to_string()),
            video: Some("kling-1.6".to_string()),
            voice: Some("eleven-multilingual-v2".to_string()),
        }
    }
}

/// Opaque job configuration taken from the blueprint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    #[serde(default)]
    pub models: ModelChoices,
    #[serde(default)]
    pub prompt_template: String,
    #[serde(default)]
    pub generation_settings: GenerationSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_without_overrides_gives_defaults() {
        let settings = GenerationSettings::resolve(GenerationOverrides::default()).unwrap();
        assert_eq!(settings, GenerationSettings::default());
        assert_eq!(settings.number_of_scenes, 5);
        assert!(!settings.automated_mode);
    }

    #[test]
    fn resolve_keeps_overrides() {
        let settings = GenerationSettings::resolve(GenerationOverrides {
            number_of_scenes: Some(3),
            automated_mode: Some(true),
            aspect_ratio: Some("9:16".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(settings.number_of_scenes, 3);
        assert!(settings.automated_mode);
        assert_eq!(settings.aspect_ratio, "9:16");
        assert_eq!(settings.resolution, "1080p");
    }

    #[test]
    fn zero_scenes_is_rejected() {
        let err = GenerationSettings::resolve(GenerationOverrides {
            number_of_scenes: Some(0),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidSettings(_)));
    }

    #[test]
    fn scene_count_is_capped() {
        let at_cap = GenerationSettings::resolve(GenerationOverrides {
            number_of_scenes: Some(MAX_NUMBER_OF_SCENES),
            ..Default::default()
        });
        assert_eq!(at_cap.unwrap().number_of_scenes, MAX_NUMBER_OF_SCENES);

        for scenes in [MAX_NUMBER_OF_SCENES + 1, u32::MAX] {
            let err = GenerationSettings::resolve(GenerationOverrides {
                number_of_scenes: Some(scenes),
                ..Default::default()
            })
            .unwrap_err();
            assert!(err.to_string().contains("numberOfScenes must be at most 100"));
        }
    }

    #[test]
    fn non_positive_voiceover_speed_is_rejected() {
        for speed in [0.0, -1.0, f64::NAN] {
            let result = GenerationSettings::resolve(GenerationOverrides {
                voiceover_speed: Some(speed),
                ..Default::default()
            });
            assert!(result.is_err(), "speed {} accepted", speed);
        }
    }

    #[test]
    fn overrides_deserialize_from_partial_json() {
        let overrides: GenerationOverrides =
            serde_json::from_str(r#"{"numberOfScenes": 4, "includeSFX": true}"#).unwrap();
        let settings = GenerationSettings::resolve(overrides).unwrap();
        assert_eq!(settings.number_of_scenes, 4);
        assert!(settings.include_sfx);
        assert_eq!(settings.video_duration, 60);
    }

    #[test]
    fn scene_duration_splits_video() {
        let settings = GenerationSettings {
            video_duration: 60,
            number_of_scenes: 4,
            ..Default::default()
        };
        assert_eq!(settings.scene_duration(), 15);
    }
}
