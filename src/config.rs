//! Externally supplied configuration for the explode engines and the
//! hold-to-place detector, validated once when an assembly initializes.

use bevy::prelude::*;
use thiserror::Error;

use crate::constants::*;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("ghost material is not set")]
    MissingGhostMaterial,
    #[error("label template is not set")]
    MissingLabelTemplate,
    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: f32 },
}

/// Ghost appearance: the translucent material plus an optional outline slot
#[derive(Debug, Clone, PartialEq)]
pub struct GhostStyle<M> {
    pub ghost: M,
    pub outline: Option<M>,
}

impl<M: Clone> GhostStyle<M> {
    /// Appearance sequence a ghosted surface carries: `[ghost]` or `[ghost, outline]`
    pub fn slots(&self) -> Vec<M> {
        let mut slots = vec![self.ghost.clone()];
        if let Some(outline) = &self.outline {
            slots.push(outline.clone());
        }
        slots
    }
}

/// Visual template for the single-part name label
#[derive(Debug, Clone)]
pub struct LabelTemplate {
    /// Font size in texture pixels
    pub font_size: f32,
    pub text_color: Color,
    /// Plate size in meters
    pub plate_size: Vec2,
    pub plate_color: Color,
    /// Resolution of the texture the name is rendered into
    pub texture_size: UVec2,
}

#[derive(Debug, Clone)]
pub struct ExplodeConfig {
    /// Single-part vertical lift
    pub part_lift_distance: f32,
    /// Label offset above the active part's bounds center
    pub label_height: f32,
    /// Full-assembly radial distance
    pub full_explode_distance: f32,
    pub full_explode_duration: f32,
    pub ghost_material: Option<Handle<StandardMaterial>>,
    pub outline_material: Option<Handle<StandardMaterial>>,
    pub label_template: Option<LabelTemplate>,
    /// Entity whose world position is used as the explosion pivot instead of
    /// the bounds center of the whole assembly
    pub pivot_override: Option<Entity>,
    /// Names of direct children that are never registered as explodable
    pub non_explodable_groups: Vec<String>,
}

impl Default for ExplodeConfig {
    fn default() -> Self {
        Self {
            part_lift_distance: PART_LIFT_DISTANCE,
            label_height: LABEL_HEIGHT,
            full_explode_distance: FULL_EXPLODE_DISTANCE,
            full_explode_duration: FULL_EXPLODE_DURATION,
            ghost_material: None,
            outline_material: None,
            label_template: None,
            pivot_override: None,
            non_explodable_groups: NON_EXPLODABLE_GROUPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExplodeConfig {
    /// Checks everything both explode engines need. A failure here disables them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("part_lift_distance", self.part_lift_distance)?;
        non_negative("label_height", self.label_height)?;
        non_negative("full_explode_distance", self.full_explode_distance)?;
        positive("full_explode_duration", self.full_explode_duration)?;
        if self.ghost_material.is_none() {
            return Err(ConfigError::MissingGhostMaterial);
        }
        Ok(())
    }

    pub fn ghost_style(&self) -> Option<GhostStyle<Handle<StandardMaterial>>> {
        self.ghost_material.as_ref().map(|ghost| GhostStyle {
            ghost: ghost.clone(),
            outline: self.outline_material.clone(),
        })
    }

    pub fn label_template(&self) -> Result<&LabelTemplate, ConfigError> {
        self.label_template.as_ref().ok_or(ConfigError::MissingLabelTemplate)
    }

    pub fn is_non_explodable(&self, name: &str) -> bool {
        self.non_explodable_groups.iter().any(|group| group == name)
    }
}

/// Hold-to-place gesture tuning
#[derive(Resource, Debug, Clone, Copy)]
pub struct HoldToPlaceConfig {
    pub hold_threshold: f32,
    pub max_move_distance: f32,
}

impl Default for HoldToPlaceConfig {
    fn default() -> Self {
        Self {
            hold_threshold: HOLD_THRESHOLD_SECS,
            max_move_distance: HOLD_MAX_MOVE_PX,
        }
    }
}

impl HoldToPlaceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("hold_threshold", self.hold_threshold)?;
        positive("max_move_distance", self.max_move_distance)
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ExplodeConfig {
        ExplodeConfig {
            ghost_material: Some(Handle::default()),
            ..default()
        }
    }

    #[test]
    fn defaults_with_ghost_are_valid() {
        assert_eq!(valid_config().validate(), Ok(()));
    }

    #[test]
    fn missing_ghost_is_rejected() {
        assert_eq!(ExplodeConfig::default().validate(), Err(ConfigError::MissingGhostMaterial));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let config = ExplodeConfig { full_explode_duration: 0.0, ..valid_config() };
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "full_explode_duration", value: 0.0 })
        );
    }

    #[test]
    fn negative_distance_is_rejected() {
        let config = ExplodeConfig { full_explode_distance: -1.0, ..valid_config() };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "full_explode_distance", .. })
        ));
    }

    #[test]
    fn nan_lift_is_rejected() {
        let config = ExplodeConfig { part_lift_distance: f32::NAN, ..valid_config() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_label_template_is_reported() {
        assert!(matches!(valid_config().label_template(), Err(ConfigError::MissingLabelTemplate)));
    }

    #[test]
    fn other_bucket_is_non_explodable_by_default() {
        let config = ExplodeConfig::default();
        assert!(config.is_non_explodable("Other"));
        assert!(!config.is_non_explodable("Hood_Hinge"));
    }

    #[test]
    fn ghost_slots_include_outline_when_configured() {
        let style = GhostStyle { ghost: 1u32, outline: Some(2u32) };
        assert_eq!(style.slots(), vec![1, 2]);
        let style = GhostStyle { ghost: 1u32, outline: None };
        assert_eq!(style.slots(), vec![1]);
    }

    #[test]
    fn hold_config_rejects_zero_radius() {
        let config = HoldToPlaceConfig { max_move_distance: 0.0, ..default() };
        assert!(config.validate().is_err());
        assert!(HoldToPlaceConfig::default().validate().is_ok());
    }
}
