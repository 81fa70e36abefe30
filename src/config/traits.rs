use crate::error::TpgError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), TpgError>;
    fn to_manifest(&self) -> ConfigManifest;
}

/// Self-description of a section, for tooling that renders or documents it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigManifest {
    pub section: String,
    pub fields: Vec<FieldManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldManifest {
    pub name: String,
    pub field_type: String,
    pub default: serde_json::Value,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub description: String,
}

impl FieldManifest {
    pub fn probability(name: &str, default: f64, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: "float".to_string(),
            default: serde_json::json!(default),
            min: Some(0.0),
            max: Some(1.0),
            description: description.to_string(),
        }
    }

    pub fn integer(name: &str, default: usize, min: Option<f64>, description: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: "integer".to_string(),
            default: serde_json::json!(default),
            min,
            max: None,
            description: description.to_string(),
        }
    }
}
