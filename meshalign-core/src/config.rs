//! Per-vehicle alignment parameters, read from a YAML file
//!
//! ```yaml
//! VEHICLE_1:
//!   subfolder: sedan
//!   name: sedan_body
//!   scale: true
//!   scale_factor: 0.01
//!   rotate_angle: [90.0, 0.0, 0.0]
//! ```

use serde::Deserialize;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::transform::Rotation;

/// One vehicle entry in the config file
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleEntry {
    pub subfolder: String,
    /// File stem of the mesh, without suffix
    pub name: String,
    #[serde(default)]
    pub scale: bool,
    #[serde(default)]
    pub scale_factor: Option<f64>,
    /// A number, a list of three numbers, or absent
    #[serde(default)]
    pub rotate_angle: Option<Value>,
}

/// How an entry's `rotate_angle` should be handled
#[derive(Debug, Clone, PartialEq)]
pub enum RotationSetting {
    /// Absent, null, zero or an empty list
    Skip,
    Apply(Rotation),
    /// Neither a number nor three numbers; holds a description of the value
    Malformed(String),
}

impl VehicleEntry {
    /// Scale factor to apply, or `None` when scaling is disabled
    pub fn scale_factor(&self, entry_name: &str) -> Result<Option<f64>> {
        if !self.scale {
            return Ok(None);
        }

        let invalid = |reason: &str| Error::InvalidScale {
            name: entry_name.to_string(),
            reason: reason.to_string(),
        };

        match self.scale_factor {
            None => Err(invalid("scale is enabled but scale_factor is missing")),
            Some(factor) if !factor.is_finite() => Err(invalid("scale_factor is not finite")),
            Some(factor) if factor == 0.0 => Err(invalid("scale_factor is zero")),
            Some(factor) => Ok(Some(factor)),
        }
    }

    pub fn rotation(&self) -> RotationSetting {
        let Some(value) = &self.rotate_angle else {
            return RotationSetting::Skip;
        };

        match value {
            Value::Null => RotationSetting::Skip,
            Value::Number(number) => match number.as_f64() {
                Some(degrees) if degrees == 0.0 => RotationSetting::Skip,
                Some(degrees) => RotationSetting::Apply(Rotation::Single(degrees)),
                None => RotationSetting::Malformed(format!("{number:?}")),
            },
            Value::Sequence(items) if items.is_empty() => RotationSetting::Skip,
            Value::Sequence(items) => {
                let angles: Option<Vec<f64>> = items.iter().map(Value::as_f64).collect();
                match angles.as_deref() {
                    Some(&[x, y, z]) => RotationSetting::Apply(Rotation::Sequence([x, y, z])),
                    _ => RotationSetting::Malformed(format!("{items:?}")),
                }
            }
            other => RotationSetting::Malformed(format!("{other:?}")),
        }
    }

    /// `<root>/<subfolder>/<name><suffix>`
    pub fn mesh_path(&self, root: &Path, suffix: &str) -> PathBuf {
        root.join(&self.subfolder)
            .join(format!("{}{}", self.name, normalize_suffix(suffix)))
    }

    /// `<root>/<subfolder>/<name>_aligned<suffix>`
    pub fn aligned_path(&self, root: &Path, suffix: &str) -> PathBuf {
        root.join(&self.subfolder)
            .join(format!("{}_aligned{}", self.name, normalize_suffix(suffix)))
    }
}

fn normalize_suffix(suffix: &str) -> String {
    if suffix.is_empty() || suffix.starts_with('.') {
        suffix.to_string()
    } else {
        format!(".{suffix}")
    }
}

/// All vehicle entries, keyed by entry name
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AlignConfig {
    pub vehicles: BTreeMap<String, VehicleEntry>,
}

impl AlignConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::from_io(e, path))?;
        Self::from_yaml(&text)
    }

    pub fn vehicle(&self, name: &str) -> Result<&VehicleEntry> {
        self.vehicles
            .get(name)
            .ok_or_else(|| Error::VehicleNotFound {
                name: name.to_string(),
            })
    }
}
