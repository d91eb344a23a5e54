use crate::simulation::SimulationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtmosphereProfile {
    MidlatitudeSummer,
    SubarcticWinter,
    Tropical,
    USStandard1962,
}

impl AtmosphereProfile {
    pub const ALL: [AtmosphereProfile; 4] = [
        AtmosphereProfile::MidlatitudeSummer,
        AtmosphereProfile::SubarcticWinter,
        AtmosphereProfile::Tropical,
        AtmosphereProfile::USStandard1962,
    ];

    /// Column water vapour (g/cm²) and ozone (cm-atm) of the profile.
    pub fn columns(self) -> (f64, f64) {
        match self {
            AtmosphereProfile::MidlatitudeSummer => (2.93, 0.319),
            AtmosphereProfile::SubarcticWinter => (0.42, 0.48),
            AtmosphereProfile::Tropical => (4.12, 0.247),
            AtmosphereProfile::USStandard1962 => (1.42, 0.344),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AtmosphereProfile::MidlatitudeSummer => "MidlatitudeSummer",
            AtmosphereProfile::SubarcticWinter => "SubarcticWinter",
            AtmosphereProfile::Tropical => "Tropical",
            AtmosphereProfile::USStandard1962 => "USStandard1962",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AerosolProfile {
    NoAerosols,
    Maritime,
    Continental,
    Urban,
    Desert,
}

impl AerosolProfile {
    pub const ALL: [AerosolProfile; 5] = [
        AerosolProfile::NoAerosols,
        AerosolProfile::Maritime,
        AerosolProfile::Continental,
        AerosolProfile::Urban,
        AerosolProfile::Desert,
    ];

    /// Ångström exponent, `None` for an aerosol-free atmosphere.
    pub fn angstrom_exponent(self) -> Option<f64> {
        match self {
            AerosolProfile::NoAerosols => None,
            AerosolProfile::Maritime => Some(0.5),
            AerosolProfile::Continental => Some(1.3),
            AerosolProfile::Urban => Some(1.0),
            AerosolProfile::Desert => Some(0.2),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            AerosolProfile::NoAerosols => "NoAerosols",
            AerosolProfile::Maritime => "Maritime",
            AerosolProfile::Continental => "Continental",
            AerosolProfile::Urban => "Urban",
            AerosolProfile::Desert => "Desert",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wavelength {
    /// Micrometers.
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    pub name: AtmosphereProfile,
    /// Overrides the profile's water column when set.
    pub water: Option<f64>,
    /// Overrides the profile's ozone column when set.
    pub ozone: Option<f64>,
}

impl Atmosphere {
    pub fn water_column(&self) -> f64 {
        self.water.unwrap_or_else(|| self.name.columns().0)
    }

    pub fn ozone_column(&self) -> f64 {
        self.ozone.unwrap_or_else(|| self.name.columns().1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aerosol {
    pub name: AerosolProfile,
    /// Aerosol optical thickness at 550 nm.
    pub aot: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Degrees.
    pub solar_zenith: f64,
    /// Degrees.
    pub view_zenith: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ground {
    pub reflectance: f64,
}

/// Full set of model inputs for one simulation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inputs {
    pub wavelength: Wavelength,
    pub atmosphere: Atmosphere,
    pub aerosol_profile: Aerosol,
    pub geometry: Geometry,
    pub ground: Ground,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            wavelength: Wavelength { value: 0.55 },
            atmosphere: Atmosphere {
                name: AtmosphereProfile::MidlatitudeSummer,
                water: None,
                ozone: None,
            },
            aerosol_profile: Aerosol {
                name: AerosolProfile::Maritime,
                aot: 0.1,
            },
            geometry: Geometry {
                solar_zenith: 30.0,
                view_zenith: 0.0,
            },
            ground: Ground { reflectance: 0.1 },
        }
    }
}

impl Inputs {
    /// Returns a copy with the dotted parameter `path` set to `value`.
    pub fn replace(&self, path: &str, value: Value) -> Result<Inputs, SimulationError> {
        let mut tree = serde_json::to_value(self).map_err(|err| invalid(path, err))?;
        let pointer = format!("/{}", path.replace('.', "/"));
        let slot = tree
            .pointer_mut(&pointer)
            .ok_or_else(|| SimulationError::UnknownParameter(path.to_string()))?;
        if slot.is_object() {
            return Err(SimulationError::UnknownParameter(path.to_string()));
        }
        *slot = value;
        serde_json::from_value(tree).map_err(|err| invalid(path, err))
    }

    /// Applies every leaf of `overrides` (a nested object) on top of `self`.
    pub fn merge(&self, overrides: &Value) -> Result<Inputs, SimulationError> {
        let mut leaves = Vec::new();
        collect_leaves(String::new(), overrides, &mut leaves);
        let mut merged = self.clone();
        for (path, value) in leaves {
            merged = merged.replace(&path, value)?;
        }
        Ok(merged)
    }
}

fn invalid(path: &str, err: impl std::fmt::Display) -> SimulationError {
    SimulationError::InvalidValue {
        path: path.to_string(),
        reason: err.to_string(),
    }
}

fn collect_leaves(prefix: String, value: &Value, out: &mut Vec<(String, Value)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                collect_leaves(path, child, out);
            }
        }
        leaf => out.push((prefix, leaf.clone())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Number,
    Choice(&'static [&'static str]),
}

/// Display metadata of one sweepable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterInfo {
    pub path: &'static str,
    pub title: &'static str,
    pub unit: &'static str,
    pub kind: ParameterKind,
}

impl ParameterInfo {
    pub fn coordinate_title(&self) -> String {
        if self.unit.is_empty() {
            self.title.to_string()
        } else {
            format!("{} ({})", self.title, self.unit)
        }
    }
}

const ATMOSPHERE_NAMES: &[&str] = &[
    "MidlatitudeSummer",
    "SubarcticWinter",
    "Tropical",
    "USStandard1962",
];

const AEROSOL_NAMES: &[&str] = &["NoAerosols", "Maritime", "Continental", "Urban", "Desert"];

pub const PARAMETERS: &[ParameterInfo] = &[
    ParameterInfo {
        path: "wavelength.value",
        title: "Wavelength",
        unit: "µm",
        kind: ParameterKind::Number,
    },
    ParameterInfo {
        path: "atmosphere.name",
        title: "Atmosphere profile",
        unit: "",
        kind: ParameterKind::Choice(ATMOSPHERE_NAMES),
    },
    ParameterInfo {
        path: "atmosphere.water",
        title: "Water column",
        unit: "g/cm²",
        kind: ParameterKind::Number,
    },
    ParameterInfo {
        path: "atmosphere.ozone",
        title: "Ozone column",
        unit: "cm-atm",
        kind: ParameterKind::Number,
    },
    ParameterInfo {
        path: "aerosol_profile.name",
        title: "Aerosol profile",
        unit: "",
        kind: ParameterKind::Choice(AEROSOL_NAMES),
    },
    ParameterInfo {
        path: "aerosol_profile.aot",
        title: "Aerosol optical thickness",
        unit: "",
        kind: ParameterKind::Number,
    },
    ParameterInfo {
        path: "geometry.solar_zenith",
        title: "Solar zenith angle",
        unit: "deg",
        kind: ParameterKind::Number,
    },
    ParameterInfo {
        path: "geometry.view_zenith",
        title: "View zenith angle",
        unit: "deg",
        kind: ParameterKind::Number,
    },
    ParameterInfo {
        path: "ground.reflectance",
        title: "Ground reflectance",
        unit: "",
        kind: ParameterKind::Number,
    },
];

pub fn parameter_info(path: &str) -> Option<&'static ParameterInfo> {
    PARAMETERS.iter().find(|p| p.path == path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replace_sets_one_leaf() {
        let inputs = Inputs::default()
            .replace("atmosphere.ozone", json!(0.4))
            .unwrap();
        assert_eq!(inputs.atmosphere.ozone_column(), 0.4);
        assert_eq!(inputs.atmosphere.water_column(), 2.93);
    }

    #[test]
    fn replace_rejects_unknown_path_and_bad_type() {
        let inputs = Inputs::default();
        assert!(matches!(
            inputs.replace("ground.albedo", json!(0.1)),
            Err(SimulationError::UnknownParameter(_))
        ));
        assert!(matches!(
            inputs.replace("geometry", json!(0.1)),
            Err(SimulationError::UnknownParameter(_))
        ));
        assert!(matches!(
            inputs.replace("atmosphere.name", json!("Venus")),
            Err(SimulationError::InvalidValue { .. })
        ));
    }

    #[test]
    fn merge_applies_nested_overrides() {
        let merged = Inputs::default()
            .merge(&json!({"atmosphere": {"name": "Tropical"}, "ground": {"reflectance": 0.3}}))
            .unwrap();
        assert_eq!(merged.atmosphere.name, AtmosphereProfile::Tropical);
        assert_eq!(merged.ground.reflectance, 0.3);
    }

    #[test]
    fn catalog_titles_carry_units() {
        let info = parameter_info("wavelength.value").unwrap();
        assert_eq!(info.coordinate_title(), "Wavelength (µm)");
        assert_eq!(
            parameter_info("atmosphere.name").unwrap().coordinate_title(),
            "Atmosphere profile"
        );
    }
}
