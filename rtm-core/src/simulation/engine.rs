use crate::simulation::inputs::Inputs;
use crate::simulation::SimulationError;
use std::sync::Arc;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{parameter} out of range: {value}")]
    OutOfRange { parameter: &'static str, value: f64 },
}

/// Description of one engine output, stored as a dataset variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    pub name: &'static str,
    pub title: &'static str,
    pub unit: &'static str,
}

/// Radiative transfer model evaluated once per sweep step.
pub trait Engine: Send + Sync {
    fn name(&self) -> &str;

    fn outputs(&self) -> &[OutputSpec];

    /// One value per entry of [`Engine::outputs`], in the same order.
    fn run(&self, inputs: &Inputs) -> Result<Vec<f64>, EngineError>;
}

pub const ENGINE_NAMES: &[&str] = &["synthetic"];

pub fn engine_by_name(name: &str) -> Result<Arc<dyn Engine>, SimulationError> {
    match name.trim().to_ascii_lowercase().as_str() {
        "synthetic" => Ok(Arc::new(SyntheticEngine)),
        _ => Err(SimulationError::UnknownEngine(name.to_string())),
    }
}

const SYNTHETIC_OUTPUTS: &[OutputSpec] = &[
    OutputSpec {
        name: "optical_depth",
        title: "Total optical depth",
        unit: "",
    },
    OutputSpec {
        name: "transmittance",
        title: "Direct transmittance",
        unit: "",
    },
    OutputSpec {
        name: "direct_irradiance",
        title: "Direct solar irradiance",
        unit: "W/m²/µm",
    },
    OutputSpec {
        name: "apparent_reflectance",
        title: "Apparent reflectance",
        unit: "",
    },
];

const SUN_TEMPERATURE_K: f64 = 5778.0;
const SUN_RADIUS_M: f64 = 6.957e8;
const AU_M: f64 = 1.496e11;
const PLANCK_H: f64 = 6.626_070_15e-34;
const LIGHT_C: f64 = 2.997_924_58e8;
const BOLTZMANN_K: f64 = 1.380_649e-23;

/// Water vapour bands as (center µm, width µm, strength per g/cm²).
const WATER_BANDS: [(f64, f64, f64); 4] = [
    (0.94, 0.02, 0.05),
    (1.13, 0.02, 0.08),
    (1.38, 0.03, 0.6),
    (1.87, 0.04, 0.8),
];

/// Deterministic analytic clear-sky model.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticEngine;

impl SyntheticEngine {
    fn rayleigh(lambda: f64) -> f64 {
        let l2 = lambda.powi(-2);
        0.008569 * lambda.powi(-4) * (1.0 + 0.0113 * l2 + 0.00013 * l2 * l2)
    }

    fn ozone(lambda: f64, column: f64) -> f64 {
        let chappuis = 0.12 * gaussian(lambda, 0.6, 0.06);
        let hartley = 130.0 * gaussian(lambda, 0.255, 0.03);
        column * (chappuis + hartley)
    }

    fn water(lambda: f64, column: f64) -> f64 {
        column
            * WATER_BANDS
                .iter()
                .map(|(center, width, strength)| strength * gaussian(lambda, *center, *width))
                .sum::<f64>()
    }

    fn solar_irradiance(lambda: f64) -> f64 {
        let lambda_m = lambda * 1e-6;
        let radiance = 2.0 * PLANCK_H * LIGHT_C * LIGHT_C
            / (lambda_m.powi(5)
                * ((PLANCK_H * LIGHT_C / (lambda_m * BOLTZMANN_K * SUN_TEMPERATURE_K)).exp()
                    - 1.0));
        std::f64::consts::PI * radiance * (SUN_RADIUS_M / AU_M).powi(2) * 1e-6
    }
}

fn gaussian(x: f64, center: f64, width: f64) -> f64 {
    (-((x - center) / width).powi(2)).exp()
}

fn cos_zenith(parameter: &'static str, degrees: f64) -> Result<f64, EngineError> {
    if !(0.0..90.0).contains(&degrees) {
        return Err(EngineError::OutOfRange {
            parameter,
            value: degrees,
        });
    }
    Ok(degrees.to_radians().cos())
}

impl Engine for SyntheticEngine {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn outputs(&self) -> &[OutputSpec] {
        SYNTHETIC_OUTPUTS
    }

    fn run(&self, inputs: &Inputs) -> Result<Vec<f64>, EngineError> {
        let lambda = inputs.wavelength.value;
        if !(lambda > 0.0 && lambda.is_finite()) {
            return Err(EngineError::OutOfRange {
                parameter: "wavelength",
                value: lambda,
            });
        }
        let mu_s = cos_zenith("solar zenith", inputs.geometry.solar_zenith)?;
        let mu_v = cos_zenith("view zenith", inputs.geometry.view_zenith)?;
        let rho_g = inputs.ground.reflectance;
        if !(0.0..=1.0).contains(&rho_g) {
            return Err(EngineError::OutOfRange {
                parameter: "ground reflectance",
                value: rho_g,
            });
        }

        let tau_r = Self::rayleigh(lambda);
        let tau_a = inputs
            .aerosol_profile
            .name
            .angstrom_exponent()
            .map(|alpha| inputs.aerosol_profile.aot * (lambda / 0.55).powf(-alpha))
            .unwrap_or(0.0);
        let tau_gas = Self::ozone(lambda, inputs.atmosphere.ozone_column())
            + Self::water(lambda, inputs.atmosphere.water_column());
        let tau = tau_r + tau_a + tau_gas;

        let t_down = (-tau / mu_s).exp();
        let t_up = (-tau / mu_v).exp();
        let irradiance = Self::solar_irradiance(lambda) * mu_s * t_down;
        let path = 0.75 * (tau_r + 0.8 * tau_a) / (4.0 * mu_s * mu_v);
        let spherical_albedo = tau_r / (2.0 + tau_r);
        let reflectance = path + rho_g * t_down * t_up / (1.0 - spherical_albedo * rho_g);

        Ok(vec![tau, t_down, irradiance, reflectance])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blue_is_more_opaque_than_red() {
        let engine = SyntheticEngine;
        let mut inputs = Inputs::default();
        inputs.wavelength.value = 0.45;
        let blue = engine.run(&inputs).unwrap();
        inputs.wavelength.value = 0.8;
        let red = engine.run(&inputs).unwrap();
        assert!(blue[0] > red[0]);
        assert!(blue[1] < red[1]);
        assert_eq!(blue.len(), engine.outputs().len());
    }

    #[test]
    fn irradiance_peaks_in_visible() {
        let visible = SyntheticEngine::solar_irradiance(0.5);
        assert!(visible > 1500.0 && visible < 2500.0);
        assert!(SyntheticEngine::solar_irradiance(2.0) < visible);
    }

    #[test]
    fn rejects_horizon_sun() {
        let mut inputs = Inputs::default();
        inputs.geometry.solar_zenith = 90.0;
        assert!(SyntheticEngine.run(&inputs).is_err());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(engine_by_name("Synthetic").unwrap().name(), "synthetic");
        assert!(engine_by_name("6s").is_err());
    }
}
