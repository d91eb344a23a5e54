use crate::simulation::inputs::{parameter_info, Inputs};
use crate::simulation::SimulationError;
use rtm_dataset::CoordValues;
use serde_json::Value;

/// Largest number of steps a sweep, or a single range, may hold.
pub const MAX_SWEEP_STEPS: usize = 1_000_000;

fn too_many_values() -> String {
    format!("range holds more than {MAX_SWEEP_STEPS} values")
}

#[derive(Debug, Clone, PartialEq)]
pub enum SweepValues {
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl SweepValues {
    pub fn len(&self) -> usize {
        match self {
            SweepValues::Float(values) => values.len(),
            SweepValues::Text(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn value(&self, index: usize) -> Value {
        match self {
            SweepValues::Float(values) => Value::from(values[index]),
            SweepValues::Text(values) => Value::from(values[index].clone()),
        }
    }

    pub fn to_coord_values(&self) -> CoordValues {
        match self {
            SweepValues::Float(values) => CoordValues::Float64(values.clone()),
            SweepValues::Text(values) => CoordValues::Str(values.clone()),
        }
    }

    /// Half-open range `[start, stop)` with the given step.
    pub fn arange(start: f64, stop: f64, step: f64) -> Result<SweepValues, String> {
        if step == 0.0 || !step.is_finite() {
            return Err("step must be a non-zero number".to_string());
        }
        let count = ((stop - start) / step).ceil();
        if count.is_nan() || count <= 0.0 {
            return Ok(SweepValues::Float(Vec::new()));
        }
        if count > MAX_SWEEP_STEPS as f64 {
            return Err(too_many_values());
        }
        Ok(SweepValues::Float(
            (0..count as usize)
                .map(|i| start + i as f64 * step)
                .collect(),
        ))
    }

    /// `num` evenly spaced values over `[start, stop]`.
    pub fn linspace(start: f64, stop: f64, num: usize) -> Result<SweepValues, String> {
        if num > MAX_SWEEP_STEPS {
            return Err(too_many_values());
        }
        let values = match num {
            0 => Vec::new(),
            1 => vec![start],
            _ => {
                let step = (stop - start) / (num - 1) as f64;
                (0..num).map(|i| start + i as f64 * step).collect()
            }
        };
        Ok(SweepValues::Float(values))
    }
}

/// One swept parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepAxis {
    pub path: String,
    pub values: SweepValues,
}

impl SweepAxis {
    pub fn new(path: impl Into<String>, values: SweepValues) -> Self {
        Self {
            path: path.into(),
            values,
        }
    }

    /// Display title of the dimension, with unit when the parameter has one.
    pub fn title(&self) -> String {
        parameter_info(&self.path)
            .map(|info| info.coordinate_title())
            .unwrap_or_else(|| self.path.clone())
    }
}

/// A full-factorial sweep over the given axes on top of the base inputs.
#[derive(Debug, Clone)]
pub struct SweepSimulation {
    axes: Vec<SweepAxis>,
    base: Inputs,
}

impl SweepSimulation {
    pub fn new(axes: Vec<SweepAxis>, base: Inputs) -> Result<Self, SimulationError> {
        let steps = axes
            .iter()
            .try_fold(1usize, |acc, axis| acc.checked_mul(axis.values.len()));
        if steps.map_or(true, |steps| steps > MAX_SWEEP_STEPS) {
            return Err(SimulationError::TooManySteps {
                max: MAX_SWEEP_STEPS,
            });
        }
        for (i, axis) in axes.iter().enumerate() {
            if axis.values.is_empty() {
                return Err(SimulationError::EmptyAxis(axis.path.clone()));
            }
            if axes[..i].iter().any(|other| other.path == axis.path) {
                return Err(SimulationError::DuplicateAxis(axis.path.clone()));
            }
            for index in 0..axis.values.len() {
                base.replace(&axis.path, axis.values.value(index))?;
            }
        }
        Ok(Self { axes, base })
    }

    pub fn axes(&self) -> &[SweepAxis] {
        &self.axes
    }

    pub fn base(&self) -> &Inputs {
        &self.base
    }

    pub fn sweep_size(&self) -> usize {
        self.axes.iter().map(|axis| axis.values.len()).product()
    }

    /// `(dimension, size)` pairs in axis order.
    pub fn dims(&self) -> Vec<(&str, usize)> {
        self.axes
            .iter()
            .map(|axis| (axis.path.as_str(), axis.values.len()))
            .collect()
    }

    /// Per-axis indices of `step`, the last axis varying fastest.
    pub fn step_indices(&self, step: usize) -> Vec<usize> {
        let mut remainder = step;
        let mut indices = vec![0; self.axes.len()];
        for (slot, axis) in indices.iter_mut().zip(&self.axes).rev() {
            let len = axis.values.len();
            *slot = remainder % len;
            remainder /= len;
        }
        indices
    }

    pub fn inputs_for(&self, step: usize) -> Result<Inputs, SimulationError> {
        let mut inputs = self.base.clone();
        for (axis, index) in self.axes.iter().zip(self.step_indices(step)) {
            inputs = inputs.replace(&axis.path, axis.values.value(index))?;
        }
        Ok(inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_axis() -> SweepSimulation {
        SweepSimulation::new(
            vec![
                SweepAxis::new("wavelength.value", SweepValues::Float(vec![0.4, 0.5, 0.6])),
                SweepAxis::new(
                    "atmosphere.name",
                    SweepValues::Text(vec!["Tropical".into(), "SubarcticWinter".into()]),
                ),
            ],
            Inputs::default(),
        )
        .unwrap()
    }

    #[test]
    fn steps_unravel_row_major() {
        let sweep = two_axis();
        assert_eq!(sweep.sweep_size(), 6);
        assert_eq!(sweep.step_indices(0), vec![0, 0]);
        assert_eq!(sweep.step_indices(1), vec![0, 1]);
        assert_eq!(sweep.step_indices(2), vec![1, 0]);
        assert_eq!(sweep.step_indices(5), vec![2, 1]);
        let inputs = sweep.inputs_for(3).unwrap();
        assert_eq!(inputs.wavelength.value, 0.5);
        assert_eq!(inputs.atmosphere.name.name(), "SubarcticWinter");
    }

    #[test]
    fn rejects_empty_duplicate_and_mistyped_axes() {
        let empty = SweepAxis::new("ground.reflectance", SweepValues::Float(Vec::new()));
        assert!(matches!(
            SweepSimulation::new(vec![empty], Inputs::default()),
            Err(SimulationError::EmptyAxis(_))
        ));
        let axis = SweepAxis::new("ground.reflectance", SweepValues::Float(vec![0.1]));
        assert!(matches!(
            SweepSimulation::new(vec![axis.clone(), axis], Inputs::default()),
            Err(SimulationError::DuplicateAxis(_))
        ));
        let text = SweepAxis::new("ground.reflectance", SweepValues::Text(vec!["a".into()]));
        assert!(SweepSimulation::new(vec![text], Inputs::default()).is_err());
    }

    #[test]
    fn ranges() {
        assert_eq!(SweepValues::arange(0.0, 1.0, 0.25).unwrap().len(), 4);
        assert_eq!(SweepValues::arange(1.0, 0.0, 0.25).unwrap().len(), 0);
        assert!(SweepValues::arange(0.0, 1.0, 0.0).is_err());
        assert_eq!(
            SweepValues::linspace(0.0, 1.0, 3).unwrap(),
            SweepValues::Float(vec![0.0, 0.5, 1.0])
        );
    }

    #[test]
    fn oversized_ranges_are_rejected() {
        assert!(SweepValues::arange(0.0, 1e17, 1.0).is_err());
        assert!(SweepValues::arange(0.0, f64::INFINITY, 1.0).is_err());
        assert!(SweepValues::linspace(0.0, 1.0, MAX_SWEEP_STEPS + 1).is_err());
        assert_eq!(
            SweepValues::arange(0.0, MAX_SWEEP_STEPS as f64, 1.0)
                .unwrap()
                .len(),
            MAX_SWEEP_STEPS
        );
    }

    #[test]
    fn sweep_size_is_capped() {
        let axis = |path: &str| {
            SweepAxis::new(path, SweepValues::linspace(0.0, 0.5, 1_001).unwrap())
        };
        let result = SweepSimulation::new(
            vec![axis("ground.reflectance"), axis("aerosol_profile.aot")],
            Inputs::default(),
        );
        assert!(matches!(
            result,
            Err(SimulationError::TooManySteps { max: MAX_SWEEP_STEPS })
        ));
    }
}
