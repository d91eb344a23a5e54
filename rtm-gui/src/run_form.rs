use rtm_core::simulation::{
    engine_by_name, Inputs, ParameterInfo, ParameterKind, SimulationError, SweepAxis,
    SweepSimulation, SweepValues, ENGINE_NAMES, PARAMETERS,
};
use rtm_core::SimulationJob;

/// Editable description of one sweep axis.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AxisDraft {
    pub(crate) parameter: &'static ParameterInfo,
    pub(crate) start: f64,
    pub(crate) stop: f64,
    pub(crate) num: usize,
    /// One flag per choice of a text parameter.
    pub(crate) picked: Vec<bool>,
}

impl AxisDraft {
    pub(crate) fn new(parameter: &'static ParameterInfo) -> Self {
        let picked = match parameter.kind {
            ParameterKind::Choice(names) => vec![true; names.len()],
            ParameterKind::Number => Vec::new(),
        };
        let (start, stop) = match parameter.path {
            "wavelength.value" => (0.4, 2.5),
            "geometry.solar_zenith" | "geometry.view_zenith" => (0.0, 60.0),
            _ => (0.0, 1.0),
        };
        Self {
            parameter,
            start,
            stop,
            num: 10,
            picked,
        }
    }

    pub(crate) fn values(&self) -> Result<SweepValues, SimulationError> {
        match self.parameter.kind {
            ParameterKind::Number => SweepValues::linspace(self.start, self.stop, self.num)
                .map_err(|reason| SimulationError::InvalidValue {
                    path: self.parameter.path.to_string(),
                    reason,
                }),
            ParameterKind::Choice(names) => Ok(SweepValues::Text(
                names
                    .iter()
                    .zip(&self.picked)
                    .filter(|(_, picked)| **picked)
                    .map(|(name, _)| name.to_string())
                    .collect(),
            )),
        }
    }
}

/// State of the form-based sweep builder.
#[derive(Debug, Clone)]
pub(crate) struct RunForm {
    pub(crate) base: Inputs,
    pub(crate) axes: Vec<AxisDraft>,
    pub(crate) engine: String,
    /// Zero lets the pool pick.
    pub(crate) max_workers: usize,
}

impl Default for RunForm {
    fn default() -> Self {
        Self {
            base: Inputs::default(),
            axes: vec![AxisDraft::new(&PARAMETERS[0])],
            engine: ENGINE_NAMES[0].to_string(),
            max_workers: 0,
        }
    }
}

impl RunForm {
    /// Parameters not yet swept, in catalog order.
    pub(crate) fn free_parameters(&self) -> impl Iterator<Item = &'static ParameterInfo> + '_ {
        PARAMETERS
            .iter()
            .filter(|p| !self.axes.iter().any(|a| a.parameter.path == p.path))
    }

    pub(crate) fn add_axis(&mut self, parameter: &'static ParameterInfo) {
        self.axes.push(AxisDraft::new(parameter));
    }

    pub(crate) fn remove_axis(&mut self, index: usize) {
        if index < self.axes.len() {
            self.axes.remove(index);
        }
    }

    pub(crate) fn build(&self) -> Result<SimulationJob, SimulationError> {
        let axes = self
            .axes
            .iter()
            .map(|draft| Ok(SweepAxis::new(draft.parameter.path, draft.values()?)))
            .collect::<Result<Vec<_>, SimulationError>>()?;
        let sweep = SweepSimulation::new(axes, self.base.clone())?;
        Ok(SimulationJob {
            sweep,
            engine: engine_by_name(&self.engine)?,
            max_workers: (self.max_workers > 0).then_some(self.max_workers),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_sweeps_wavelength() {
        let job = RunForm::default().build().unwrap();
        assert_eq!(job.sweep.dims(), vec![("wavelength.value", 10)]);
        assert_eq!(job.engine.name(), "synthetic");
        assert_eq!(job.max_workers, None);
    }

    #[test]
    fn choice_axis_uses_picked_names() {
        let mut form = RunForm::default();
        let profile = PARAMETERS
            .iter()
            .find(|p| p.path == "atmosphere.name")
            .unwrap();
        form.add_axis(profile);
        form.axes[1].picked = vec![false, true, true, false];
        form.max_workers = 2;
        let job = form.build().unwrap();
        assert_eq!(
            job.sweep.axes()[1].values,
            SweepValues::Text(vec!["SubarcticWinter".into(), "Tropical".into()])
        );
        assert_eq!(job.max_workers, Some(2));
        assert!(form.free_parameters().all(|p| p.path != "atmosphere.name"));
    }

    #[test]
    fn empty_axis_is_rejected() {
        let mut form = RunForm::default();
        form.axes[0].num = 0;
        assert!(matches!(form.build(), Err(SimulationError::EmptyAxis(_))));
    }

    #[test]
    fn oversized_axis_is_rejected() {
        let mut form = RunForm::default();
        form.axes[0].num = rtm_core::simulation::MAX_SWEEP_STEPS + 1;
        assert!(matches!(
            form.build(),
            Err(SimulationError::InvalidValue { .. })
        ));
    }
}
