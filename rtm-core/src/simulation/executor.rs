use crate::simulation::engine::Engine;
use crate::simulation::sweep::SweepSimulation;
use crate::simulation::SimulationError;
use rayon::prelude::*;
use rtm_dataset::{
    encode_blob, Coordinate, Dataset, Variable, ATTR_BASE_INPUTS, ATTR_ENGINE, ATTR_SIM_END,
    ATTR_SIM_START, ATTR_TITLE, ATTR_UNIT, ATTR_VERSION,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Runs every step of a sweep and collects the outputs into a dataset.
#[derive(Debug, Clone, Default)]
pub struct SweepExecutor {
    /// Worker threads used for the sweep. Defaults to the number of CPUs.
    pub max_workers: Option<usize>,
}

impl SweepExecutor {
    pub fn new(max_workers: Option<usize>) -> Self {
        Self { max_workers }
    }

    /// `progress` receives the number of completed steps. Steps finish out of
    /// order, so the count is advisory only.
    pub fn run(
        &self,
        sweep: &SweepSimulation,
        engine: &dyn Engine,
        progress: &(dyn Fn(u64) + Sync),
    ) -> Result<Dataset, SimulationError> {
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("sim-pool-{i}"));
        if let Some(workers) = self.max_workers {
            builder = builder.num_threads(workers.max(1));
        }
        let pool = builder
            .build()
            .map_err(|err| SimulationError::Pool(err.to_string()))?;

        let steps = sweep.sweep_size();
        log::info!(
            "running {steps} steps with engine '{}' on {} threads",
            engine.name(),
            pool.current_num_threads()
        );
        let sim_start = chrono::Utc::now();
        let completed = AtomicU64::new(0);
        let rows: Vec<Vec<f64>> = pool.install(|| {
            (0..steps)
                .into_par_iter()
                .map(|step| -> Result<Vec<f64>, SimulationError> {
                    let inputs = sweep.inputs_for(step)?;
                    let row = engine
                        .run(&inputs)
                        .map_err(|source| SimulationError::Engine { step, source })?;
                    progress(completed.fetch_add(1, Ordering::Relaxed) + 1);
                    Ok(row)
                })
                .collect::<Result<Vec<_>, _>>()
        })?;
        let sim_end = chrono::Utc::now();

        let mut dataset = Dataset::new();
        for axis in sweep.axes() {
            dataset.add_dim(&axis.path, axis.values.len())?;
            dataset.add_coord(
                Coordinate::index(&axis.path, axis.values.to_coord_values())
                    .with_attr(ATTR_TITLE, &axis.title()),
            )?;
        }

        let dims = sweep.dims();
        for (index, output) in engine.outputs().iter().enumerate() {
            let values = rows
                .iter()
                .map(|row| row.get(index).copied().unwrap_or(f64::NAN))
                .collect();
            let mut variable =
                Variable::new(output.name, &dims, values)?.with_attr(ATTR_TITLE, output.title);
            if !output.unit.is_empty() {
                variable = variable.with_attr(ATTR_UNIT, output.unit);
            }
            dataset.add_var(variable)?;
        }

        let attrs = &mut dataset.attrs;
        attrs.insert(ATTR_VERSION.to_string(), crate::VERSION.to_string());
        attrs.insert(ATTR_SIM_START.to_string(), sim_start.to_rfc3339());
        attrs.insert(ATTR_SIM_END.to_string(), sim_end.to_rfc3339());
        attrs.insert(ATTR_ENGINE.to_string(), engine.name().to_string());
        attrs.insert(ATTR_BASE_INPUTS.to_string(), encode_blob(sweep.base())?);

        log::info!(
            "sweep finished in {} ms",
            (sim_end - sim_start).num_milliseconds()
        );
        Ok(dataset)
    }
}
