mod examples;
pub mod highlight;

pub use examples::{DEFAULT_SCRIPT, EXAMPLE_SCRIPTS};
pub use highlight::{highlight, HighlightSpan, TokenKind};

use crate::simulation::{
    engine_by_name, Engine, Inputs, SimulationError, SweepAxis, SweepSimulation, SweepValues,
};
use std::sync::Arc;
use toml::{Table, Value};

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("<user script>:{line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("Missing assignment to required identifier '{0}'")]
    MissingBinding(&'static str),
    #[error("{0}")]
    BadScript(String),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

impl ScriptError {
    pub fn title(&self) -> &'static str {
        match self {
            ScriptError::Syntax { .. } => "Script syntax error",
            ScriptError::MissingBinding(_) => "Missing required assignment",
            ScriptError::BadScript(_) | ScriptError::Simulation(_) => "Bad script",
        }
    }
}

/// Everything needed to run the sweep a script describes.
pub struct ScriptJob {
    pub sweep: SweepSimulation,
    pub engine: Arc<dyn Engine>,
    pub max_workers: Option<usize>,
}

impl std::fmt::Debug for ScriptJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptJob")
            .field("sweep", &self.sweep)
            .field("engine", &self.engine.name())
            .field("max_workers", &self.max_workers)
            .finish()
    }
}

fn parse(text: &str) -> Result<Table, ScriptError> {
    text.parse::<Table>().map_err(|err| {
        let offset = err.span().map(|span| span.start).unwrap_or(0);
        let (line, column) = line_column(text, offset);
        ScriptError::Syntax {
            line,
            column,
            message: err.message().to_string(),
        }
    })
}

/// 1-based line and column of a byte offset.
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(text.len());
    let before = &text[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = text[line_start..offset].chars().count() + 1;
    (line, column)
}

/// Parses the script and checks that the required bindings are present.
pub fn check_script(text: &str) -> Result<(), ScriptError> {
    let table = parse(text)?;
    binding(&table, "sweep")?;
    binding(&table, "engine")?;
    Ok(())
}

fn binding<'a>(table: &'a Table, name: &'static str) -> Result<&'a Value, ScriptError> {
    table.get(name).ok_or(ScriptError::MissingBinding(name))
}

pub fn interpret_script(text: &str) -> Result<ScriptJob, ScriptError> {
    let table = parse(text)?;
    let sweep_value = binding(&table, "sweep")?;
    let engine_value = binding(&table, "engine")?;

    let (engine_name, max_workers) = match engine_value {
        Value::String(name) => (name.clone(), None),
        Value::Table(engine) => {
            let name = engine
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| bad("engine must have a string 'name'"))?;
            let max_workers = match engine.get("max_workers") {
                None => None,
                Some(Value::Integer(n)) if *n > 0 => Some(*n as usize),
                Some(_) => return Err(bad("engine.max_workers must be a positive integer")),
            };
            (name.to_string(), max_workers)
        }
        _ => return Err(bad("engine must be a string or a table")),
    };
    let engine = engine_by_name(&engine_name)?;

    let base = match table.get("base") {
        None => Inputs::default(),
        Some(Value::Table(overrides)) => {
            let overrides = serde_json::to_value(overrides)
                .map_err(|err| bad(&format!("base: {err}")))?;
            Inputs::default().merge(&overrides)?
        }
        Some(_) => return Err(bad("base must be a table")),
    };

    let Value::Table(sweep_table) = sweep_value else {
        return Err(bad("sweep must be a table"));
    };
    let mut axes = Vec::new();
    collect_axes("", sweep_table, &mut axes)?;
    let sweep = SweepSimulation::new(axes, base)?;
    log::debug!(
        "interpreted script: {} steps, engine '{}'",
        sweep.sweep_size(),
        engine.name()
    );

    Ok(ScriptJob {
        sweep,
        engine,
        max_workers,
    })
}

/// Re-emits the script as canonical TOML.
pub fn format_script(text: &str) -> Result<String, ScriptError> {
    let table = parse(text)?;
    toml::to_string_pretty(&table).map_err(|err| bad(&err.to_string()))
}

fn bad(message: &str) -> ScriptError {
    ScriptError::BadScript(message.to_string())
}

fn is_range_spec(table: &Table) -> bool {
    table.contains_key("start") || table.contains_key("stop")
}

/// Walks the sweep table; dotted keys written unquoted arrive as nested
/// tables and are joined back into parameter paths.
fn collect_axes(
    prefix: &str,
    table: &Table,
    axes: &mut Vec<SweepAxis>,
) -> Result<(), ScriptError> {
    for (key, value) in table {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Table(spec) if is_range_spec(spec) => {
                axes.push(SweepAxis::new(path.clone(), range_values(&path, spec)?));
            }
            Value::Table(nested) => collect_axes(&path, nested, axes)?,
            Value::Array(items) => {
                axes.push(SweepAxis::new(path.clone(), array_values(&path, items)?));
            }
            _ => {
                return Err(bad(&format!(
                    "sweep value for '{path}' must be an array or a range table"
                )))
            }
        }
    }
    Ok(())
}

fn number(path: &str, spec: &Table, key: &str) -> Result<f64, ScriptError> {
    match spec.get(key) {
        Some(Value::Float(v)) => Ok(*v),
        Some(Value::Integer(v)) => Ok(*v as f64),
        _ => Err(bad(&format!("range for '{path}' needs a numeric '{key}'"))),
    }
}

fn range_values(path: &str, spec: &Table) -> Result<SweepValues, ScriptError> {
    let start = number(path, spec, "start")?;
    let stop = number(path, spec, "stop")?;
    match (spec.get("step"), spec.get("num")) {
        (Some(_), None) => {
            let step = number(path, spec, "step")?;
            SweepValues::arange(start, stop, step).map_err(|err| bad(&format!("{path}: {err}")))
        }
        (None, Some(Value::Integer(num))) if *num >= 0 => {
            let num = usize::try_from(*num).unwrap_or(usize::MAX);
            SweepValues::linspace(start, stop, num).map_err(|err| bad(&format!("{path}: {err}")))
        }
        _ => Err(bad(&format!(
            "range for '{path}' needs exactly one of 'step' or a non-negative integer 'num'"
        ))),
    }
}

fn array_values(path: &str, items: &[Value]) -> Result<SweepValues, ScriptError> {
    if items.iter().all(|item| matches!(item, Value::String(_))) {
        return Ok(SweepValues::Text(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ));
    }
    items
        .iter()
        .map(|item| match item {
            Value::Float(v) => Ok(*v),
            Value::Integer(v) => Ok(*v as f64),
            _ => Err(bad(&format!(
                "values for '{path}' must be all numbers or all strings"
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(SweepValues::Float)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_reports_position() {
        let err = check_script("[sweep]\n\"a\" = [1, 2\nengine = 3\n").unwrap_err();
        match err {
            ScriptError::Syntax { line, .. } => assert!(line >= 2),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn line_column_is_one_based() {
        assert_eq!(line_column("ab\ncd", 0), (1, 1));
        assert_eq!(line_column("ab\ncd", 4), (2, 2));
    }

    #[test]
    fn missing_binding_names_identifier() {
        let err = check_script("[engine]\nname = \"synthetic\"\n").unwrap_err();
        assert!(matches!(err, ScriptError::MissingBinding("sweep")));
        assert_eq!(err.title(), "Missing required assignment");
    }

    #[test]
    fn unquoted_dotted_keys_become_paths() {
        let job = interpret_script(
            "engine = \"synthetic\"\n[sweep]\nwavelength.value = { start = 0.4, stop = 0.6, num = 3 }\nground.reflectance = [0.1, 0.2]\n",
        )
        .unwrap();
        let dims = job.sweep.dims();
        assert_eq!(dims, vec![("wavelength.value", 3), ("ground.reflectance", 2)]);
    }

    #[test]
    fn huge_ranges_are_bad_scripts() {
        let ranges = [
            "{ start = 0.0, stop = 1e17, step = 1.0 }",
            "{ start = 0, stop = 1, num = 9000000000000 }",
        ];
        for range in ranges {
            let text =
                format!("engine = \"synthetic\"\n[sweep]\n\"ground.reflectance\" = {range}\n");
            let err = interpret_script(&text).unwrap_err();
            assert_eq!(err.title(), "Bad script");
        }
    }

    #[test]
    fn mixed_arrays_are_rejected() {
        let err =
            interpret_script("engine = \"synthetic\"\n[sweep]\n\"ground.reflectance\" = [0.1, \"x\"]\n")
                .unwrap_err();
        assert_eq!(err.title(), "Bad script");
    }
}
