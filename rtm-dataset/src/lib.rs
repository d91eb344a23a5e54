use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub mod provenance;
pub mod results;
pub mod version;

pub use provenance::{decode_blob, encode_blob};
pub use results::Results;
pub use version::{check_version, VersionCheck};

pub const ATTR_TITLE: &str = "title";
pub const ATTR_UNIT: &str = "unit";
pub const ATTR_VERSION: &str = "version";
pub const ATTR_SIM_START: &str = "sim_start";
pub const ATTR_SIM_END: &str = "sim_end";
pub const ATTR_ENGINE: &str = "engine";
pub const ATTR_BASE_INPUTS: &str = "base_pzb64";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// File extension of results containers.
pub const RESULTS_EXTENSION: &str = "json";

pub type Attrs = BTreeMap<String, String>;

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("format error: {0}")]
    Format(#[from] serde_json::Error),
    #[error("invalid dataset: {0}")]
    Invalid(String),
    #[error("unknown dimension '{0}'")]
    UnknownDim(String),
    #[error("dimensions {found:?} do not match {expected:?}")]
    DimMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    #[error("index {index} out of bounds for dimension '{dim}' of size {size}")]
    IndexOutOfBounds {
        dim: String,
        index: usize,
        size: usize,
    },
    #[error("malformed blob: {0}")]
    Blob(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "data", rename_all = "lowercase")]
pub enum CoordValues {
    Float64(#[serde(with = "non_finite")] Vec<f64>),
    Str(Vec<String>),
}

impl CoordValues {
    pub fn len(&self) -> usize {
        match self {
            CoordValues::Float64(values) => values.len(),
            CoordValues::Str(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype_name(&self) -> &'static str {
        match self {
            CoordValues::Float64(_) => "float64",
            CoordValues::Str(_) => "str",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, CoordValues::Str(_))
    }

    /// Position of each value along a numeric axis. Text values are placed at
    /// their index.
    pub fn positions(&self) -> Vec<f64> {
        match self {
            CoordValues::Float64(values) => values.clone(),
            CoordValues::Str(values) => (0..values.len()).map(|i| i as f64).collect(),
        }
    }

    pub fn label(&self, index: usize) -> String {
        match self {
            CoordValues::Float64(values) => values
                .get(index)
                .map(|v| format_number(*v))
                .unwrap_or_default(),
            CoordValues::Str(values) => values.get(index).cloned().unwrap_or_default(),
        }
    }

    pub fn labels(&self) -> Vec<String> {
        (0..self.len()).map(|i| self.label(i)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub name: String,
    pub dims: Vec<String>,
    pub values: CoordValues,
    #[serde(default)]
    pub attrs: Attrs,
}

impl Coordinate {
    /// One-dimensional coordinate indexing the dimension of the same name.
    pub fn index(name: &str, values: CoordValues) -> Self {
        Self {
            name: name.to_string(),
            dims: vec![name.to_string()],
            values,
            attrs: Attrs::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.insert(key.to_string(), value.to_string());
        self
    }

    pub fn title(&self) -> &str {
        self.attrs
            .get(ATTR_TITLE)
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    fn is_index_for(&self, dim: &str) -> bool {
        self.name == dim && self.dims.len() == 1 && self.dims[0] == dim
    }
}

/// Named float64 array over a subset of the dataset dimensions, stored
/// row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub dims: Vec<String>,
    pub shape: Vec<usize>,
    #[serde(with = "non_finite")]
    pub values: Vec<f64>,
    #[serde(default)]
    pub attrs: Attrs,
}

impl Variable {
    pub fn new(
        name: &str,
        dims: &[(&str, usize)],
        values: Vec<f64>,
    ) -> Result<Self, DatasetError> {
        let variable = Self {
            name: name.to_string(),
            dims: dims.iter().map(|(d, _)| d.to_string()).collect(),
            shape: dims.iter().map(|(_, s)| *s).collect(),
            values,
            attrs: Attrs::new(),
        };
        variable.check_len()?;
        Ok(variable)
    }

    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.insert(key.to_string(), value.to_string());
        self
    }

    pub fn title(&self) -> &str {
        self.attrs
            .get(ATTR_TITLE)
            .map(String::as_str)
            .unwrap_or(&self.name)
    }

    pub fn dtype(&self) -> &'static str {
        "float64"
    }

    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Element count implied by the shape, saturating on overflow.
    pub fn size(&self) -> usize {
        self.shape
            .iter()
            .fold(1usize, |acc, n| acc.saturating_mul(*n))
    }

    pub fn axis_of(&self, dim: &str) -> Result<usize, DatasetError> {
        self.dims
            .iter()
            .position(|d| d == dim)
            .ok_or_else(|| DatasetError::UnknownDim(dim.to_string()))
    }

    fn check_len(&self) -> Result<(), DatasetError> {
        if self.dims.len() != self.shape.len() {
            return Err(DatasetError::Invalid(format!(
                "variable '{}' has {} dims but shape of rank {}",
                self.name,
                self.dims.len(),
                self.shape.len()
            )));
        }
        let expected = element_count(&format!("variable '{}'", self.name), &self.shape)?;
        if self.values.len() != expected {
            return Err(DatasetError::Invalid(format!(
                "variable '{}' holds {} values, expected {expected}",
                self.name,
                self.values.len()
            )));
        }
        Ok(())
    }

    fn strides(&self) -> Vec<usize> {
        let mut strides = vec![1; self.shape.len()];
        for axis in (0..self.shape.len().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * self.shape[axis + 1];
        }
        strides
    }

    /// Reorders the dimensions. `order` must name every dimension exactly once.
    pub fn transpose(&self, order: &[&str]) -> Result<Variable, DatasetError> {
        let mut sorted_order: Vec<&str> = order.to_vec();
        sorted_order.sort_unstable();
        let mut sorted_dims: Vec<&str> = self.dims.iter().map(String::as_str).collect();
        sorted_dims.sort_unstable();
        if sorted_order != sorted_dims {
            return Err(DatasetError::DimMismatch {
                expected: self.dims.clone(),
                found: order.iter().map(|d| d.to_string()).collect(),
            });
        }

        let axes: Vec<usize> = order
            .iter()
            .map(|d| self.axis_of(d))
            .collect::<Result<_, _>>()?;
        let src_strides = self.strides();
        let shape: Vec<usize> = axes.iter().map(|&a| self.shape[a]).collect();
        let mut values = Vec::with_capacity(self.values.len());
        let mut index = vec![0usize; shape.len()];
        for _ in 0..self.values.len() {
            let offset: usize = index
                .iter()
                .zip(&axes)
                .map(|(i, &a)| i * src_strides[a])
                .sum();
            values.push(self.values[offset]);
            for axis in (0..index.len()).rev() {
                index[axis] += 1;
                if index[axis] < shape[axis] {
                    break;
                }
                index[axis] = 0;
            }
        }

        Ok(Variable {
            name: self.name.clone(),
            dims: order.iter().map(|d| d.to_string()).collect(),
            shape,
            values,
            attrs: self.attrs.clone(),
        })
    }

    /// Selects one position along `dim`, dropping that dimension.
    pub fn isel(&self, dim: &str, index: usize) -> Result<Variable, DatasetError> {
        let axis = self.axis_of(dim)?;
        let size = self.shape[axis];
        if index >= size {
            return Err(DatasetError::IndexOutOfBounds {
                dim: dim.to_string(),
                index,
                size,
            });
        }
        let outer: usize = self.shape[..axis].iter().product();
        let inner: usize = self.shape[axis + 1..].iter().product();
        let mut values = Vec::with_capacity(outer * inner);
        for o in 0..outer {
            let start = (o * size + index) * inner;
            values.extend_from_slice(&self.values[start..start + inner]);
        }
        let mut dims = self.dims.clone();
        dims.remove(axis);
        let mut shape = self.shape.clone();
        shape.remove(axis);
        Ok(Variable {
            name: self.name.clone(),
            dims,
            shape,
            values,
            attrs: self.attrs.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub dims: Vec<Dimension>,
    #[serde(default)]
    pub coords: Vec<Coordinate>,
    #[serde(default)]
    pub data_vars: Vec<Variable>,
    #[serde(default)]
    pub attrs: Attrs,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dim(&mut self, name: &str, size: usize) -> Result<(), DatasetError> {
        if self.dim_size(name).is_some() {
            return Err(DatasetError::Invalid(format!(
                "dimension '{name}' already exists"
            )));
        }
        self.dims.push(Dimension {
            name: name.to_string(),
            size,
        });
        Ok(())
    }

    pub fn add_coord(&mut self, coord: Coordinate) -> Result<(), DatasetError> {
        let expected = self.shape_of(&coord.dims)?;
        let count = element_count(&format!("coordinate '{}'", coord.name), &expected)?;
        if coord.values.len() != count {
            return Err(DatasetError::Invalid(format!(
                "coordinate '{}' holds {} values, expected {count}",
                coord.name,
                coord.values.len()
            )));
        }
        self.coords.push(coord);
        Ok(())
    }

    pub fn add_var(&mut self, variable: Variable) -> Result<(), DatasetError> {
        let expected = self.shape_of(&variable.dims)?;
        if expected != variable.shape {
            return Err(DatasetError::Invalid(format!(
                "variable '{}' has shape {:?}, dataset dims give {:?}",
                variable.name, variable.shape, expected
            )));
        }
        variable.check_len()?;
        self.data_vars.push(variable);
        Ok(())
    }

    fn shape_of(&self, dims: &[String]) -> Result<Vec<usize>, DatasetError> {
        dims.iter()
            .map(|d| {
                self.dim_size(d)
                    .ok_or_else(|| DatasetError::UnknownDim(d.clone()))
            })
            .collect()
    }

    pub fn dim_size(&self, name: &str) -> Option<usize> {
        self.dims.iter().find(|d| d.name == name).map(|d| d.size)
    }

    pub fn coord(&self, name: &str) -> Option<&Coordinate> {
        self.coords.iter().find(|c| c.name == name)
    }

    pub fn var(&self, name: &str) -> Option<&Variable> {
        self.data_vars.iter().find(|v| v.name == name)
    }

    pub fn index_coord(&self, dim: &str) -> Option<&Coordinate> {
        self.coords.iter().find(|c| c.is_index_for(dim))
    }

    /// Coordinates that span `dim`, in declaration order.
    pub fn coords_for_dim(&self, dim: &str) -> Vec<&Coordinate> {
        self.coords
            .iter()
            .filter(|c| c.dims.iter().any(|d| d == dim))
            .collect()
    }

    /// Dimensions carrying an index coordinate, in dimension order.
    pub fn sweep_dims(&self) -> Vec<&Dimension> {
        self.dims
            .iter()
            .filter(|d| self.index_coord(&d.name).is_some())
            .collect()
    }

    /// Display name of a dimension: the index coordinate's title, or the raw
    /// dimension name.
    pub fn dim_title<'a>(&'a self, dim: &'a str) -> &'a str {
        self.index_coord(dim)
            .and_then(|c| c.attrs.get(ATTR_TITLE))
            .map(String::as_str)
            .unwrap_or(dim)
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        let mut seen = std::collections::HashSet::new();
        for dim in &self.dims {
            if !seen.insert(dim.name.as_str()) {
                return Err(DatasetError::Invalid(format!(
                    "duplicate dimension '{}'",
                    dim.name
                )));
            }
        }
        for coord in &self.coords {
            let shape = self.shape_of(&coord.dims)?;
            let count = element_count(&format!("coordinate '{}'", coord.name), &shape)?;
            if coord.values.len() != count {
                return Err(DatasetError::Invalid(format!(
                    "coordinate '{}' holds {} values, expected {count}",
                    coord.name,
                    coord.values.len()
                )));
            }
        }
        for variable in &self.data_vars {
            if self.shape_of(&variable.dims)? != variable.shape {
                return Err(DatasetError::Invalid(format!(
                    "variable '{}' shape disagrees with dataset dims",
                    variable.name
                )));
            }
            variable.check_len()?;
        }
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let data = fs::read(path.as_ref())?;
        let dataset: Dataset = serde_json::from_slice(&data)?;
        dataset.validate()?;
        log::debug!(
            "loaded dataset from {} ({} dims, {} variables)",
            path.as_ref().display(),
            dataset.dims.len(),
            dataset.data_vars.len()
        );
        Ok(dataset)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), DatasetError> {
        let data = serde_json::to_vec_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }
}

/// Product of `shape`, failing when it overflows.
fn element_count(what: &str, shape: &[usize]) -> Result<usize, DatasetError> {
    shape
        .iter()
        .try_fold(1usize, |acc, n| acc.checked_mul(*n))
        .ok_or_else(|| DatasetError::Invalid(format!("{what} with shape {shape:?} is too large")))
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.6}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// JSON has no NaN or infinity: NaN is written as `null`, infinities as the
/// strings `"inf"` and `"-inf"`.
mod non_finite {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Cell {
        Number(f64),
        Special(String),
    }

    pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
        let mapped: Vec<Option<Cell>> = values
            .iter()
            .map(|&v| {
                if v.is_nan() {
                    None
                } else if v.is_infinite() {
                    let text = if v > 0.0 { "inf" } else { "-inf" };
                    Some(Cell::Special(text.to_string()))
                } else {
                    Some(Cell::Number(v))
                }
            })
            .collect();
        mapped.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        let mapped: Vec<Option<Cell>> = Vec::deserialize(deserializer)?;
        mapped
            .into_iter()
            .map(|cell| match cell {
                None => Ok(f64::NAN),
                Some(Cell::Number(v)) => Ok(v),
                Some(Cell::Special(text)) => match text.as_str() {
                    "inf" => Ok(f64::INFINITY),
                    "-inf" => Ok(f64::NEG_INFINITY),
                    "nan" => Ok(f64::NAN),
                    other => Err(D::Error::custom(format!("invalid number '{other}'"))),
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Variable {
        // dims (a=2, b=3), values a*10 + b
        Variable::new(
            "v",
            &[("a", 2), ("b", 3)],
            vec![0.0, 1.0, 2.0, 10.0, 11.0, 12.0],
        )
        .unwrap()
    }

    #[test]
    fn transpose_swaps_axes() {
        let t = grid().transpose(&["b", "a"]).unwrap();
        assert_eq!(t.shape, vec![3, 2]);
        assert_eq!(t.values, vec![0.0, 10.0, 1.0, 11.0, 2.0, 12.0]);
    }

    #[test]
    fn transpose_rejects_missing_dim() {
        let err = grid().transpose(&["a", "a"]).unwrap_err();
        assert!(matches!(err, DatasetError::DimMismatch { .. }));
    }

    #[test]
    fn isel_drops_dimension() {
        let row = grid().isel("a", 1).unwrap();
        assert_eq!(row.dims, vec!["b".to_string()]);
        assert_eq!(row.values, vec![10.0, 11.0, 12.0]);
        let col = grid().isel("b", 2).unwrap();
        assert_eq!(col.values, vec![2.0, 12.0]);
        assert!(grid().isel("b", 3).is_err());
    }

    #[test]
    fn number_labels_are_trimmed() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(0.55), "0.55");
    }
}
