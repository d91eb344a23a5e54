use rtm_dataset::{decode_blob, Coordinate, Dataset, Results, Variable, ATTR_BASE_INPUTS};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One row of the results summary tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryNode {
    pub label: String,
    pub value: String,
    pub children: Vec<SummaryNode>,
}

impl SummaryNode {
    pub fn leaf(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(
        label: impl Into<String>,
        value: impl Into<String>,
        children: Vec<SummaryNode>,
    ) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            children,
        }
    }
}

pub fn summarize(results: &Results) -> Vec<SummaryNode> {
    let dataset = results.dataset.as_ref();
    vec![
        file_info(results.file.as_deref()),
        outputs(dataset),
        sweep(dataset),
        base_inputs(dataset),
        attributes(dataset),
    ]
}

/// Size in KiB, MiB or GiB with two decimals.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64 / 1024.0;
    let mut suffix = "KiB";
    if size >= 1024.0 {
        size /= 1024.0;
        suffix = "MiB";
    }
    if size >= 1024.0 {
        size /= 1024.0;
        suffix = "GiB";
    }
    format!("{size:.2} {suffix}")
}

fn file_info(file: Option<&Path>) -> SummaryNode {
    let Some(path) = file else {
        return SummaryNode::leaf("File", "<not saved>");
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut children = vec![SummaryNode::leaf("Path", path.display().to_string())];
    match fs::metadata(path) {
        Ok(meta) => {
            children.push(SummaryNode::leaf("Size", format_size(meta.len())));
            children.push(SummaryNode::leaf("Mode", file_mode(&meta)));
            if let Ok(modified) = meta.modified() {
                let modified: chrono::DateTime<chrono::Local> = modified.into();
                children.push(SummaryNode::leaf("Modified", modified.to_rfc3339()));
            }
        }
        Err(err) => {
            log::warn!("cannot stat {}: {err}", path.display());
            children.push(SummaryNode::leaf("Size", "<unavailable>"));
        }
    }
    SummaryNode::branch("File", name, children)
}

#[cfg(unix)]
fn file_mode(meta: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:o}", meta.permissions().mode())
}

#[cfg(not(unix))]
fn file_mode(meta: &fs::Metadata) -> String {
    if meta.permissions().readonly() {
        "readonly".to_string()
    } else {
        "writable".to_string()
    }
}

fn values_node(values: String) -> SummaryNode {
    SummaryNode::branch(
        "values",
        "<click to expand>",
        vec![SummaryNode::leaf(values, "")],
    )
}

fn float_list(values: &[f64]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| if v.is_nan() { "nan".to_string() } else { v.to_string() })
        .collect();
    format!("[{}]", items.join(", "))
}

fn attr_nodes(attrs: &rtm_dataset::Attrs) -> impl Iterator<Item = SummaryNode> + '_ {
    attrs
        .iter()
        .map(|(name, value)| SummaryNode::leaf(name.clone(), value.clone()))
}

fn outputs(dataset: &Dataset) -> SummaryNode {
    let children = dataset.data_vars.iter().map(output_node).collect::<Vec<_>>();
    SummaryNode::branch("Outputs", format!("({})", children.len()), children)
}

fn output_node(variable: &Variable) -> SummaryNode {
    let mut children = vec![values_node(float_list(&variable.values))];
    children.extend(attr_nodes(&variable.attrs));
    SummaryNode::branch(
        variable.name.clone(),
        format!("{} {:?}", variable.dtype(), variable.shape),
        children,
    )
}

fn sweep(dataset: &Dataset) -> SummaryNode {
    let children = dataset
        .sweep_dims()
        .iter()
        .map(|dim| {
            let coords = dataset.coords_for_dim(&dim.name);
            SummaryNode::branch(
                dataset.dim_title(&dim.name),
                format!("size={} ({})", dim.size, coords.len()),
                coords.iter().map(|c| coord_node(dataset, c)).collect(),
            )
        })
        .collect::<Vec<_>>();
    SummaryNode::branch("Sweep", format!("({})", children.len()), children)
}

fn coord_node(dataset: &Dataset, coord: &Coordinate) -> SummaryNode {
    // Parameter-path dimensions are shown by size only.
    let dims: Vec<String> = coord
        .dims
        .iter()
        .map(|dim| {
            let size = dataset.dim_size(dim).unwrap_or(0);
            if dim.contains('.') {
                size.to_string()
            } else {
                format!("{dim}={size}")
            }
        })
        .collect();
    let values = match &coord.values {
        rtm_dataset::CoordValues::Float64(values) => float_list(values),
        rtm_dataset::CoordValues::Str(values) => format!("{values:?}"),
    };
    let mut children = vec![values_node(values)];
    children.extend(attr_nodes(&coord.attrs));
    SummaryNode::branch(
        coord.name.clone(),
        format!("{} ({})", coord.values.dtype_name(), dims.join(", ")),
        children,
    )
}

fn base_inputs(dataset: &Dataset) -> SummaryNode {
    let Some(blob) = dataset.attrs.get(ATTR_BASE_INPUTS) else {
        log::debug!("dataset missing base inputs");
        return SummaryNode::leaf("Base Inputs", "<not available>");
    };
    match decode_blob::<Value>(blob) {
        Ok(Value::Object(map)) => {
            let children = map
                .iter()
                .map(|(key, value)| value_node(key, value))
                .collect::<Vec<_>>();
            SummaryNode::branch("Base Inputs", format!("({})", children.len()), children)
        }
        Ok(other) => SummaryNode::leaf("Base Inputs", other.to_string()),
        Err(err) => {
            log::warn!("cannot decode base inputs: {err}");
            SummaryNode::leaf("Base Inputs", "<not available>")
        }
    }
}

fn value_node(key: &str, value: &Value) -> SummaryNode {
    match value {
        Value::Object(map) => SummaryNode::branch(
            key,
            format!("({})", map.len()),
            map.iter().map(|(k, v)| value_node(k, v)).collect(),
        ),
        Value::String(text) => SummaryNode::leaf(key, text.clone()),
        other => SummaryNode::leaf(key, other.to_string()),
    }
}

fn attributes(dataset: &Dataset) -> SummaryNode {
    let children = attr_nodes(&dataset.attrs).collect::<Vec<_>>();
    SummaryNode::branch("Attributes", format!("({})", children.len()), children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_units() {
        assert_eq!(format_size(512), "0.50 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MiB");
        assert_eq!(format_size(5 * 1024 * 1024 * 1024), "5.00 GiB");
    }

    #[test]
    fn unsaved_results_show_placeholders() {
        let results = Results::unsaved(Dataset::new());
        let nodes = summarize(&results);
        let labels: Vec<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["File", "Outputs", "Sweep", "Base Inputs", "Attributes"]
        );
        assert_eq!(nodes[0].value, "<not saved>");
        assert_eq!(nodes[3].value, "<not available>");
    }
}
