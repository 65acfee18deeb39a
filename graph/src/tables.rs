//! Column-oriented input tables.
//!
//! A panel hands over two data frames whose fields are addressed by position.
//! Node frame: id, name, last update, highlighted flag, color.
//! Edge frame: id, source id, target id, capacity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use lnviz_core::error::{ErrorCode, LnvizError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("{frame} frame is missing field #{position} ({expected})")]
    MissingField {
        frame: &'static str,
        position: usize,
        expected: &'static str,
    },
    #[error("panel data must contain a node series and an edge series, got {0}")]
    MissingSeries(usize),
}

impl LnvizError for TableError {
    fn error_code(&self) -> ErrorCode {
        ErrorCode::InvalidArgument
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    fn value(&self, row: usize) -> &Value {
        self.values.get(row).unwrap_or(&Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DataFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fields: Vec<Field>,
}

impl DataFrame {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { name: None, fields }
    }

    /// Row count is the length of the first field.
    pub fn row_count(&self) -> usize {
        self.fields.first().map(|f| f.values.len()).unwrap_or(0)
    }

    fn field(
        &self,
        frame: &'static str,
        position: usize,
        expected: &'static str,
    ) -> Result<&Field, TableError> {
        self.fields.get(position).ok_or(TableError::MissingField {
            frame,
            position,
            expected,
        })
    }
}

/// The two series a graph panel receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PanelSeries {
    pub nodes: DataFrame,
    pub edges: DataFrame,
}

impl PanelSeries {
    /// Take the first two frames of a panel's series list as nodes and edges.
    pub fn from_frames(frames: Vec<DataFrame>) -> Result<Self, TableError> {
        let count = frames.len();
        let mut frames = frames.into_iter();
        match (frames.next(), frames.next()) {
            (Some(nodes), Some(edges)) => Ok(Self { nodes, edges }),
            _ => Err(TableError::MissingSeries(count)),
        }
    }

    pub fn decode(&self) -> Result<(NodeTable, EdgeTable), TableError> {
        Ok((
            NodeTable::from_frame(&self.nodes)?,
            EdgeTable::from_frame(&self.edges)?,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeTable {
    pub ids: Vec<String>,
    pub names: Vec<Option<String>>,
    pub last_updates: Vec<Option<i64>>,
    pub highlighted: Vec<bool>,
    pub colors: Vec<String>,
}

impl NodeTable {
    pub fn from_frame(frame: &DataFrame) -> Result<Self, TableError> {
        let ids = frame.field("node", 0, "id")?;
        let names = frame.field("node", 1, "name")?;
        let last_updates = frame.field("node", 2, "last update")?;
        let highlighted = frame.field("node", 3, "highlighted")?;
        let colors = frame.field("node", 4, "color")?;

        let mut table = Self::default();
        for row in 0..frame.row_count() {
            table.ids.push(value_to_string(ids.value(row)).unwrap_or_default());
            table.names.push(value_to_string(names.value(row)));
            table.last_updates.push(value_to_timestamp(last_updates.value(row)));
            table.highlighted.push(is_truthy(highlighted.value(row)));
            table.colors.push(value_to_string(colors.value(row)).unwrap_or_default());
        }
        Ok(table)
    }

    pub fn push(
        &mut self,
        id: impl Into<String>,
        name: Option<&str>,
        highlighted: bool,
        color: impl Into<String>,
    ) -> &mut Self {
        self.ids.push(id.into());
        self.names.push(name.map(str::to_string));
        self.last_updates.push(None);
        self.highlighted.push(highlighted);
        self.colors.push(color.into());
        self
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn name(&self, row: usize) -> Option<&str> {
        self.names.get(row).and_then(|n| n.as_deref())
    }

    pub fn last_update(&self, row: usize) -> Option<i64> {
        self.last_updates.get(row).copied().flatten()
    }

    pub fn is_highlighted(&self, row: usize) -> bool {
        self.highlighted.get(row).copied().unwrap_or(false)
    }

    pub fn color(&self, row: usize) -> &str {
        self.colors.get(row).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgeTable {
    pub ids: Vec<String>,
    pub sources: Vec<String>,
    pub targets: Vec<String>,
    pub capacities: Vec<u64>,
}

impl EdgeTable {
    pub fn from_frame(frame: &DataFrame) -> Result<Self, TableError> {
        let ids = frame.field("edge", 0, "id")?;
        let sources = frame.field("edge", 1, "source")?;
        let targets = frame.field("edge", 2, "target")?;
        let capacities = frame.field("edge", 3, "capacity")?;

        let mut table = Self::default();
        for row in 0..frame.row_count() {
            table.ids.push(value_to_string(ids.value(row)).unwrap_or_default());
            table.sources.push(value_to_string(sources.value(row)).unwrap_or_default());
            table.targets.push(value_to_string(targets.value(row)).unwrap_or_default());
            table.capacities.push(value_to_capacity(capacities.value(row)));
        }
        Ok(table)
    }

    pub fn push(
        &mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        capacity: u64,
    ) -> &mut Self {
        self.ids.push(id.into());
        self.sources.push(source.into());
        self.targets.push(target.into());
        self.capacities.push(capacity);
        self
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn id(&self, row: usize) -> &str {
        self.ids.get(row).map(String::as_str).unwrap_or("")
    }

    pub fn source(&self, row: usize) -> &str {
        self.sources.get(row).map(String::as_str).unwrap_or("")
    }

    pub fn target(&self, row: usize) -> &str {
        self.targets.get(row).map(String::as_str).unwrap_or("")
    }

    pub fn capacity(&self, row: usize) -> u64 {
        self.capacities.get(row).copied().unwrap_or(0)
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// JavaScript truthiness: null, false, 0, NaN and "" are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_to_capacity(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(float_to_capacity))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(float_to_capacity))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

fn float_to_capacity(f: f64) -> u64 {
    if f.is_finite() && f > 0.0 {
        f.trunc() as u64
    } else {
        0
    }
}

fn value_to_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node_frame() -> DataFrame {
        DataFrame::new(vec![
            Field::new("id", vec![json!("a"), json!("b"), json!("c")]),
            Field::new("title", vec![json!("alice"), Value::Null, json!("carol")]),
            Field::new("subtitle", vec![json!(1700000000), json!("1700000001")]),
            Field::new("mainstat", vec![json!("true"), json!(""), json!(0)]),
            Field::new("color", vec![json!("#3399ff"), json!("#000000"), Value::Null]),
        ])
    }

    #[test]
    fn test_node_table_from_frame() {
        let table = NodeTable::from_frame(&node_frame()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.ids, vec!["a", "b", "c"]);
        assert_eq!(table.name(0), Some("alice"));
        assert_eq!(table.name(1), None);
        assert_eq!(table.last_update(0), Some(1_700_000_000));
        assert_eq!(table.last_update(1), Some(1_700_000_001));
        assert_eq!(table.last_update(2), None);
        assert_eq!(table.highlighted, vec![true, false, false]);
        assert_eq!(table.color(2), "");
    }

    #[test]
    fn test_edge_table_capacity_coercion() {
        let frame = DataFrame::new(vec![
            Field::new("id", vec![json!(7), json!("8"), json!("9"), json!("10")]),
            Field::new("source", vec![json!("a"); 4]),
            Field::new("target", vec![json!("b"); 4]),
            Field::new(
                "mainstat",
                vec![json!(5_000_000), json!("200000000"), json!(12.9), json!(-4)],
            ),
        ]);
        let table = EdgeTable::from_frame(&frame).unwrap();
        assert_eq!(table.ids, vec!["7", "8", "9", "10"]);
        assert_eq!(table.capacities, vec![5_000_000, 200_000_000, 12, 0]);
    }

    #[test]
    fn test_missing_field_is_reported() {
        let frame = DataFrame::new(vec![Field::new("id", vec![json!("a")])]);
        let err = EdgeTable::from_frame(&frame).unwrap_err();
        assert_eq!(
            err,
            TableError::MissingField {
                frame: "edge",
                position: 1,
                expected: "source"
            }
        );
        assert_eq!(err.error_code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_panel_series_requires_two_frames() {
        let err = PanelSeries::from_frames(vec![DataFrame::default()]).unwrap_err();
        assert_eq!(err, TableError::MissingSeries(1));
    }
}
