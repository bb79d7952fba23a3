use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Name of the column holding the point values.
pub const POINTS_COLUMN: &str = "Points";

/// One tabulated value: a number, or a time string not yet converted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Text(String),
}

impl Serialize for RawCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Whole numbers (point values, most distances in cm) stay integers
            RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 9.0e15 => {
                serializer.serialize_i64(*n as i64)
            }
            RawCell::Number(n) => serializer.serialize_f64(*n),
            RawCell::Text(text) => serializer.serialize_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub name: String,
    pub cells: Vec<Option<RawCell>>,
}

/// Table as produced by a source: ordered `column name -> cells` pairs.
///
/// Serializes as a JSON object whose key order is the column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    columns: Vec<RawColumn>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a table whose `Points` column holds `points` in order.
    pub fn with_points(points: impl IntoIterator<Item = i64>) -> Self {
        let mut table = Self::new();
        table.insert(
            POINTS_COLUMN,
            points
                .into_iter()
                .map(|p| Some(RawCell::Number(p as f64)))
                .collect(),
        );
        table
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&RawColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Insert a column, replacing the cells of an existing column with the
    /// same name in place.
    pub fn insert(&mut self, name: impl Into<String>, cells: Vec<Option<RawCell>>) {
        let name = name.into();
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.cells = cells,
            None => self.columns.push(RawColumn { name, cells }),
        }
    }

    /// Append one cell to a column, creating the column if needed.
    pub fn push_cell(&mut self, name: &str, cell: Option<RawCell>) {
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.cells.push(cell),
            None => self.columns.push(RawColumn {
                name: name.to_string(),
                cells: vec![cell],
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Serialize for RawTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in &self.columns {
            map.serialize_entry(&column.name, &column.cells)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = RawTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column names to value lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawTable, A::Error> {
                let mut columns: Vec<RawColumn> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, cells)) = access.next_entry::<String, Vec<Option<RawCell>>>()? {
                    if columns.iter().any(|c| c.name == name) {
                        return Err(serde::de::Error::custom(format!("duplicate column '{}'", name)));
                    }
                    columns.push(RawColumn { name, cells });
                }
                Ok(RawTable { columns })
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
