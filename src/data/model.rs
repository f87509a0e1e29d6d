use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a loaded column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Column – one named column of the source table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub values: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table. Column order follows the source file.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Where the table was read from; inlined into generated scripts.
    pub source: PathBuf,
    pub columns: Vec<Column>,
}

impl Dataset {
    /// Build a dataset from columns, padding short columns with nulls so every
    /// column has the same number of rows.
    pub fn from_columns(source: PathBuf, mut columns: Vec<Column>) -> Self {
        let rows = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for col in &mut columns {
            col.values.resize(rows, CellValue::Null);
        }
        Dataset { source, columns }
    }

    /// The Dataset Descriptor: ordered column names.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn source_display(&self) -> String {
        self.source.display().to_string()
    }
}
