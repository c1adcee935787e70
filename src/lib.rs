use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
pub mod chart;
pub mod display;
pub mod error;
pub mod plot;
pub mod render;
pub mod theme;

pub use error::PlotError;

pub const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// x axis, note the leading space written by the benchmark generator
pub const DENSITY_COLUMN: &str = " Density";
/// y axis
pub const METRIC_COLUMN: &str = " CSR w/o MKL";
/// one line per distinct value
pub const VERTICES_COLUMN: &str = "Vertices";

/// A single column of the dataset, typed at load time.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl Column {
    /// numeric if every non-empty cell parses as a float, text otherwise;
    /// empty cells of a numeric column become NAN
    fn infer(cells: Vec<String>) -> Column {
        let numeric: Option<Vec<f64>> = cells
            .iter()
            .map(|c| {
                let t = c.trim();
                if t.is_empty() {
                    Some(f64::NAN)
                } else {
                    t.parse::<f64>().ok()
                }
            })
            .collect();
        match numeric {
            Some(values) => Column::Numeric(values),
            None => Column::Text(cells),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Column::Numeric(v) => Some(&v[..]),
            Column::Text(_) => None,
        }
    }

    /// the cell as it is printed in the table dump
    pub fn cell(&self, row: usize) -> String {
        match self {
            Column::Numeric(v) => v[row].to_string(),
            Column::Text(v) => v[row].clone(),
        }
    }
}

/// The main struct for the runtime table: named columns in file order.
/// Names are kept exactly as in the header, surrounding whitespace included.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Dataset {
    /// Init a Dataset from csv, the first row is the header.
    /// Column types are inferred, no other validation is done here.
    pub fn from_csv<P: AsRef<Path>>(fin: P) -> Result<Dataset, PlotError> {
        let path = fin.as_ref();
        let file = File::open(path).map_err(|source| PlotError::InputNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        Dataset::parse(BufReader::new(file), path)
    }

    /// same as from_csv but from any reader, e.g. an in-memory buffer
    pub fn from_reader<R: Read>(rdr: R) -> Result<Dataset, PlotError> {
        Dataset::parse(rdr, Path::new("<reader>"))
    }

    fn parse<R: Read>(rdr: R, path: &Path) -> Result<Dataset, PlotError> {
        let malformed = |reason: String| PlotError::MalformedInput {
            path: path.to_path_buf(),
            reason,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(rdr);
        let names: Vec<String> = reader
            .headers()
            .map_err(|e| malformed(e.to_string()))?
            .iter()
            .map(String::from)
            .collect();
        if names.is_empty() {
            return Err(malformed("no header row".to_string()));
        }
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
        for record in reader.records() {
            let record = record.map_err(|e| malformed(e.to_string()))?;
            for (column, value) in cells.iter_mut().zip(record.iter()) {
                column.push(value.to_string());
            }
        }
        let columns = cells.into_iter().map(Column::infer).collect();
        log::debug!("parsed {} columns from {}", names.len(), path.display());
        Ok(Dataset { names, columns })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// number of rows
    pub fn len(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// exact, whitespace-sensitive lookup; the first match wins on duplicates
    pub fn column(&self, name: &str) -> Result<&Column, PlotError> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| PlotError::MissingColumn(name.to_string()))
    }

    pub fn numeric_column(&self, name: &str) -> Result<&[f64], PlotError> {
        self.column(name)?
            .as_numeric()
            .ok_or_else(|| PlotError::NonNumericColumn(name.to_string()))
    }

    /// fails on the first name that is not in the header
    pub fn require_columns(&self, names: &[&str]) -> Result<(), PlotError> {
        for name in names {
            self.column(name)?;
        }
        Ok(())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.len();
        let index_width = rows.saturating_sub(1).to_string().len();
        let rendered: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| (0..rows).map(|r| c.cell(r)).collect())
            .collect();
        let widths: Vec<usize> = self
            .names
            .iter()
            .zip(rendered.iter())
            .map(|(name, cells)| {
                cells
                    .iter()
                    .map(|c| c.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        write!(f, "{:w$}", "", w = index_width)?;
        for (name, &w) in self.names.iter().zip(widths.iter()) {
            write!(f, "  {:>w$}", name, w = w)?;
        }
        writeln!(f)?;
        for r in 0..rows {
            write!(f, "{:>w$}", r, w = index_width)?;
            for (cells, &w) in rendered.iter().zip(widths.iter()) {
                write!(f, "  {:>w$}", cells[r], w = w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// None for an empty slice; NAN never wins a comparison so filter it out first
pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut self_iter = s.iter();
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}
