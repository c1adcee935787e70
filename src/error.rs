use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between reading the csv and showing the chart.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("could not open input file {}: {source}", .path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {} as csv: {reason}", .path.display())]
    MalformedInput { path: PathBuf, reason: String },
    #[error("column {0:?} not found in dataset")]
    MissingColumn(String),
    #[error("column {0:?} is not numeric")]
    NonNumericColumn(String),
    #[error("no display available: {0}")]
    DisplayUnavailable(String),
    #[error("unsupported output format {0:?}, use svg or png")]
    UnsupportedFormat(String),
    #[error("failed to render chart: {0}")]
    Render(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
