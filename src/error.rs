use thiserror::Error;

/// Raised while compiling `Rules` into an `Extractor`.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid noise pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("invalid delimiter set: {0}")]
    Delimiters(#[source] regex::Error),
    #[error("min_words ({min}) is greater than max_words ({max})")]
    WordBounds { min: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Column '{0}' not found in the uploaded file")]
    MissingColumn(String),
    #[error("unsupported input format: {0}")]
    UnsupportedFormat(String),
    #[error("workbook has no worksheets")]
    EmptyWorkbook,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Workbook(#[from] calamine::Error),
    #[error(transparent)]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
