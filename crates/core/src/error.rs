//! Error types for gestao.

use gestao_sheet::SheetError;
use gestao_viz::VizError;
use thiserror::Error;

/// Result type for gestao operations.
pub type GestaoResult<T> = Result<T, GestaoError>;

/// Errors that can occur while rendering a dashboard page.
#[derive(Debug, Error)]
pub enum GestaoError {
    /// The workbook or one of its sheets could not be read.
    #[error("{0}")]
    Source(#[from] SheetError),

    /// A column the page cannot work without is absent.
    #[error("Coluna obrigatória ausente: {0}")]
    MissingColumn(String),

    /// Malformed `Column=Value` filter argument.
    #[error("Filtro inválido: '{0}' (use Coluna=Valor)")]
    InvalidFilter(String),

    /// Unknown page name.
    #[error("Página desconhecida: {0}")]
    UnknownPage(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML configuration could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Chart export error.
    #[error("Chart error: {0}")]
    Chart(#[from] VizError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GestaoError {
    /// Whether the error means the workbook, sheet or page does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            GestaoError::Source(err) => err.is_not_found(),
            GestaoError::UnknownPage(_) => true,
            _ => false,
        }
    }

    /// Whether the request itself was malformed.
    pub fn is_bad_request(&self) -> bool {
        matches!(self, GestaoError::InvalidFilter(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_kinds() {
        let missing = GestaoError::from(SheetError::FileNotFound {
            path: "APP Gestão.xlsx".into(),
        });
        assert!(missing.is_not_found());
        assert_eq!(missing.to_string(), "File not found: APP Gestão.xlsx");

        assert!(GestaoError::UnknownPage("x".into()).is_not_found());
        assert!(!GestaoError::Config("bad".into()).is_not_found());
        assert!(GestaoError::InvalidFilter("x".into()).is_bad_request());
    }
}
