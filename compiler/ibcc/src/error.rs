use ibc_diagnostic::Diagnostic;
use ibc_lexer::LexError;
use ibc_parse::ParseError;

/// A file that could not be carried through the front end.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum DriverError {
    #[error("{path}: {source}")]
    Lex {
        path: String,
        #[source]
        source: LexError,
    },
    #[error("{path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },
}

impl DriverError {
    pub fn path(&self) -> &str {
        match self {
            DriverError::Lex { path, .. } | DriverError::Parse { path, .. } => path,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            DriverError::Lex { source, .. } => source.to_diagnostic(),
            DriverError::Parse { source, .. } => source.to_diagnostic(),
        }
    }
}
