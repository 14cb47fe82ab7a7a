use sea_orm::{DbErr, SqlErr, TransactionError};

/// An error from the board's data layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying database error
    #[error(transparent)]
    Db(#[from] DbErr),
    /// A lookup that must match a row matched none
    #[error("no {entity} found for {lookup}")]
    NotFound {
        entity: &'static str,
        lookup: String,
    },
    /// A lookup that must match exactly one row matched several
    #[error("{lookup} is ambiguous: more than one {entity} matched")]
    Ambiguous {
        entity: &'static str,
        lookup: String,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn not_found(entity: &'static str, lookup: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            lookup: lookup.into(),
        }
    }

    pub(crate) fn ambiguous(entity: &'static str, lookup: impl Into<String>) -> Self {
        Self::Ambiguous {
            entity,
            lookup: lookup.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Self::Ambiguous { .. })
    }

    /// Classify the underlying database error, if any: unique vs foreign key
    /// constraint violations and so on.
    pub fn sql_err(&self) -> Option<SqlErr> {
        match self {
            Self::Db(err) => err.sql_err(),
            _ => None,
        }
    }
}

impl From<TransactionError<Error>> for Error {
    fn from(err: TransactionError<Error>) -> Self {
        match err {
            TransactionError::Connection(err) => Self::Db(err),
            TransactionError::Transaction(err) => err,
        }
    }
}
