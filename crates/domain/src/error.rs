#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum UpdateError {
    #[error("conflict")]
    Conflict,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("no connection")]
    NoConnection,
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

/// Failure of the warmup classification of a single exercise.
///
/// No warmup flag of the exercise has been changed when this error is returned.
#[derive(thiserror::Error, Debug)]
pub enum ClassificationError {
    #[error("failed to read sets: {0}")]
    Read(#[from] ReadError),
    #[error("failed to write warmup flags: {0}")]
    Update(#[from] UpdateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_error_display() {
        assert_eq!(
            ClassificationError::from(ReadError::NotFound).to_string(),
            "failed to read sets: not found"
        );
        assert_eq!(
            ClassificationError::from(UpdateError::Storage(StorageError::NoConnection))
                .to_string(),
            "failed to write warmup flags: no connection"
        );
    }
}
