use thiserror::Error;

/// Errors from the object storage existence check.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object s3://{bucket}/{key} not found")]
    NotFound { bucket: String, key: String },
    #[error("could not check s3://{bucket}/{key}: {message}")]
    Other {
        bucket: String,
        key: String,
        message: String,
    },
}

/// Errors from submitting a job to the transcoder.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("transcoder rejected the job: {0}")]
    Service(String),
    #[error("transcoder accepted the job but returned no job id")]
    MissingJobId,
}

/// Why a single upload record could not be turned into a job.
#[derive(Debug, Error)]
pub enum StitchError {
    #[error("record is missing the bucket name or object key")]
    IncompleteRecord,
    #[error("unable to infer video type for key {0}")]
    MalformedKey(String),
    #[error("no folder name specified for key {0}")]
    NoDirectory(String),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}
