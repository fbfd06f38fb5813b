use rockets_domain::error::RocketError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("domain: {0}")]
    Domain(#[from] RocketError),

    #[error("validation: {0}")]
    Validation(String),

    #[error("rocket not found: {0}")]
    RocketNotFound(String),
}
