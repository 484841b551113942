use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RfError {
    #[error("missing required parameter '{0}'")]
    Builder(&'static str),

    #[error("envelope requires at least one point")]
    Points,
}
