use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("flow file parse error: {0}")]
    Parse(String),

    #[error("flow {0:?} references unknown route {1:?}")]
    UnknownRoute(String, String),

    #[error("flow {0:?} references unknown vType {1:?}")]
    UnknownVType(String, String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type FlowResult<T> = Result<T, FlowError>;
