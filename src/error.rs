use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("legend index {index} is out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no legend item is selected")]
    NoSelection,

    #[error("unknown shape id: {0}")]
    UnknownShape(u64),
}
