use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("invalid behaviour settings: {0}")]
    Config(String),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
