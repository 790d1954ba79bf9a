use crate::events::RegionId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Трекер уже запущен")]
    AlreadyStarted,

    #[error("Регион уже привязан к дескриптору: {0}")]
    RegionAlreadyBound(RegionId),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl TrackerError {
    #[allow(dead_code)]
    pub fn internal<T>(msg: impl Into<String>) -> Result<T> {
        Err(TrackerError::Internal(msg.into()))
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
