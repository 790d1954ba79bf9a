use crate::error::{Result, TrackerError};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Идентификатор наблюдаемого региона (присваивается платформой)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionId(pub u64);

impl RegionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REGION_{}", self.0)
    }
}

/// Дескриптор региона с поздней привязкой.
///
/// Хост создаёт трекер до того, как регион отрисован, и привязывает
/// конкретный регион не позднее первого прохода рендеринга. Трекер
/// держит только клон дескриптора и никогда его не мутирует.
#[derive(Debug, Clone, Default)]
pub struct RegionHandle {
    slot: Arc<RwLock<Option<RegionId>>>,
}

impl RegionHandle {
    pub fn unbound() -> Self {
        Self::default()
    }

    /// Привязать дескриптор к региону.
    ///
    /// Дескриптор привязывается ровно к одному региону: повторная привязка
    /// к другому региону - ошибка. Повторная привязка к тому же региону
    /// допускается (идемпотентна).
    pub fn bind(&self, region: RegionId) -> Result<()> {
        let mut slot = self.slot.write();
        match *slot {
            Some(bound) if bound != region => Err(TrackerError::RegionAlreadyBound(bound)),
            _ => {
                *slot = Some(region);
                Ok(())
            }
        }
    }

    pub fn get(&self) -> Option<RegionId> {
        *self.slot.read()
    }

    pub fn is_bound(&self) -> bool {
        self.slot.read().is_some()
    }
}
