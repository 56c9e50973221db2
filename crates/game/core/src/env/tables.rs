use crate::config::EngineTables;

/// Balance and tuning parameters for the engine.
pub trait TablesOracle: Send + Sync {
    fn tables(&self) -> &EngineTables;
}

impl TablesOracle for EngineTables {
    fn tables(&self) -> &EngineTables {
        self
    }
}
