//! Nullable app registry.

use parking_lot::RwLock;
use passport_personhood::AppRegistry;
use passport_types::{AppId, SecurityLevel};
use std::collections::HashMap;

/// Apps registered with a security level. Unknown apps are `None`.
#[derive(Debug, Default)]
pub struct NullAppRegistry {
    levels: RwLock<HashMap<AppId, SecurityLevel>>,
}

impl NullAppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, app: AppId, level: SecurityLevel) {
        self.levels.write().insert(app, level);
    }
}

impl AppRegistry for NullAppRegistry {
    fn security_level_of(&self, app: &AppId) -> SecurityLevel {
        self.levels.read().get(app).copied().unwrap_or_default()
    }
}
