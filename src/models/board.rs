// Board identity: platform (host OS) and hardware (module, L4T, SoC) key/value tables

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInfo {
    #[serde(default)]
    pub platform: BTreeMap<String, String>,
    #[serde(default)]
    pub hardware: BTreeMap<String, String>,
}

impl BoardInfo {
    pub fn with_platform(mut self, key: &str, value: impl Into<String>) -> Self {
        self.platform.insert(key.to_string(), value.into());
        self
    }

    pub fn with_hardware(mut self, key: &str, value: impl Into<String>) -> Self {
        self.hardware.insert(key.to_string(), value.into());
        self
    }
}
