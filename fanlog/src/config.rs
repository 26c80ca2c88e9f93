use derive_from_env::FromEnv;
use fanlog_core::{Error, Level, Result, SizeRotationConfig};

/// Logger settings read from `FANLOG_*` environment variables.
#[derive(FromEnv)]
#[from_env(prefix = "FANLOG")]
#[allow(non_snake_case)]
pub struct FanlogConfig {
    #[from_env(default = "Logger")]
    pub COMPONENT: String,
    #[from_env(default = "INFO")]
    pub LEVEL: String,
    /// Rotating log file; empty disables file output.
    #[from_env(default = "")]
    pub FILE: String,
    #[from_env(default = "10485760")]
    pub MAX_BYTES: u64,
    #[from_env(default = "5")]
    pub MAX_BACKUPS: u32,
}

impl FanlogConfig {
    pub fn load() -> Result<Self> {
        Self::from_env().map_err(|err| Error::Config(format!("{err:?}")))
    }

    pub fn level(&self) -> Result<Level> {
        self.LEVEL.parse()
    }

    /// Component name, only when `FANLOG_COMPONENT` is set.
    pub fn explicit_component(&self) -> Option<&str> {
        is_set("COMPONENT").then_some(self.COMPONENT.as_str())
    }

    /// Threshold, only when `FANLOG_LEVEL` is set.
    pub fn explicit_level(&self) -> Result<Option<Level>> {
        if is_set("LEVEL") {
            self.level().map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn rotation(&self) -> Option<SizeRotationConfig> {
        let path = self.FILE.trim();
        if path.is_empty() {
            return None;
        }
        Some(SizeRotationConfig::new(
            path,
            self.MAX_BYTES,
            self.MAX_BACKUPS,
        ))
    }
}

fn is_set(field: &str) -> bool {
    std::env::var_os(format!("FANLOG_{field}")).is_some()
}
