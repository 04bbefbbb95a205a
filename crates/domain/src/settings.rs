use serde::{Deserialize, Serialize};

use crate::{ChartSettings, ReadError, UpdateError, WarmupCriteria};

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, ReadError>;
    async fn set_settings(&self, settings: Settings) -> Result<(), UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    /// Returns the default settings if none have been stored yet.
    async fn read_settings(&self) -> Result<Settings, ReadError>;
    async fn write_settings(&self, settings: &Settings) -> Result<(), UpdateError>;
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub chart: ChartSettings,
    pub warmup: WarmupCriteria,
}
