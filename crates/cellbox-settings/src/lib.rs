//! CellBox Settings Crate
//!
//! Holds the immutable [`Configuration`] record every generation run is
//! parameterised by, its named presets, and TOML/JSON persistence.

pub mod config;
pub mod error;

pub use config::{
    BonusHoleSettings, BonusPlacement, CellSettings, Configuration, FingerSettings, KerfSettings,
    PanelSettings, Preset, ProcessSettings, SideHoleMode, SideHoleSettings, VentSettings,
    WallGaps, WallSettings,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
