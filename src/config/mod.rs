// Configuration module
// Resolves the device target for the CLI from flags, environment and file

mod loader;
mod settings;

pub use loader::{
    default_config_path, load_config, load_settings, resolve, ResolvedConfig, TargetOverrides,
    HOST_ENV_VAR, PORT_ENV_VAR,
};
pub use settings::{ClientSettings, DeviceSettings, Settings};
