//! Configuration module.

pub mod columns;
pub mod easing;
pub mod loader;
pub mod options;

pub use columns::{default_breakpoints, ColumnBreakpoint, ColumnCount, ColumnSpec, InvalidColumnCount};
pub use easing::{Easing, InvalidEasing};
pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, ConfigError, ConfigFile,
    OptionsPatch, ResolvedConfig,
};
pub use options::{
    AnimationConfig, LayoutConfig, MasonryOptions, SchedulingConfig, VirtualizationConfig,
};
