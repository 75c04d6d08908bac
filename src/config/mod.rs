mod loader;
mod structs;

#[cfg(test)]
mod tests;

pub use loader::{PROJECT_CONFIG_FILE, get_config_dir, load_config, load_config_from};
pub use structs::*;
