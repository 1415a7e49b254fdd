/// Application configuration - Gateway
mod config;

pub use config::{
    global_config_path, init_config, load_config, save_config, CatalogConfig, Config,
    StorageConfig,
};
