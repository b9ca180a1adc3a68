pub mod app_config;
pub mod config;
pub mod delivery;
pub mod regions;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use delivery::{token_prefix, DeliveryRate, FeeParsing, ProviderCredential};
pub use regions::{
    chef_lieu_commune, find_region, region_names, Region, CHEF_LIEU_COMMUNES, REGIONS,
};
