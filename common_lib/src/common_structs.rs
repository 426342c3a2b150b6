//! common_structs.rs

use strum::{Display, EnumString};

#[derive(Debug, Display, EnumString, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum ConfigLocation{
    Docker,
    NotDocker,
}

impl ConfigLocation {
    /// read CONFIG_LOCATION; anything unrecognized means we're running outside docker
    pub fn from_env() -> ConfigLocation {
        std::env::var("CONFIG_LOCATION")
            .ok()
            .and_then(|s| s.parse::<ConfigLocation>().ok())
            .unwrap_or(ConfigLocation::NotDocker)
    }
}
