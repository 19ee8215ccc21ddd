use std::{net::SocketAddr, path::Path};

use anyhow::Context;

use crate::{
    card::CarouselItem,
    rotation::{EngineSettings, Smoothing},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvConfig {
    pub github_token: Option<String>,
    pub github_api_url: String,
    pub address: SocketAddr,
    pub relay_url: String,
    pub carousel_path: String,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            github_api_url: Self::GITHUB_API_URL.to_string(),
            address: Self::ADDRESS,
            relay_url: Self::RELAY_URL.to_string(),
            carousel_path: Self::CAROUSEL_PATH.to_string(),
        }
    }
}

impl EnvConfig {
    const GITHUB_API_URL: &'static str = "https://api.github.com";
    const ADDRESS: SocketAddr = SocketAddr::V4(std::net::SocketAddrV4::new(
        std::net::Ipv4Addr::LOCALHOST,
        5000,
    ));
    const RELAY_URL: &'static str = "http://127.0.0.1:5000";
    const CAROUSEL_PATH: &'static str = "carousel.yaml";

    pub fn load_from_env() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    pub fn load_with(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get_env = |key: &str| lookup(key).filter(|s| !s.trim().is_empty());

        let address = match get_env("SPINSTATS_ADDRESS") {
            Some(addr) => addr
                .parse()
                .with_context(|| anyhow::anyhow!("`SPINSTATS_ADDRESS` must be an address, got `{addr}`"))?,
            None => Self::ADDRESS,
        };

        Ok(Self {
            github_token: get_env("GITHUB_TOKEN"),
            github_api_url: get_env("GITHUB_API_URL")
                .unwrap_or_else(|| Self::GITHUB_API_URL.to_string()),
            address,
            relay_url: get_env("SPINSTATS_RELAY_URL")
                .unwrap_or_else(|| Self::RELAY_URL.to_string()),
            carousel_path: get_env("SPINSTATS_CAROUSEL")
                .unwrap_or_else(|| Self::CAROUSEL_PATH.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselConfig {
    pub width: f32,
    pub height: f32,
    pub sensitivity: f32,
    pub frame_independent: bool,
    pub max_input_step: Option<f32>,
    pub items: Vec<CarouselItem>,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            width: 190.0,
            height: 254.0,
            sensitivity: EngineSettings::default().sensitivity,
            frame_independent: false,
            max_input_step: None,
            items: vec![],
        }
    }
}

impl CarouselConfig {
    const BUNDLED: &'static str = include_str!("../data/carousel.yaml");

    pub fn bundled() -> anyhow::Result<Self> {
        Self::from_yaml(Self::BUNDLED).context("bundled carousel")
    }

    pub fn from_yaml(data: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(data)?;
        anyhow::ensure!(
            config.width > 0.0 && config.height > 0.0,
            "card size must be positive"
        );
        Ok(config)
    }

    /// Reads the carousel from `path`, falling back to the bundled one when
    /// there's no such file.
    pub fn load_or_bundled(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(data) => {
                log::info!("loading carousel from {}", path.display());
                Self::from_yaml(&data).with_context(|| anyhow::anyhow!("in {}", path.display()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{} not found, using the bundled carousel", path.display());
                Self::bundled()
            }
            Err(err) => Err(err).with_context(|| anyhow::anyhow!("cannot read {}", path.display())),
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        let smoothing = if self.frame_independent {
            Smoothing::frame_independent()
        } else {
            Smoothing::default()
        };

        EngineSettings {
            sensitivity: self.sensitivity,
            smoothing,
            max_input_step: self.max_input_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map = pairs.iter().copied().collect::<HashMap<_, _>>();
        move |key| map.get(key).map(|s| s.to_string())
    }

    #[test]
    fn env_defaults() {
        let config = EnvConfig::load_with(lookup(&[])).unwrap();
        assert_eq!(config, EnvConfig::default());
        assert_eq!(config.address.to_string(), "127.0.0.1:5000");
        assert_eq!(config.github_api_url, "https://api.github.com");
        assert!(config.github_token.is_none());
    }

    #[test]
    fn env_overrides() {
        let config = EnvConfig::load_with(lookup(&[
            ("GITHUB_TOKEN", "hunter2"),
            ("SPINSTATS_ADDRESS", "0.0.0.0:8080"),
            ("SPINSTATS_RELAY_URL", "http://relay:8080"),
            ("SPINSTATS_CAROUSEL", "demo.yaml"),
        ]))
        .unwrap();

        assert_eq!(config.github_token.as_deref(), Some("hunter2"));
        assert_eq!(config.address.port(), 8080);
        assert_eq!(config.relay_url, "http://relay:8080");
        assert_eq!(config.carousel_path, "demo.yaml");
    }

    #[test]
    fn empty_token_is_no_token() {
        let config = EnvConfig::load_with(lookup(&[("GITHUB_TOKEN", " ")])).unwrap();
        assert!(config.github_token.is_none());
    }

    #[test]
    fn bad_address() {
        let err = EnvConfig::load_with(lookup(&[("SPINSTATS_ADDRESS", "localhost")])).unwrap_err();
        assert!(err.to_string().contains("SPINSTATS_ADDRESS"));
    }

    #[test]
    fn bundled_carousel() {
        let config = CarouselConfig::bundled().unwrap();
        assert_eq!(config.width, 190.0);
        assert_eq!(config.height, 254.0);
        assert_eq!(config.items.len(), 8);
        assert!(config.items.iter().all(|item| item.back.is_some()));
        assert!(config
            .items
            .iter()
            .all(|item| item.image.as_deref().map_or(false, |url| url.starts_with("https://"))));
    }

    #[test]
    fn carousel_defaults() {
        let config = CarouselConfig::from_yaml("items: []").unwrap();
        assert_eq!(config, CarouselConfig::default());
        assert_eq!(config.sensitivity, 0.15);

        let settings = config.engine_settings();
        assert_eq!(settings.max_input_step, None);
        assert_eq!(settings.smoothing, Smoothing::default());
    }

    #[test]
    fn carousel_engine_settings() {
        let config = CarouselConfig::from_yaml(
            "sensitivity: 0.3\nframeIndependent: true\nmaxInputStep: 40\n",
        )
        .unwrap();
        let settings = config.engine_settings();
        assert_eq!(settings.sensitivity, 0.3);
        assert_eq!(settings.max_input_step, Some(40.0));
        assert_eq!(settings.smoothing, Smoothing::frame_independent());
    }

    #[test]
    fn carousel_rejects_bad_size() {
        assert!(CarouselConfig::from_yaml("width: 0").is_err());
    }

    #[test]
    fn missing_file_uses_bundled() {
        let config = CarouselConfig::load_or_bundled("/definitely/not/here.yaml").unwrap();
        assert_eq!(config.items.len(), 8);
    }
}
