use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::validation::ImagePolicy;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the recipe server
    pub server: String,
    pub endpoints: EndpointConfig,
    /// Give up on a create request after this many seconds. 0 waits forever.
    pub submit_timeout_secs: u64,
    pub images: ImagePolicy,
    /// Session cookie sent with every request, if the server uses one
    pub session_cookie: Option<SessionCookie>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: "http://localhost:8080".into(),
            endpoints: EndpointConfig::default(),
            submit_timeout_secs: 30,
            images: ImagePolicy::default(),
            session_cookie: None,
        }
    }
}

impl Config {
    /// Load the configuration from a YAML file.
    pub fn load(yml_path: &str) -> anyhow::Result<Self> {
        let yml = std::fs::read_to_string(yml_path)
            .with_context(|| format!("Reading config file {}", yml_path))?;
        let config = serde_yaml::from_str(&yml).context("Parsing config file")?;
        Ok(config)
    }

    /// How long to wait for a create request, or `None` for no limit.
    pub fn submit_timeout(&self) -> Option<Duration> {
        (self.submit_timeout_secs > 0).then(|| Duration::from_secs(self.submit_timeout_secs))
    }

    /// Join an endpoint path onto the server URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub ingredients: String,
    pub tags: String,
    pub current_user: String,
    pub create_recipe: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            ingredients: "/api/recipe/get/ingredients".into(),
            tags: "/api/recipe/get/tags".into(),
            current_user: "/api/auth/user".into(),
            create_recipe: "/api/recipe/create/recipe".into(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub value: String,
}
