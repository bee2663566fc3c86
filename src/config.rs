use anyhow::{bail, Result};

const WORDPRESS_URL: &str = "WORDPRESS_URL";
const WORDPRESS_USERNAME: &str = "WORDPRESS_USERNAME";
const WORDPRESS_APP_PASSWORD: &str = "WORDPRESS_APP_PASSWORD";
const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

#[derive(Debug, Clone)]
pub struct WordPressConfig {
    pub url: String,
    pub username: String,
    pub app_password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub wordpress: WordPressConfig,
    /// Only required when image generation is on.
    pub openai_api_key: Option<String>,
}

impl Config {
    pub fn from_env(images_enabled: bool) -> Result<Self> {
        Self::from_lookup(images_enabled, |key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as missing; every missing
    /// key is reported at once.
    pub fn from_lookup<F>(images_enabled: bool, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut required = vec![WORDPRESS_URL, WORDPRESS_USERNAME, WORDPRESS_APP_PASSWORD];
        if images_enabled {
            required.push(OPENAI_API_KEY);
        }

        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let missing: Vec<&str> = required.into_iter().filter(|k| get(*k).is_none()).collect();
        if !missing.is_empty() {
            bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        Ok(Self {
            wordpress: WordPressConfig {
                url: get(WORDPRESS_URL).unwrap_or_default(),
                username: get(WORDPRESS_USERNAME).unwrap_or_default(),
                app_password: get(WORDPRESS_APP_PASSWORD).unwrap_or_default(),
            },
            openai_api_key: if images_enabled { get(OPENAI_API_KEY) } else { None },
        })
    }
}
