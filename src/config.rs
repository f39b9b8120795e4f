use anyhow::{Context, Result};
use std::env;

/// Service configuration, loaded once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub project_id: String,
    pub model_id: String,
    pub base_url: String,
    pub iam_url: String,
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_key: env::var("WATSONX_API_KEY")
                .context("WATSONX_API_KEY must be set in .env file")?,
            project_id: env::var("WATSONX_PROJECT_ID")
                .context("WATSONX_PROJECT_ID must be set in .env file")?,
            model_id: env::var("WATSONX_MODEL_ID")
                .unwrap_or_else(|_| "meta-llama/llama-3-2-90b-vision-instruct".to_string()),
            base_url: env::var("WATSONX_URL")
                .unwrap_or_else(|_| "https://us-south.ml.cloud.ibm.com".to_string()),
            iam_url: env::var("IAM_URL")
                .unwrap_or_else(|_| "https://iam.cloud.ibm.com/identity/token".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_applies_defaults() {
        env::set_var("WATSONX_API_KEY", "test-key");
        env::set_var("WATSONX_PROJECT_ID", "test-project");
        for key in ["WATSONX_MODEL_ID", "WATSONX_URL", "IAM_URL", "BIND_ADDR"] {
            env::remove_var(key);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "https://us-south.ml.cloud.ibm.com");
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }
}
