use std::{env, path::PathBuf};

use reqwest::Url;

use crate::{
    error::{AppError, AppResult},
    validation::ProductFormOptions,
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub token_path: PathBuf,
    pub product_form: ProductFormOptions,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let raw_url =
            env::var("API_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());
        let api_base_url = Self::parse_base_url(&raw_url)?;
        let token_path = env::var("TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".backoffice/token"));
        let require_references = env::var("PRODUCT_FORM_REFERENCES")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);
        Ok(Self {
            api_base_url,
            token_path,
            product_form: ProductFormOptions { require_references },
        })
    }

    pub fn with_base_url(raw_url: &str) -> AppResult<Self> {
        Ok(Self {
            api_base_url: Self::parse_base_url(raw_url)?,
            token_path: PathBuf::from(".backoffice/token"),
            product_form: ProductFormOptions::default(),
        })
    }

    fn parse_base_url(raw_url: &str) -> AppResult<Url> {
        let url = Url::parse(raw_url)
            .map_err(|e| AppError::Config(format!("API_BASE_URL `{raw_url}`: {e}")))?;
        if url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "API_BASE_URL `{raw_url}` cannot be used as a base"
            )));
        }
        Ok(url)
    }
}
