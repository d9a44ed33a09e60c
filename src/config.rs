use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

use crate::gateway::GatewayEnvironment;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub merchant_login_id: String,
    pub merchant_transaction_key: String,
    /// "sandbox" or "production".
    pub gateway_environment: String,
    /// Endpoint override for local testing; the environment default otherwise.
    pub gateway_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")?,
            merchant_login_id: env::var("MERCHANT_LOGIN_ID")?,
            merchant_transaction_key: env::var("MERCHANT_TRANSACTION_KEY")?,
            gateway_environment: env::var("GATEWAY_ENVIRONMENT")
                .unwrap_or_else(|_| "sandbox".to_string()),
            gateway_url: env::var("GATEWAY_URL").ok(),
        })
    }

    pub fn environment(&self) -> Result<GatewayEnvironment> {
        match self.gateway_environment.as_str() {
            "sandbox" => Ok(GatewayEnvironment::Sandbox),
            "production" => Ok(GatewayEnvironment::Production),
            other => anyhow::bail!("GATEWAY_ENVIRONMENT must be 'sandbox' or 'production', got '{other}'"),
        }
    }
}
