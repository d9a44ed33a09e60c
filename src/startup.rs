use anyhow::{Context, Result};
use sqlx::PgPool;
use std::time::Duration;

use crate::config::Config;

pub struct ValidationReport {
    pub environment: bool,
    pub database: bool,
    pub gateway: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.environment && self.database && self.gateway
    }

    pub fn print(&self) {
        println!("\n=== Startup Validation Report ===");
        println!("Environment Variables: {}", status(self.environment));
        println!("Database Connectivity: {}", status(self.database));
        println!("Gateway Connectivity:  {}", status(self.gateway));

        if !self.errors.is_empty() {
            println!("\nErrors:");
            for error in &self.errors {
                println!("  ❌ {}", error);
            }
        }

        println!("\nOverall Status: {}", if self.is_valid() { "✅ PASS" } else { "❌ FAIL" });
        println!("=================================\n");
    }
}

fn status(ok: bool) -> &'static str {
    if ok { "✅ OK" } else { "❌ FAIL" }
}

pub async fn validate_environment(config: &Config, pool: &PgPool) -> Result<ValidationReport> {
    let mut report = ValidationReport {
        environment: true,
        database: true,
        gateway: true,
        errors: Vec::new(),
    };

    if let Err(e) = validate_env_vars(config) {
        report.environment = false;
        report.errors.push(format!("Environment: {}", e));
    }

    if let Err(e) = validate_database(pool).await {
        report.database = false;
        report.errors.push(format!("Database: {}", e));
    }

    if let Err(e) = validate_gateway(config).await {
        report.gateway = false;
        report.errors.push(format!("Gateway: {}", e));
    }

    Ok(report)
}

fn validate_env_vars(config: &Config) -> Result<()> {
    if config.database_url.is_empty() {
        anyhow::bail!("DATABASE_URL is empty");
    }
    if config.merchant_login_id.is_empty() {
        anyhow::bail!("MERCHANT_LOGIN_ID is empty");
    }
    if config.merchant_transaction_key.is_empty() {
        anyhow::bail!("MERCHANT_TRANSACTION_KEY is empty");
    }
    if config.server_port == 0 {
        anyhow::bail!("SERVER_PORT must be greater than 0");
    }

    config.environment()?;

    if let Some(gateway_url) = &config.gateway_url {
        url::Url::parse(gateway_url).context("GATEWAY_URL is not a valid URL")?;
    }

    Ok(())
}

async fn validate_database(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .context("Failed to connect to database")?;

    // Check if migrations are up to date
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .context("Failed to check migrations table")?;

    if applied == 0 {
        anyhow::bail!("No migrations applied");
    }

    Ok(())
}

async fn validate_gateway(config: &Config) -> Result<()> {
    let endpoint = match &config.gateway_url {
        Some(url) => url.clone(),
        None => config.environment()?.endpoint().to_string(),
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    // The gateway only speaks POST; any HTTP answer at all proves the
    // endpoint is reachable.
    client
        .get(&endpoint)
        .send()
        .await
        .context("Failed to connect to payment gateway")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            server_port: 3000,
            database_url: "postgres://localhost:5432/payportal".to_string(),
            merchant_login_id: "login".to_string(),
            merchant_transaction_key: "key".to_string(),
            gateway_environment: "sandbox".to_string(),
            gateway_url: None,
        }
    }

    #[test]
    fn test_validate_env_vars_empty_database_url() {
        let config = Config {
            database_url: String::new(),
            ..base_config()
        };

        assert!(validate_env_vars(&config).is_err());
    }

    #[test]
    fn test_validate_env_vars_missing_credentials() {
        let config = Config {
            merchant_transaction_key: String::new(),
            ..base_config()
        };

        assert!(validate_env_vars(&config).is_err());
    }

    #[test]
    fn test_validate_env_vars_invalid_gateway_url() {
        let config = Config {
            gateway_url: Some("not-a-url".to_string()),
            ..base_config()
        };

        assert!(validate_env_vars(&config).is_err());
    }

    #[test]
    fn test_validate_env_vars_accepts_complete_config() {
        assert!(validate_env_vars(&base_config()).is_ok());
    }
}
