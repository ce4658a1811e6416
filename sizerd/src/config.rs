//! Daemon configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use crate::error::{DaemonError, DaemonResult};
use rust_decimal::Decimal;
use sizer_connectors::{COINGECKO_API_URL, DEFAULT_VS_CURRENCY, REQUEST_TIMEOUT_SECS};
use sizer_domain::CalculatorInputs;
use std::env;
use std::str::FromStr;
use std::time::Duration;

// =============================================================================
// Configuration
// =============================================================================

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Calculator session defaults
    pub calculator: CalculatorConfig,

    /// Price feed configuration
    pub feed: FeedConfig,

    /// Environment (test, development, production)
    pub environment: Environment,
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

/// Initial values of the calculator session.
#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    /// Starting account balance
    pub default_account_balance: Decimal,
    /// Starting risk percent (1 = 1%)
    pub default_risk_percent: Decimal,
}

/// Price feed configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// API root of the price feed
    pub base_url: String,
    /// Quote currency
    pub vs_currency: String,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Environment type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Test environment (uses the stub price feed)
    Test,
    /// Development environment
    Development,
    /// Production environment
    Production,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> DaemonResult<Self> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        Ok(Self {
            api: Self::load_api_config()?,
            calculator: Self::load_calculator_config()?,
            feed: Self::load_feed_config()?,
            environment: Self::load_environment()?,
        })
    }

    /// Create test configuration.
    pub fn test() -> Self {
        Self {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            environment: Environment::Test,
            ..Self::default()
        }
    }

    /// Starting inputs of the calculator session.
    pub fn initial_inputs(&self) -> CalculatorInputs {
        CalculatorInputs {
            account_balance: self.calculator.default_account_balance,
            risk_percentage: self.calculator.default_risk_percent,
            ..CalculatorInputs::default()
        }
    }

    fn load_environment() -> DaemonResult<Environment> {
        let env_str = env::var("SIZER_ENV").unwrap_or_else(|_| "development".to_string());
        env_str.parse()
    }

    fn load_api_config() -> DaemonResult<ApiConfig> {
        let host = env::var("SIZER_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port_str = env::var("SIZER_API_PORT").unwrap_or_else(|_| "8080".to_string());

        let port = port_str
            .parse::<u16>()
            .map_err(|_| DaemonError::Config(format!("Invalid SIZER_API_PORT: {}", port_str)))?;

        Ok(ApiConfig { host, port })
    }

    fn load_calculator_config() -> DaemonResult<CalculatorConfig> {
        let defaults = CalculatorInputs::default();

        Ok(CalculatorConfig {
            default_account_balance: Self::load_decimal_env(
                "SIZER_DEFAULT_ACCOUNT_BALANCE",
                defaults.account_balance,
            )?,
            default_risk_percent: Self::load_decimal_env(
                "SIZER_DEFAULT_RISK_PERCENT",
                defaults.risk_percentage,
            )?,
        })
    }

    fn load_feed_config() -> DaemonResult<FeedConfig> {
        let base_url =
            env::var("SIZER_PRICE_FEED_URL").unwrap_or_else(|_| COINGECKO_API_URL.to_string());
        let vs_currency =
            env::var("SIZER_VS_CURRENCY").unwrap_or_else(|_| DEFAULT_VS_CURRENCY.to_string());

        let timeout_secs = match env::var("SIZER_FEED_TIMEOUT_SECS") {
            Ok(val) => val.parse::<u64>().map_err(|_| {
                DaemonError::Config(format!("Invalid SIZER_FEED_TIMEOUT_SECS value: {}", val))
            })?,
            Err(_) => REQUEST_TIMEOUT_SECS,
        };

        Ok(FeedConfig {
            base_url,
            vs_currency,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    fn load_decimal_env(key: &str, default: Decimal) -> DaemonResult<Decimal> {
        match env::var(key) {
            Ok(val) => Decimal::from_str(val.trim())
                .map_err(|_| DaemonError::Config(format!("Invalid {} value: {}", key, val))),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let defaults = CalculatorInputs::default();
        Self {
            api: ApiConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            calculator: CalculatorConfig {
                default_account_balance: defaults.account_balance,
                default_risk_percent: defaults.risk_percentage,
            },
            feed: FeedConfig {
                base_url: COINGECKO_API_URL.to_string(),
                vs_currency: DEFAULT_VS_CURRENCY.to_string(),
                timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            },
            environment: Environment::Development,
        }
    }
}

impl FromStr for Environment {
    type Err = DaemonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "test" => Ok(Environment::Test),
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(DaemonError::Config(format!(
                "Invalid SIZER_ENV: {}. Expected: test, development, production",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Test => write!(f, "test"),
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.api.port, 8080);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.feed.base_url, COINGECKO_API_URL);
        assert_eq!(config.feed.vs_currency, "usd");
        assert_eq!(config.feed.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_test_config() {
        let config = Config::test();

        assert_eq!(config.api.port, 0);
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.environment, Environment::Test);
    }

    #[test]
    fn test_initial_inputs() {
        let mut config = Config::default();
        assert_eq!(config.initial_inputs(), CalculatorInputs::default());

        config.calculator.default_account_balance = dec!(25000);
        config.calculator.default_risk_percent = dec!(0.5);
        let inputs = config.initial_inputs();
        assert_eq!(inputs.account_balance, dec!(25000));
        assert_eq!(inputs.risk_percentage, dec!(0.5));
        assert!(inputs.entry_price.is_zero());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("TEST".parse::<Environment>().unwrap(), Environment::Test);
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert!(matches!("staging".parse::<Environment>(), Err(DaemonError::Config(_))));
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Test.to_string(), "test");
        assert_eq!(Environment::Development.to_string(), "development");
        assert_eq!(Environment::Production.to_string(), "production");
    }
}
