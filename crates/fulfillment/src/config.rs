//! Demo configuration loaded from environment variables.

/// Configuration for the checkout demo binary.
///
/// Reads from environment variables:
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DEMO_STOCK` — seeded stock per product (default: `50`)
/// - `DEMO_QUANTITY` — quantity ordered in the demo (default: `2`)
#[derive(Debug, Clone)]
pub struct Config {
    pub log_filter: String,
    pub demo_stock: u32,
    pub demo_quantity: u32,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            log_filter: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            demo_stock: std::env::var("DEMO_STOCK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            demo_quantity: std::env::var("DEMO_QUANTITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            demo_stock: 50,
            demo_quantity: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.demo_stock, 50);
        assert_eq!(config.demo_quantity, 2);
    }
}
