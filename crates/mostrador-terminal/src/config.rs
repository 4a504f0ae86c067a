//! # Terminal Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MOSTRADOR_TERMINAL_ID=caja-2                                       │
//! │     MOSTRADOR_WAREHOUSE_ID=bodega-norte                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/pos/terminal.toml (Linux)                                │
//! │     ~/Library/Application Support/co.mostrador.pos/terminal.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     19% VAT, walk-in customer, upsell on with 1.5 s quiet period       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [terminal]
//! id = "caja-1"
//! name = "Caja principal"
//! warehouse_id = "bodega-1"
//!
//! [pricing]
//! vat_rate_bps = 1900
//!
//! [customer]
//! default_customer_id = "consumidor-final"
//! default_customer_name = "Consumidor Final"
//!
//! [upsell]
//! enabled = true
//! quiet_period_ms = 1500
//!
//! [currency]
//! code = "COP"
//! symbol = "$"
//! decimals = 0
//! ```

use std::path::PathBuf;
use std::time::Duration;

use mostrador_core::validation::validate_identifier;
use mostrador_core::{Money, TaxRate, VAT_RATE_BPS, WALK_IN_CUSTOMER_ID, WALK_IN_CUSTOMER_NAME};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{TerminalError, TerminalResult};

// =============================================================================
// Sections
// =============================================================================

/// Which register this is and which warehouse it sells from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalSection {
    pub id: String,

    #[serde(default = "default_terminal_name")]
    pub name: String,

    /// Warehouse whose stock the catalog browser filters on.
    pub warehouse_id: String,
}

fn default_terminal_name() -> String {
    "Caja principal".to_string()
}

impl Default for TerminalSection {
    fn default() -> Self {
        TerminalSection {
            id: "caja-1".to_string(),
            name: default_terminal_name(),
            warehouse_id: "bodega-1".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSection {
    /// VAT in basis points (1900 = 19%).
    #[serde(default = "default_vat_rate_bps")]
    pub vat_rate_bps: u32,
}

fn default_vat_rate_bps() -> u32 {
    VAT_RATE_BPS
}

impl Default for PricingSection {
    fn default() -> Self {
        PricingSection {
            vat_rate_bps: default_vat_rate_bps(),
        }
    }
}

/// Customer every new tab is bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSection {
    #[serde(default = "default_customer_id")]
    pub default_customer_id: String,

    #[serde(default = "default_customer_name")]
    pub default_customer_name: String,
}

fn default_customer_id() -> String {
    WALK_IN_CUSTOMER_ID.to_string()
}

fn default_customer_name() -> String {
    WALK_IN_CUSTOMER_NAME.to_string()
}

impl Default for CustomerSection {
    fn default() -> Self {
        CustomerSection {
            default_customer_id: default_customer_id(),
            default_customer_name: default_customer_name(),
        }
    }
}

/// AI upsell hints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsellSection {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How long the bill must stay unchanged before the advisor is asked.
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_quiet_period_ms() -> u64 {
    1500
}

impl Default for UpsellSection {
    fn default() -> Self {
        UpsellSection {
            enabled: true,
            quiet_period_ms: default_quiet_period_ms(),
        }
    }
}

/// Display-only currency settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencySection {
    /// ISO 4217 code.
    #[serde(default = "default_currency_code")]
    pub code: String,

    #[serde(default = "default_currency_symbol")]
    pub symbol: String,

    #[serde(default)]
    pub decimals: u32,
}

fn default_currency_code() -> String {
    "COP".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for CurrencySection {
    fn default() -> Self {
        CurrencySection {
            code: default_currency_code(),
            symbol: default_currency_symbol(),
            decimals: 0,
        }
    }
}

// =============================================================================
// Terminal Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerminalConfig {
    #[serde(default)]
    pub terminal: TerminalSection,

    #[serde(default)]
    pub pricing: PricingSection,

    #[serde(default)]
    pub customer: CustomerSection,

    #[serde(default)]
    pub upsell: UpsellSection,

    #[serde(default)]
    pub currency: CurrencySection,
}

impl TerminalConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (terminal.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> TerminalResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading terminal config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load terminal config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> TerminalResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| TerminalError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TerminalError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)
            .map_err(|e| TerminalError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Terminal config saved");
        Ok(())
    }

    pub fn validate(&self) -> TerminalResult<()> {
        validate_identifier("terminal id", &self.terminal.id)
            .map_err(|e| TerminalError::InvalidConfig(e.to_string()))?;
        validate_identifier("warehouse id", &self.terminal.warehouse_id)
            .map_err(|e| TerminalError::InvalidConfig(e.to_string()))?;
        validate_identifier("default customer id", &self.customer.default_customer_id)
            .map_err(|e| TerminalError::InvalidConfig(e.to_string()))?;

        if self.pricing.vat_rate_bps > 10_000 {
            return Err(TerminalError::InvalidConfig(format!(
                "vat_rate_bps must be at most 10000, got {}",
                self.pricing.vat_rate_bps
            )));
        }

        if self.currency.decimals > 4 {
            return Err(TerminalError::InvalidConfig(
                "currency decimals must be at most 4".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(id) = std::env::var("MOSTRADOR_TERMINAL_ID") {
            debug!(terminal_id = %id, "Overriding terminal ID from environment");
            self.terminal.id = id;
        }

        if let Ok(name) = std::env::var("MOSTRADOR_TERMINAL_NAME") {
            self.terminal.name = name;
        }

        if let Ok(warehouse) = std::env::var("MOSTRADOR_WAREHOUSE_ID") {
            debug!(warehouse_id = %warehouse, "Overriding warehouse from environment");
            self.terminal.warehouse_id = warehouse;
        }

        // Percent, e.g. "19"
        if let Ok(rate) = std::env::var("MOSTRADOR_VAT_RATE") {
            match rate.parse::<f64>() {
                Ok(pct) if pct >= 0.0 => {
                    self.pricing.vat_rate_bps = TaxRate::from_percentage(pct).bps();
                }
                _ => warn!(rate = %rate, "Ignoring invalid MOSTRADOR_VAT_RATE"),
            }
        }

        if let Ok(enabled) = std::env::var("MOSTRADOR_UPSELL_ENABLED") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.upsell.enabled = true,
                "0" | "false" | "no" | "off" => self.upsell.enabled = false,
                _ => warn!(value = %enabled, "Ignoring invalid MOSTRADOR_UPSELL_ENABLED"),
            }
        }

        if let Ok(ms) = std::env::var("MOSTRADOR_UPSELL_QUIET_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                self.upsell.quiet_period_ms = ms;
            }
        }
    }

    /// `terminal.toml` in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("co", "mostrador", "pos")
            .map(|dirs| dirs.config_dir().join("terminal.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn vat_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.pricing.vat_rate_bps)
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.upsell.quiet_period_ms)
    }

    /// Formats money for display with thousands separators.
    ///
    /// ## Example
    /// ```rust
    /// use mostrador_core::Money;
    /// use mostrador_terminal::config::TerminalConfig;
    ///
    /// let config = TerminalConfig::default();
    /// assert_eq!(config.format_currency(Money::from_units(85_680)), "$85.680");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let rounded = amount
            .amount()
            .round_dp_with_strategy(self.currency.decimals, RoundingStrategy::MidpointAwayFromZero);
        let negative = rounded < Decimal::ZERO;
        let text = rounded.abs().to_string();

        let (whole, frac) = match text.split_once('.') {
            Some((w, f)) => (w.to_string(), f.to_string()),
            None => (text, String::new()),
        };

        // Colombian style: "." groups thousands, "," separates decimals
        let mut grouped = String::new();
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&self.currency.symbol);
        out.push_str(&grouped);
        if self.currency.decimals > 0 {
            let width = self.currency.decimals as usize;
            out.push(',');
            out.push_str(&format!("{:0<width$}", frac, width = width));
        }
        out
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
