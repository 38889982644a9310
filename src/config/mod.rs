//! Configuration loading: defaults, environment overrides, CLI overrides
//!
//! Layering follows the usual precedence: built-in defaults, then `RTT_*`
//! environment variables (a `.env` file is honored), then explicit CLI
//! arguments, then validation.

use crate::cli::{CommonArgs, FleetArgs};
use crate::defaults;
use crate::error::{AppError, Result};
use crate::models::{FleetConfig, SweepConfig};

/// Parse a comma-separated payload size list, e.g. `"1,64,1024"`.
pub fn parse_size_list(input: &str) -> Result<Vec<usize>> {
    let sizes: Vec<usize> = input
        .split(',')
        .map(|token| token.trim())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<usize>()
                .map_err(|_| AppError::parse(format!("invalid payload size: '{}'", token)))
        })
        .collect::<Result<_>>()?;

    if sizes.is_empty() {
        return Err(AppError::config("payload size list must not be empty"));
    }
    Ok(sizes)
}

/// Merge `RTT_*` environment variables into the configuration.
pub fn merge_from_env(config: &mut SweepConfig) -> Result<()> {
    if let Ok(value) = std::env::var("RTT_PAYLOAD_SIZES") {
        config.payload_sizes = parse_size_list(&value)?;
    }
    if let Some(warmup) = env_number::<u32>("RTT_WARMUP_COUNT")? {
        config.warmup_count = warmup;
    }
    if let Some(count) = env_number::<u32>("RTT_MEASUREMENT_COUNT")? {
        config.measurement_count = count;
    }
    if let Some(timeout_ms) = env_number::<u64>("RTT_TIMEOUT_MS")? {
        config.timeout_ms = timeout_ms;
    }
    if let Some(settle_ms) = env_number::<u64>("RTT_SETTLE_PAUSE_MS")? {
        config.settle_pause_ms = settle_ms;
    }
    Ok(())
}

fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::parse(format!("invalid value for {}: '{}'", name, value))),
        Err(_) => Ok(None),
    }
}

/// Apply CLI overrides on top of defaults and environment values.
///
/// The numeric CLI arguments are `Option`s that stay `None` unless the flag
/// was given, so an explicit flag always wins over an environment variable,
/// even when its value coincides with the built-in default.
fn apply_cli_overrides(config: &mut SweepConfig, common: &CommonArgs) -> Result<()> {
    if let Some(sizes) = &common.sizes {
        config.payload_sizes = parse_size_list(sizes)?;
    }
    if let Some(warmup) = common.warmup {
        config.warmup_count = warmup;
    }
    if let Some(count) = common.count {
        config.measurement_count = count;
    }
    if let Some(timeout_ms) = common.timeout {
        config.timeout_ms = timeout_ms;
    }
    if let Some(settle_ms) = common.settle_pause {
        config.settle_pause_ms = settle_ms;
    }

    config.record_failures = common.record_failures;
    config.verbose = common.verbose;
    config.debug = common.debug;
    config.enable_color = if common.no_color {
        false
    } else if common.color {
        true
    } else {
        defaults::DEFAULT_ENABLE_COLOR
    };
    Ok(())
}

/// Load the complete sweep configuration for one client.
pub fn load_sweep_config(common: &CommonArgs, client_id: &str) -> Result<SweepConfig> {
    dotenv::dotenv().ok();

    let mut config = SweepConfig::default();
    merge_from_env(&mut config)?;
    apply_cli_overrides(&mut config, common)?;
    config.client_id = client_id.to_string();
    config.validate()?;
    Ok(config)
}

/// Load the fleet bounds; the default concurrency cap is the CPU count.
pub fn load_fleet_config(args: &FleetArgs) -> Result<FleetConfig> {
    let config = FleetConfig {
        num_clients: args.num_clients,
        max_concurrent: args.max_workers.unwrap_or_else(num_cpus::get),
    };
    config.validate()?;
    Ok(config)
}
