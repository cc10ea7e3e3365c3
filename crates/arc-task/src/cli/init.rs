/*
[INPUT]:  Interactive prompts (network, contracts, wallet, sync policy)
[OUTPUT]: YAML configuration file
[POS]:    Binary CLI layer - configuration generator
[UPDATE]: When configuration sections or their defaults change
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use arc_task::AppConfig;
use arc_task::config::{WalletKind, default_config_path};
use arc_task_adapter::Address;
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};

fn prompt_address(theme: &ColorfulTheme, prompt: &str, default: Option<Address>) -> Result<String> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(default.is_none())
        .validate_with(|value: &String| -> Result<(), String> {
            if value.trim().is_empty() {
                return Ok(());
            }
            value
                .trim()
                .parse::<Address>()
                .map(|_| ())
                .map_err(|err| format!("not an address: {err}"))
        });
    if let Some(default) = default {
        input = input.default(default.to_checksum(None));
    }
    Ok(input.interact_text()?)
}

fn parse_optional(value: &str) -> Result<Option<Address>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.parse().context("parse address")?))
}

pub fn run_init(output: Option<PathBuf>) -> Result<()> {
    let output = output
        .or_else(default_config_path)
        .unwrap_or_else(|| PathBuf::from("config.yaml"));

    println!("{}", style("Welcome to arc-task init").bold().cyan());
    println!(
        "{}",
        style("This will guide you through creating a client configuration.").dim()
    );

    let theme = ColorfulTheme::default();
    let mut config = AppConfig::default();

    println!("\n{}", style("--- Network ---").bold());
    config.network.rpc_url = Input::with_theme(&theme)
        .with_prompt("RPC URL")
        .default(config.network.rpc_url.clone())
        .interact_text()?;
    config.network.chain_id = Input::with_theme(&theme)
        .with_prompt("Chain ID")
        .default(config.network.chain_id)
        .interact_text()?;

    println!("\n{}", style("--- Contracts ---").bold());
    let todo_list = prompt_address(&theme, "Todo list address (blank to skip)", None)?;
    config.contracts.todo_list = parse_optional(&todo_list)?;
    let marketplace = prompt_address(&theme, "Marketplace address", Some(config.contracts.marketplace))?;
    config.contracts.marketplace = parse_optional(&marketplace)?.unwrap_or(config.contracts.marketplace);
    let token = prompt_address(&theme, "Token address", Some(config.contracts.token))?;
    config.contracts.token = parse_optional(&token)?.unwrap_or(config.contracts.token);

    println!("\n{}", style("--- Wallet ---").bold());
    let kinds = ["rpc", "address", "private_key"];
    let selection = Select::with_theme(&theme)
        .with_prompt("Wallet")
        .items(&kinds)
        .default(0)
        .interact()?;
    config.wallet.kind = match selection {
        1 => WalletKind::Address,
        2 => WalletKind::PrivateKey,
        _ => WalletKind::Rpc,
    };
    match config.wallet.kind {
        WalletKind::Address => {
            let address = prompt_address(&theme, "Account address", None)?;
            config.wallet.address = parse_optional(&address)?;
        }
        WalletKind::PrivateKey => {
            config.wallet.private_key_env = Input::with_theme(&theme)
                .with_prompt("Environment variable holding the key")
                .default(config.wallet.private_key_env.clone())
                .interact_text()?;
        }
        WalletKind::Rpc => {}
    }

    println!("\n{}", style("--- Confirmation ---").bold());
    config.sync.poll_interval_ms = Input::with_theme(&theme)
        .with_prompt("Poll interval (ms)")
        .default(config.sync.poll_interval_ms)
        .interact_text()?;
    config.sync.confirmation_timeout_secs = Input::with_theme(&theme)
        .with_prompt("Confirmation timeout (s)")
        .default(config.sync.confirmation_timeout_secs)
        .interact_text()?;

    config.validate().context("validate configuration")?;
    let yaml = serde_yaml::to_string(&config).context("failed to serialize config to YAML")?;

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(&output, yaml)
        .with_context(|| format!("failed to write config to {}", output.display()))?;

    println!("\n{}", style("SUCCESS!").bold().green());
    println!(
        "Configuration written to: {}",
        style(output.display()).cyan()
    );
    Ok(())
}
