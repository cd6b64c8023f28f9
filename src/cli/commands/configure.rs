//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Confirm, Select, Text};

use crate::config::{
    ApiConfig, ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MODEL,
};
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command.
///
/// With `--show`, prints the current configuration; otherwise interactively
/// edits the endpoint, model, credential source, and exit-cue matching.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        return show_configuration();
    }
    handle_prompt_cancellation(run_configure_inner)
}

fn show_configuration() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default();

    print_current(&config);
    println!(
        "{}",
        Style::secondary(format!("Config file: {}", manager.config_path().display()))
    );
    Ok(())
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default();

    print_current(&config);

    let endpoint = prompt_endpoint(config.api.endpoint.as_deref())?;
    let model = prompt_model(config.banter.model.as_deref())?;
    let (api_key, api_key_env) = prompt_api_key_source(&config.api)?;

    let exit_cue_ignores_case = Confirm::new("Match the exit cue case-insensitively?")
        .with_default(config.banter.exit_cue_ignores_case)
        .prompt()?;

    config.api = ApiConfig {
        endpoint: Some(endpoint),
        api_key,
        api_key_env,
    };
    config.banter.model = Some(model);
    config.banter.exit_cue_ignores_case = exit_cue_ignores_case;

    manager.save(&config)?;

    println!();
    println!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn print_current(config: &ConfigFile) {
    let key_source = if config.api.api_key.is_some() {
        Style::value("config file")
    } else {
        Style::value(format!(
            "env: {}",
            config.api.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
        ))
    };

    println!("{}", Style::header("Current settings"));
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        config
            .api
            .endpoint
            .as_deref()
            .map_or_else(|| Style::secondary(format!("(default: {DEFAULT_ENDPOINT})")), Style::value)
    );
    println!(
        "  {}      {}",
        Style::label("model"),
        config
            .banter
            .model
            .as_deref()
            .map_or_else(|| Style::secondary(format!("(default: {DEFAULT_MODEL})")), Style::value)
    );
    println!("  {}    {key_source}", Style::label("api key"));
    println!(
        "  {}   {}",
        Style::label("exit cue"),
        Style::value(if config.banter.exit_cue_ignores_case {
            "case-insensitive"
        } else {
            "exact match"
        })
    );
    println!();
}

fn prompt_endpoint(current: Option<&str>) -> Result<String> {
    let endpoint = Text::new("API endpoint:")
        .with_default(current.unwrap_or(DEFAULT_ENDPOINT))
        .with_help_message("OpenAI-compatible base URL")
        .prompt()?;

    if endpoint.trim().is_empty() {
        bail!("Endpoint cannot be empty");
    }

    Ok(endpoint.trim().to_string())
}

fn prompt_model(current: Option<&str>) -> Result<String> {
    let model = Text::new("Model:")
        .with_default(current.unwrap_or(DEFAULT_MODEL))
        .prompt()?;

    if model.trim().is_empty() {
        bail!("Model name cannot be empty");
    }

    Ok(model.trim().to_string())
}

/// Asks where the API key should come from.
///
/// Returns `(api_key, api_key_env)`: exactly one is `Some`.
fn prompt_api_key_source(current: &ApiConfig) -> Result<(Option<String>, Option<String>)> {
    let source = Select::new(
        "Where should the API key come from?",
        vec!["Environment variable", "Stored in config file"],
    )
    .prompt()?;

    if source == "Environment variable" {
        let env_var = Text::new("Environment variable name:")
            .with_default(current.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV))
            .prompt()?;

        if env_var.trim().is_empty() {
            bail!("Environment variable name cannot be empty");
        }

        return Ok((None, Some(env_var.trim().to_string())));
    }

    let api_key = Text::new("API key:")
        .with_help_message("Stored in plain text; prefer an environment variable")
        .prompt()?;

    if api_key.trim().is_empty() {
        bail!("API key cannot be empty");
    }

    Ok((Some(api_key.trim().to_string()), None))
}
