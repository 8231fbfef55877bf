// Copyright (c) 2024 Folio Dashboard contributors. All rights reserved.

mod api;
mod cli_messages;
mod commands;
mod config;
mod consts;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod models;
mod session;
mod ui;
mod workers;

use crate::api::{ApiClient, DashboardApi};
use crate::config::{Config, get_config_path};
use crate::consts::cli_consts::alert_polling;
use crate::environment::Environment;
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use crate::ui::UIConfig;
use clap::{Parser, Subcommand};
use std::error::Error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Terminal dashboard for portfolio holdings and stock price alerts
struct Args {
    /// Base URL of the portfolio and alert services, e.g. http://localhost:8000
    #[arg(long, global = true, env = "FOLIO_API_URL", value_name = "URL")]
    api_url: Option<String>,

    /// Named environment ("local") or a base URL. Ignored when --api-url is set.
    #[arg(long, global = true, env = "FOLIO_ENVIRONMENT")]
    environment: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the dashboard
    Start {
        /// Print events to the console instead of drawing the dashboard
        #[arg(long, action = clap::ArgAction::SetTrue)]
        headless: bool,

        /// Only show holdings of this user
        #[arg(long, value_name = "USER_ID")]
        user_id: Option<String>,

        /// Seconds between triggered-alert polls
        #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
        poll_secs: Option<u64>,

        /// Enable background colors
        #[arg(long = "with-background", action = clap::ArgAction::SetTrue)]
        with_background: bool,
    },
    /// Manage portfolio holdings
    Portfolio {
        #[command(subcommand)]
        action: PortfolioCommand,
    },
    /// Show the currently triggered alerts
    Alerts,
    /// Manage alert conditions
    Conditions {
        #[command(subcommand)]
        action: ConditionsCommand,
    },
    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum PortfolioCommand {
    /// List holdings
    List {
        #[arg(long, value_name = "USER_ID")]
        user_id: Option<String>,
    },
    /// Add a holding
    Add {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        symbol: String,
        /// Whole number of shares. Anything unparseable is sent as null.
        #[arg(long)]
        quantity: String,
    },
    /// Replace an existing holding
    Update {
        #[arg(long)]
        portfolio_id: String,
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        quantity: String,
    },
    /// Delete a holding
    Delete {
        #[arg(long)]
        portfolio_id: String,
    },
}

#[derive(Subcommand)]
enum ConditionsCommand {
    /// List alert conditions
    List,
    /// Add an alert condition
    Add {
        #[arg(long)]
        alert_id: String,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "above", value_parser = ["above", "below"])]
        condition: String,
        /// Price threshold. Anything unparseable is sent as null.
        #[arg(long)]
        threshold: String,
    },
    /// Delete an alert condition
    Delete {
        #[arg(long)]
        alert_id: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Store defaults in the config file
    Set {
        /// Base URL of the services
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        /// User the dashboard filters holdings to on start
        #[arg(long)]
        default_user_id: Option<String>,
        /// Seconds between triggered-alert polls
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        alert_poll_secs: Option<u64>,
    },
    /// Print the config file and the resolved environment
    Show,
    /// Delete the config file
    Clear,
}

/// Picks the environment: `--api-url` (or its env var), then
/// `--environment`, then the config file, then the local gateway.
fn resolve_environment(
    api_url: Option<&str>,
    environment: Option<&str>,
    config: &Config,
) -> Result<Environment, String> {
    let choice = [api_url, environment, config.api_url.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty());
    match choice {
        Some(value) => value.parse::<Environment>(),
        None => Ok(Environment::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config_path = get_config_path()?;
    if !matches!(args.command, Command::Start { .. }) {
        crate::logging::init_stderr_logger();
    }
    let config = Config::load_or_default(&config_path).unwrap_or_else(|e| {
        crate::print_cmd_warn!("Ignoring unreadable config file", "{}", e);
        Config::default()
    });
    // Resolved lazily so `config` commands can repair a bad config file
    let environment = resolve_environment(
        args.api_url.as_deref(),
        args.environment.as_deref(),
        &config,
    );

    match args.command {
        Command::Start {
            headless,
            user_id,
            poll_secs,
            with_background,
        } => {
            let ui_config = UIConfig::new(
                with_background,
                user_id.or(config.default_user_id),
                poll_secs
                    .or(config.alert_poll_secs)
                    .unwrap_or(alert_polling::INTERVAL_SECS),
            );
            let session = setup_session(environment?, ui_config).await?;
            if headless {
                run_headless_mode(session).await
            } else {
                run_tui_mode(session).await
            }
        }
        Command::Portfolio { action } => {
            let api = ApiClient::new(environment?)?;
            run_portfolio_command(&api, action).await
        }
        Command::Alerts => {
            let api = ApiClient::new(environment?)?;
            let output = report(commands::list_triggered_alerts(&api).await)?;
            println!("{}", output);
            Ok(())
        }
        Command::Conditions { action } => {
            let api = ApiClient::new(environment?)?;
            run_conditions_command(&api, action).await
        }
        Command::Config { action } => run_config_command(action, config, environment),
    }
}

/// Prints a failed request the way the other commands do and hands the
/// error back to `main`.
fn report<T>(result: Result<T, api::error::ApiError>) -> Result<T, Box<dyn Error>> {
    result.map_err(|e| {
        crate::print_cmd_error!("Request failed.", &e.to_string());
        e.into()
    })
}

async fn run_portfolio_command(
    api: &dyn DashboardApi,
    action: PortfolioCommand,
) -> Result<(), Box<dyn Error>> {
    match action {
        PortfolioCommand::List { user_id } => {
            println!("{}", report(commands::list_portfolios(api, user_id).await)?);
        }
        PortfolioCommand::Add {
            user_id,
            symbol,
            quantity,
        } => {
            let message =
                report(commands::add_portfolio(api, &user_id, &symbol, &quantity).await)?;
            crate::print_cmd_success!("Portfolio", "{}", message);
        }
        PortfolioCommand::Update {
            portfolio_id,
            user_id,
            symbol,
            quantity,
        } => {
            let message = report(
                commands::update_portfolio(api, &portfolio_id, &user_id, &symbol, &quantity)
                    .await,
            )?;
            crate::print_cmd_success!("Portfolio", "{}", message);
        }
        PortfolioCommand::Delete { portfolio_id } => {
            let message = report(commands::delete_portfolio(api, &portfolio_id).await)?;
            crate::print_cmd_success!("Portfolio", "{}", message);
        }
    }
    Ok(())
}

async fn run_conditions_command(
    api: &dyn DashboardApi,
    action: ConditionsCommand,
) -> Result<(), Box<dyn Error>> {
    match action {
        ConditionsCommand::List => {
            println!("{}", report(commands::list_alert_conditions(api).await)?);
        }
        ConditionsCommand::Add {
            alert_id,
            symbol,
            condition,
            threshold,
        } => {
            let message = report(
                commands::add_alert_condition(api, &alert_id, &symbol, &condition, &threshold)
                    .await,
            )?;
            crate::print_cmd_success!("Alert condition", "{}", message);
        }
        ConditionsCommand::Delete { alert_id } => {
            let message = report(commands::delete_alert_condition(api, &alert_id).await)?;
            crate::print_cmd_success!("Alert condition", "{}", message);
        }
    }
    Ok(())
}

fn run_config_command(
    action: ConfigCommand,
    mut config: Config,
    environment: Result<Environment, String>,
) -> Result<(), Box<dyn Error>> {
    let config_path = get_config_path()?;
    match action {
        ConfigCommand::Set {
            url,
            default_user_id,
            alert_poll_secs,
        } => {
            if let Some(url) = url {
                // Reject values the dashboard could not start with
                url.parse::<Environment>()?;
                config.api_url = Some(url);
            }
            if let Some(user_id) = default_user_id {
                config.default_user_id = Some(user_id).filter(|id| !id.is_empty());
            }
            if let Some(secs) = alert_poll_secs {
                config.alert_poll_secs = Some(secs);
            }
            config.save(&config_path).map_err(|e| {
                crate::print_cmd_error!("Failed to save config.", &e.to_string());
                e
            })?;
            crate::print_cmd_success!("Config saved", "{}", config_path.display());
        }
        ConfigCommand::Show => {
            crate::print_cmd_info!("Config file", "{}", config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            match environment {
                Ok(environment) => crate::print_cmd_info!("Environment", "{:?}", environment),
                Err(e) => crate::print_cmd_warn!("Environment", "{}", e),
            }
        }
        ConfigCommand::Clear => {
            Config::clear(&config_path)?;
            crate::print_cmd_success!("Config cleared", "{}", config_path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_beats_environment_and_config() {
        let config = Config {
            api_url: Some("http://from-config:1".to_string()),
            ..Config::default()
        };
        assert_eq!(
            resolve_environment(Some("http://flag:2"), Some("local"), &config),
            Ok(Environment::Custom {
                api_url: "http://flag:2".to_string()
            })
        );
        assert_eq!(
            resolve_environment(None, Some("local"), &config),
            Ok(Environment::Local)
        );
        assert_eq!(
            resolve_environment(None, None, &config),
            Ok(Environment::Custom {
                api_url: "http://from-config:1".to_string()
            })
        );
    }

    #[test]
    fn blank_values_fall_through() {
        assert_eq!(
            resolve_environment(None, Some(""), &Config::default()),
            Ok(Environment::Local)
        );
        let config = Config {
            api_url: Some("https://folio.example.com".to_string()),
            ..Config::default()
        };
        assert_eq!(
            resolve_environment(Some("  "), None, &config),
            Ok(Environment::Custom {
                api_url: "https://folio.example.com".to_string()
            })
        );
    }

    #[test]
    fn rejects_unknown_environment_names() {
        assert!(resolve_environment(None, Some("staging"), &Config::default()).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
