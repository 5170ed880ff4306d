mod api;
mod app;
mod cli;
mod event;
mod feed;
mod help;
mod keys;
mod logging;
mod poller;
mod settings;
mod theme;
mod time;
mod tui;
mod views;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use ratatui::Frame;

use api::FeedClient;
use app::App;
use cli::{Cli, Commands, ConfigArgs, ConfigCommands, OutputFormat, ThemeArgs, ThemeCommands};
use event::Event;
use settings::{Config, Settings};
use theme::{all_themes, by_name};
use tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = &cli.command {
        return match command {
            Commands::Theme(args) => handle_theme_command(args),
            Commands::Config(args) => handle_config_command(args, &cli),
        };
    }
    run_tui(cli).await
}

fn handle_theme_command(args: &ThemeArgs) -> Result<()> {
    match &args.command {
        ThemeCommands::List { verbose } => {
            for theme in all_themes() {
                if *verbose {
                    println!(
                        "{:<20} {:?}  {}",
                        theme.name,
                        theme.meta.variant,
                        theme.meta.description.as_deref().unwrap_or("")
                    );
                } else {
                    println!("{}", theme.name);
                }
            }
        }
        ThemeCommands::Show { name, format } => {
            let theme = by_name(name).with_context(|| format!("Theme '{}' not found", name))?;
            let out = match format {
                OutputFormat::Toml => {
                    toml::to_string_pretty(&theme).context("Failed to serialize theme")?
                }
                OutputFormat::Json => serde_json::to_string_pretty(&theme)
                    .context("Failed to serialize theme to JSON")?,
            };
            println!("{}", out);
        }
    }
    Ok(())
}

fn handle_config_command(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    let dir = require_config_dir(cli.config_dir.as_ref())?;
    let path = settings::settings_path(&dir);
    match &args.command {
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            let current = if path.exists() {
                Settings::load(&path)?
            } else {
                Settings::default()
            };
            current.merged_with(cli).save(&path)?;
            println!("Wrote {}", path.display());
        }
    }
    Ok(())
}

fn require_config_dir(custom: Option<&PathBuf>) -> Result<PathBuf> {
    settings::config_dir(custom).context("Could not determine config directory")
}

async fn run_tui(cli: Cli) -> Result<()> {
    let config_dir = require_config_dir(cli.config_dir.as_ref())?;
    let settings = Settings::load(&settings::settings_path(&config_dir))?;
    let config = Config::resolve(&cli, &settings);

    let log_path = settings::log_path(&config_dir);
    let _log_guard = logging::init(&log_path, cli.verbose)?;
    if cli.verbose {
        eprintln!("Logging to {}", log_path.display());
    }
    tracing::info!(base_url = %config.base_url, feed = %config.feed_path, "starting");

    let client = FeedClient::new(&config.base_url)?;
    let resolved_theme = theme::resolve(config.theme.as_deref())?;

    let mut terminal = tui::init()?;
    let mut app = App::new(client, config.feed_path, resolved_theme);
    let _poller = app.start_polling(config.interval);
    let mut events = EventHandler::new(250);

    let result = async {
        loop {
            terminal.draw(|frame| render(&app, frame))?;

            // Poll ticks and request results (non-blocking)
            while let Ok(result) = app.result_rx.try_recv() {
                app.handle_async_result(result);
            }

            if app.should_quit {
                break;
            }

            match events.next().await? {
                Event::Key(key) => {
                    if let Some(msg) = keys::handle_key(key, &app) {
                        app.update(msg);
                    }
                }
                Event::Tick | Event::Resize => {}
            }
        }
        anyhow::Ok(())
    }
    .await;

    tui::restore()?;
    tracing::info!("exiting");
    result
}

fn render(app: &App, frame: &mut Frame) {
    use ratatui::layout::{Constraint, Layout};

    let area = frame.area();

    let (main_area, debug_area) = if app.debug.visible {
        let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(10)]).split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    views::feed::render(frame, app, main_area);

    if let Some(debug_area) = debug_area {
        views::debug::render(frame, app, debug_area);
    }

    views::help_overlay::render(frame, app, area);
}
