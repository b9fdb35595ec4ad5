// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use repodeps::{fetcher_from_config, Config, MetadataStore};
use tracing::warn;

use cli::{Cli, Commands, ConfigAction};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Config subcommands run before any validation so a broken file
    // can still be inspected or re-initialized
    if let Some(Commands::Config { ref action }) = cli.command {
        let mut config = Config::load(&cli.config)?;
        return match action {
            ConfigAction::Show => commands::cmd_config_show(&config),
            ConfigAction::Init => commands::cmd_config_init(&cli.config),
            ConfigAction::Set { key, value } => {
                commands::cmd_config_set(&mut config, &cli.config, key, value)
            }
        };
    }

    let mut config = Config::load(&cli.config)?;
    config.validate()?;

    let fetcher = fetcher_from_config(&config)?;
    let mut store = MetadataStore::new(config.clone())?;
    let allow_prompt = !cli.no_interactive;

    match cli.command {
        Some(Commands::List { patterns }) => {
            store.ensure_loaded(fetcher.as_ref(), false)?;
            commands::cmd_list(&store, &config, &patterns, allow_prompt)
        }
        Some(Commands::Resolve { patterns }) => {
            store.ensure_loaded(fetcher.as_ref(), false)?;
            commands::cmd_resolve(&store, &config, &patterns, allow_prompt)
        }
        Some(Commands::Urls {
            patterns,
            with_deps,
        }) => {
            store.ensure_loaded(fetcher.as_ref(), false)?;
            commands::cmd_urls(&store, &config, &patterns, with_deps, allow_prompt)
        }
        Some(Commands::Download {
            patterns,
            with_deps,
        }) => {
            store.ensure_loaded(fetcher.as_ref(), false)?;
            commands::cmd_download(
                &store,
                fetcher.as_ref(),
                &config,
                &patterns,
                with_deps,
                allow_prompt,
            )
        }
        Some(Commands::Refresh) => commands::cmd_refresh(&mut store, fetcher.as_ref()),
        Some(Commands::Clean) => commands::cmd_clean(&mut store),
        Some(Commands::Config { .. }) => unreachable!("handled above"),
        None => {
            if cli.no_interactive {
                warn!("No operation specified and interactive mode disabled");
                Ok(())
            } else {
                store.ensure_loaded(fetcher.as_ref(), false)?;
                commands::interactive_menu(
                    &mut store,
                    fetcher.as_ref(),
                    &mut config,
                    &cli.config,
                )
            }
        }
    }
}
