// src/commands.rs
//! Command handlers for the repodeps CLI

use anyhow::{bail, Context, Result};
use repodeps::{download_batch, locate, resolve, Config, Fetcher, MetadataStore};
use std::collections::HashSet;
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, info, warn};

/// Match wildcard patterns against the sorted package-name list.
///
/// Shell-style wildcards via `glob::Pattern`; an unparsable pattern is
/// warned about and skipped. The result stays sorted because the input
/// list is.
pub fn filter_packages(names: &[String], patterns: &[String]) -> Vec<String> {
    let compiled: Vec<glob::Pattern> = patterns
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Ignoring invalid pattern '{}': {}", p, e);
                None
            }
        })
        .collect();

    names
        .iter()
        .filter(|name| compiled.iter().any(|p| p.matches(name)))
        .cloned()
        .collect()
}

/// Print package names in fixed-width columns
pub fn print_tabular(packages: &[String], columns: usize, column_width: usize) {
    if packages.is_empty() {
        error!("No packages found");
        return;
    }
    for (i, package) in packages.iter().enumerate() {
        print!("{package:<column_width$}");
        if (i + 1) % columns == 0 {
            println!();
        }
    }
    if packages.len() % columns != 0 {
        println!();
    }
}

/// Resolve CLI patterns to package names, prompting when none given
fn select_packages(
    store: &MetadataStore,
    patterns: &[String],
    allow_prompt: bool,
) -> Result<Vec<String>> {
    let snapshot = store
        .snapshot()
        .context("No package index loaded; run `repodeps refresh` first")?;

    let patterns: Vec<String> = if patterns.is_empty() {
        if !allow_prompt {
            bail!("No package patterns given");
        }
        let line = prompt("Enter package names/wildcards (comma-separated): ")?;
        line.split(',').map(|s| s.trim().to_string()).collect()
    } else {
        patterns.to_vec()
    };

    Ok(filter_packages(&snapshot.names, &patterns))
}

/// Expand a selection with the dependency closure of each member
fn with_dependencies(store: &MetadataStore, selected: &[String]) -> Result<HashSet<String>> {
    let snapshot = store.snapshot().context("No package index loaded")?;
    let mut all: HashSet<String> = selected.iter().cloned().collect();
    for package in selected {
        match resolve(package, &snapshot.graph.deps) {
            Some(closure) => all.extend(closure),
            None => warn!("Package '{}' not in the dependency graph", package),
        }
    }
    Ok(all)
}

pub fn cmd_list(store: &MetadataStore, config: &Config, patterns: &[String], allow_prompt: bool) -> Result<()> {
    let selected = select_packages(store, patterns, allow_prompt)?;
    print_tabular(&selected, config.package_columns, config.package_column_width);
    Ok(())
}

pub fn cmd_resolve(
    store: &MetadataStore,
    config: &Config,
    patterns: &[String],
    allow_prompt: bool,
) -> Result<()> {
    let selected = select_packages(store, patterns, allow_prompt)?;
    if selected.is_empty() {
        error!("No packages matched");
        return Ok(());
    }
    let snapshot = store.snapshot().context("No package index loaded")?;

    for package in &selected {
        match resolve(package, &snapshot.graph.deps) {
            None => error!("Package '{}' not found", package),
            Some(closure) => {
                let mut deps: Vec<String> = closure.into_iter().collect();
                deps.sort();
                info!("Dependencies for {}:", package);
                print_tabular(&deps, config.package_columns, config.package_column_width);
            }
        }
    }
    Ok(())
}

pub fn cmd_urls(
    store: &MetadataStore,
    config: &Config,
    patterns: &[String],
    with_deps: bool,
    allow_prompt: bool,
) -> Result<()> {
    let selected = select_packages(store, patterns, allow_prompt)?;
    if selected.is_empty() {
        error!("No packages matched");
        return Ok(());
    }
    let names = if with_deps {
        with_dependencies(store, &selected)?
    } else {
        selected.into_iter().collect()
    };

    let snapshot = store.snapshot().context("No package index loaded")?;
    let located = locate(
        &names,
        &snapshot.records,
        store.base_url(),
        config.only_latest_version,
    );

    for unresolved in &located.unresolved {
        warn!("No artifact found for {}", unresolved);
    }
    if located.downloads.is_empty() {
        error!("No artifact URLs found");
        return Ok(());
    }
    for download in &located.downloads {
        println!("{:<30}{}", download.package, download.url);
    }
    Ok(())
}

pub fn cmd_download(
    store: &MetadataStore,
    fetcher: &dyn Fetcher,
    config: &Config,
    patterns: &[String],
    with_deps: bool,
    allow_prompt: bool,
) -> Result<()> {
    let selected = select_packages(store, patterns, allow_prompt)?;
    if selected.is_empty() {
        error!("No packages matched");
        return Ok(());
    }
    let names = if with_deps {
        with_dependencies(store, &selected)?
    } else {
        selected.into_iter().collect()
    };

    let mut sorted: Vec<&String> = names.iter().collect();
    sorted.sort();
    info!(
        "Downloading packages: {}",
        sorted
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let snapshot = store.snapshot().context("No package index loaded")?;
    let located = locate(
        &names,
        &snapshot.records,
        store.base_url(),
        config.only_latest_version,
    );
    for unresolved in &located.unresolved {
        warn!("No artifact found for {}", unresolved);
    }

    let summary = download_batch(fetcher, &located.downloads, &config.download_dir)?;
    info!(
        "Done: {} downloaded, {} already present, {} failed",
        summary.fetched.len(),
        summary.already_present.len(),
        summary.failed.len()
    );
    for (file, err) in &summary.failed {
        error!("  {}: {}", file, err);
    }
    Ok(())
}

pub fn cmd_refresh(store: &mut MetadataStore, fetcher: &dyn Fetcher) -> Result<()> {
    store.ensure_loaded(fetcher, true)?;
    Ok(())
}

pub fn cmd_clean(store: &mut MetadataStore) -> Result<()> {
    store.cleanup();
    Ok(())
}

pub fn cmd_config_show(config: &Config) -> Result<()> {
    println!("--- Current configuration ---");
    print!("{}", config.render());
    println!("-----------------------------");
    Ok(())
}

pub fn cmd_config_init(config_path: &Path) -> Result<()> {
    Config::default().save(config_path)?;
    Ok(())
}

pub fn cmd_config_set(config: &mut Config, config_path: &Path, key: &str, value: &str) -> Result<()> {
    config.set_field(key, value)?;
    config.save(config_path)?;
    info!("Updated {} to {}", key, value);
    Ok(())
}

/// Interactive menu, the default mode when no subcommand is given
pub fn interactive_menu(
    store: &mut MetadataStore,
    fetcher: &dyn Fetcher,
    config: &mut Config,
    config_path: &Path,
) -> Result<()> {
    loop {
        println!();
        println!("--- MENU ---");
        println!("1) List packages");
        println!("2) Calculate dependencies");
        println!("3) Refresh metadata files");
        println!("4) Cleanup metadata files");
        println!("5) List artifact URLs");
        println!("6) Download packages");
        println!("9) Configure settings");
        println!("0) Exit");

        let choice = prompt("Your choice: ")?;
        let result = match choice.as_str() {
            "1" => cmd_list(store, config, &[], true),
            "2" => cmd_resolve(store, config, &[], true),
            "3" => cmd_refresh(store, fetcher),
            "4" => cmd_clean(store),
            "5" => {
                let with_deps = prompt_yes_no("Include dependencies? (y/N): ")?;
                cmd_urls(store, config, &[], with_deps, true)
            }
            "6" => {
                let with_deps = prompt_yes_no("Include dependencies? (y/N): ")?;
                cmd_download(store, fetcher, config, &[], with_deps, true)
            }
            "9" => edit_configuration(config, config_path),
            "0" | "" => {
                info!("Goodbye!");
                return Ok(());
            }
            _ => {
                error!("Invalid choice");
                Ok(())
            }
        };
        if let Err(e) = result {
            error!("Error during operation: {:#}", e);
        }
    }
}

/// Numbered field editor over the closed config field set
fn edit_configuration(config: &mut Config, config_path: &Path) -> Result<()> {
    loop {
        cmd_config_show(config)?;
        println!("Select a field by number (Enter to finish):");
        for (i, key) in repodeps::config::FIELD_NAMES.iter().enumerate() {
            println!("  {}) {}", i + 1, key);
        }
        let choice = prompt("Your choice: ")?;
        if choice.is_empty() {
            break;
        }
        let key = match choice
            .parse::<usize>()
            .ok()
            .and_then(|i| repodeps::config::FIELD_NAMES.get(i.wrapping_sub(1)))
        {
            Some(key) => *key,
            None => {
                error!("Invalid choice");
                continue;
            }
        };
        let value = prompt(&format!("Enter new value for {key}: "))?;
        match config.set_field(key, &value) {
            Ok(()) => info!("Updated {} to {}", key, value),
            Err(e) => error!("{}", e),
        }
    }

    if prompt_yes_no(&format!(
        "Save changes to '{}'? (y/N): ",
        config_path.display()
    ))? {
        config.save(config_path)?;
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_yes_no(label: &str) -> Result<bool> {
    let answer = prompt(label)?.to_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes" | "1" | "true"))
}
