use anyhow::{Context, Result};
use colored::Colorize;

use crate::{
    app::{init_config, Config},
    cache::ResolutionCache,
};

use super::Commands;

/// Handle CLI subcommands
pub async fn handle_command(command: &Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Get {
            repository,
            filename,
            cdn,
        } => {
            if *cdn {
                config.storage.force_cdn = true;
            }
            let url = resolve(&config, repository, filename.as_deref()).await?;
            println!("{}", url);
        }
        Commands::List => list_libraries(&config).await?,
        Commands::Init => {
            let path = init_config()?;
            println!("Configuration at: {}", path.display());
        }
        Commands::Version => show_version(),
    }
    Ok(())
}

/// Resolve one file URL through the cache
pub async fn resolve(config: &Config, repository: &str, filename: Option<&str>) -> Result<String> {
    let mut cache = ResolutionCache::open(config).await?;
    cache
        .get(repository, filename)
        .await
        .with_context(|| format!("Failed to resolve {}", repository))
}

/// Print every cached release
pub async fn list_libraries(config: &Config) -> Result<()> {
    let cache = ResolutionCache::open(config).await?;

    let mut empty = true;
    for record in cache.records() {
        empty = false;
        println!(
            "  • {} default {} ({} files)",
            record.to_string().green(),
            record.default_file(),
            record.files().len()
        );
    }

    if empty {
        println!("No cached libraries in {}", cache.path().display());
    }
    Ok(())
}

/// Show version information
pub fn show_version() {
    println!("cdnjs v{}", env!("CARGO_PKG_VERSION"));
}
