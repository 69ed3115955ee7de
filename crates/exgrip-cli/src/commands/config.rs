use anyhow::Result;
use exgrip_api::config;
use exgrip_api::Config;

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    let config_path = config::config_file_path();

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config_path.display());
    let exists = config_path.exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  catalog_addr: {}", config.catalog_addr);
    println!("  search_addr: {}", config.search_addr);
    println!("  top_k: {}", config.top_k);
    println!("  fetch_timeout_secs: {}", config.fetch_timeout_secs);
    println!("  fetch_retries: {}", config.fetch_retries);
    println!("  max_concurrent_fetches: {}", config.max_concurrent_fetches);
    println!("  skip_failed_images: {}", config.skip_failed_images);
    println!(
        "  model_cache_dir: {}",
        config
            .model_cache_dir
            .as_ref()
            .map_or_else(|| String::from("<default>"), |p| p.display().to_string())
    );
    println!("  log_level: {}", config.log_level);
    println!("  log_coloured: {}", config.log_coloured);
    println!("  log_report_caller: {}", config.log_report_caller);

    println!("\nPriority: CLI args > ENV vars (EXGRIP_*) > Config file > Defaults");

    Ok(())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure exgrip.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
