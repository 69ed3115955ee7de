use anyhow::{Context, Result};
use std::net::SocketAddr;

use exgrip_api::catalog::{self, CatalogState};
use exgrip_api::search::{self, SearchState};
use exgrip_api::{server, Config};
use exgrip_core::schema::Database;

fn catalog_state(config: &Config) -> Result<CatalogState> {
    let db = Database::open(&config.database_path).with_context(|| {
        format!(
            "Failed to open catalog database {}",
            config.database_path.display()
        )
    })?;
    log::info!(
        "Catalog database {} holds {} combinations",
        config.database_path.display(),
        db.count_combinations()?
    );
    Ok(CatalogState::new(db))
}

fn search_state(config: &Config) -> Result<SearchState> {
    log::info!("Loading embedding model");
    SearchState::from_config(config).context("Failed to start the search service")
}

pub async fn serve_catalog(config: &Config, addr: SocketAddr) -> Result<()> {
    let app = catalog::router(catalog_state(config)?);
    server::serve("catalog", addr, app).await?;
    Ok(())
}

pub async fn serve_search(config: &Config, addr: SocketAddr) -> Result<()> {
    let app = search::router(search_state(config)?);
    server::serve("search", addr, app).await?;
    Ok(())
}

/// Run both services side by side; the first failure stops both.
pub async fn serve_all(config: &Config) -> Result<()> {
    let catalog_app = catalog::router(catalog_state(config)?);
    let search_app = search::router(search_state(config)?);

    tokio::try_join!(
        server::serve("catalog", config.catalog_addr, catalog_app),
        server::serve("search", config.search_addr, search_app),
    )?;
    Ok(())
}
