use anyhow::Result;
use cdmi_server::{
    ProfileCapabilitySource, ResourceResolver, ServerCli, ServerConfig, bootstrap, router,
};
use cdmi_store::{FileSystemStores, MemoryStores, ResourceStores};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cdmi_server=debug,tower_http=info")),
        )
        .init();

    let cli = ServerCli::parse();
    let config = cli.config();

    if cli.in_memory {
        let stores = MemoryStores::with_id_prefix(&config.object_id_prefix);
        serve(stores, config).await
    } else {
        let stores = FileSystemStores::open(&config.data_dir, &config.object_id_prefix).await?;
        serve(stores, config).await
    }
}

async fn serve<S>(stores: S, config: ServerConfig) -> Result<()>
where
    S: ResourceStores,
{
    let source = ProfileCapabilitySource::new(&config.backend_profile);
    bootstrap(&stores, &source).await?;

    let listener = TcpListener::bind(&config.address).await?;
    info!("CDMI endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, router(ResourceResolver::new(stores))).await?;

    Ok(())
}
