use std::path::PathBuf;

use clap::Parser;

use crate::ServerConfig;

/// Command line surface of the server binary
#[derive(Debug, Parser)]
#[command(name = "cdmi-server")]
#[command(bin_name = "cdmi-server")]
#[command(about = "A CDMI storage endpoint", long_about = None)]
pub struct ServerCli {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    pub address: String,

    /// Directory holding the stored resources
    #[arg(short, long, default_value = "cdmi-data")]
    pub data_dir: PathBuf,

    /// Prefix prepended to generated object ids
    #[arg(long, default_value = "")]
    pub object_id_prefix: String,

    /// Storage backend capability profile to advertise
    #[arg(long, default_value = "filesystem")]
    pub backend: String,

    /// Keep all resources in memory instead of on disk
    #[arg(long)]
    pub in_memory: bool,
}

impl ServerCli {
    /// The [ServerConfig] these arguments describe
    pub fn config(&self) -> ServerConfig {
        ServerConfig::new(&self.address)
            .with_data_dir(&self.data_dir)
            .with_object_id_prefix(&self.object_id_prefix)
            .with_backend_profile(&self.backend)
    }
}
