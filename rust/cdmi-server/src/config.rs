use std::path::PathBuf;

/// Configuration for a CDMI endpoint deployment
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub address: String,

    /// Directory the filesystem stores keep their documents under
    pub data_dir: PathBuf,

    /// Prefix prepended to generated object ids
    pub object_id_prefix: String,

    /// Name of the storage backend capability profile to advertise
    pub backend_profile: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:8080".to_string(),
            data_dir: PathBuf::from("cdmi-data"),
            object_id_prefix: String::new(),
            backend_profile: "filesystem".to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a configuration listening on the given address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Set the data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Set the object id prefix
    pub fn with_object_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.object_id_prefix = prefix.into();
        self
    }

    /// Set the backend capability profile
    pub fn with_backend_profile(mut self, profile: impl Into<String>) -> Self {
        self.backend_profile = profile.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ServerConfig::new("0.0.0.0:2364")
            .with_data_dir("/var/lib/cdmi")
            .with_object_id_prefix("0x")
            .with_backend_profile("filesystem");

        assert_eq!(config.address, "0.0.0.0:2364");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/cdmi"));
        assert_eq!(config.object_id_prefix, "0x");
        assert_eq!(config.backend_profile, "filesystem");
    }
}
