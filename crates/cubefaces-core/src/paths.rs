//! Standard paths used by cubefaces

use std::path::PathBuf;

/// Standard cubefaces paths
pub struct Paths {
    /// Config directory (~/.config/cubefaces)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("cubefaces");

        Self { config }
    }

    /// Default configuration file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_lives_in_config_dir() {
        let paths = Paths::new();
        assert!(paths.config.ends_with("cubefaces"));
        assert_eq!(paths.config_file().parent(), Some(paths.config.as_path()));
        assert!(paths.config_file().ends_with("config.yaml"));
    }
}
