//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "consistency-probe";
const PROJECT_FILES: [&str; 2] = ["probe.toml", ".probe.toml"];
const ENV_PREFIX: &str = "PROBE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `PROBE_*` environment variables (`PROBE_RUN__CONCURRENCY=4`)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./probe.toml` or `./.probe.toml`
    /// 4. Global: `~/.config/consistency-probe/config.toml`
    /// 5. Default values
    ///
    /// An `[[experiments]]` list replaces the default list as a whole.
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for `--show-config`)
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mark = |found: bool| if found { "[FOUND]" } else { "[     ]" };
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        lines.push(format!("  [ENV  ] Environment: {ENV_PREFIX}*"));
        if let Some(path) = config_path {
            lines.push(format!(
                "  {} Explicit: {}",
                mark(path.exists()),
                path.display()
            ));
        }
        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND] Project: {}", path.display())),
            None => lines.push("  [     ] Project: ./probe.toml or ./.probe.toml".to_string()),
        }
        if let Some(path) = Self::global_config_path() {
            lines.push(format!(
                "  {} Global:  {}",
                mark(path.exists()),
                path.display()
            ));
        }
        lines.push("  [     ] Default: built-in defaults".to_string());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.experiments.len(), 4);
        assert_eq!(config.run.concurrency, 1);
    }

    #[test]
    fn test_global_config_path_names_app() {
        let path = ConfigLoader::global_config_path().unwrap();
        assert!(path.to_string_lossy().contains(APP_DIR));
    }

    #[test]
    fn test_project_file_replaces_experiment_list() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "probe.toml",
                r#"
[run]
seed = 7

[[experiments]]
name = "negated"
file = "data/negated.json"
model = "gpt-4"
temperature = 0.0
run = 3
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.run.seed, Some(7));
            assert_eq!(config.experiments.len(), 1);
            assert_eq!(config.experiments[0].name, "negated");
            assert_eq!(config.service.api_key_env, "OPENAI_API_KEY");
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_and_env_override_project() {
        Jail::expect_with(|jail| {
            jail.create_file(".probe.toml", "[run]\nconcurrency = 2\noutput_dir = \"a\"\n")?;
            jail.create_file("custom.toml", "[run]\noutput_dir = \"b\"\n")?;
            jail.set_env("PROBE_RUN__CONCURRENCY", "8");
            jail.set_env("PROBE_SERVICE__BASE_URL", "http://localhost:9000/v1");

            let config = ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| *e)?;
            assert_eq!(config.run.concurrency, 8);
            assert_eq!(config.run.output_dir, PathBuf::from("b"));
            assert_eq!(config.service.base_url, "http://localhost:9000/v1");
            Ok(())
        });
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        Jail::expect_with(|jail| {
            jail.create_file("probe.toml", "[run]\nconcurrency = \"many\"\n")?;
            assert!(ConfigLoader::load(None).is_err());
            Ok(())
        });
    }
}
