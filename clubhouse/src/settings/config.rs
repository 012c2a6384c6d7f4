use clubhouse_core::settings::api_server::ApiServer;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
#[readonly::make]
pub struct AuthorizationSettings {
    /// YAML file holding the role catalog; written back on every catalog change
    pub roles_file: String,
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        AuthorizationSettings {
            roles_file: "config/roles.yaml".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[allow(unused)]
#[readonly::make]
pub struct DirectorySettings {
    /// Optional YAML file with clubs, halls, users and bookings to start with
    pub seed_file: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(unused)]
pub struct Settings {
    pub debug: bool,
    pub api: ApiServer,
    #[serde(default)]
    pub authorization: AuthorizationSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            debug: false,
            api: ApiServer::default(),
            authorization: AuthorizationSettings::default(),
            directory: DirectorySettings::default(),
        }
    }
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("CLUBHOUSE")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var("CLUBHOUSE_RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("debug", false)?
            .set_default("api.bind_address", "0.0.0.0:21380")?
            .set_default("authorization.roles_file", "config/roles.yaml")?
            // Start off by merging in the "default" configuration file
            .add_source(File::with_name("config/default"))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Self::get_environment());

        let s = builder.build()?;
        let mut settings: Settings = s.try_deserialize()?;

        settings.directory.seed_file = Self::check_if_optional(&settings.directory.seed_file);

        Ok(settings)
    }

    /// Load settings from a single file, without run-mode layering
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("debug", false)?
            .add_source(File::with_name(path))
            .build()?
            .try_deserialize()
    }

    /// Treat empty, "false" and "none" as unset so env vars can disable a file from the defaults
    fn check_if_optional(value: &Option<String>) -> Option<String> {
        match value.as_deref().map(|v| v.trim().to_lowercase()) {
            None => None,
            Some(v) if v.is_empty() || v == "false" || v == "none" => None,
            Some(_) => value.clone(),
        }
    }
}
