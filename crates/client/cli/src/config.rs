//! Supervisor configuration read from the process environment.
use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct CliConfig {
    /// Engine tuning file; stock timings when unset.
    pub engine_config: Option<PathBuf>,
    pub sessions: usize,
    pub log_dir: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            engine_config: None,
            sessions: 2,
            log_dir: default_log_dir(),
        }
    }
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `WARDEN_CONFIG` - Path to the engine TOML file (default: built-in timings)
    /// - `WARDEN_SESSIONS` - Number of character sessions to run (default: 2)
    /// - `WARDEN_LOG_DIR` - Directory for log files (default: platform cache dir)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.engine_config = env::var_os("WARDEN_CONFIG").map(PathBuf::from);

        if let Some(sessions) = read_env::<usize>("WARDEN_SESSIONS") {
            config.sessions = sessions.max(1);
        }

        if let Some(dir) = env::var_os("WARDEN_LOG_DIR") {
            config.log_dir = PathBuf::from(dir);
        }

        config
    }
}

fn default_log_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "warden")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| env::temp_dir().join("warden").join("logs"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
