use crate::history::{DEFAULT_HISTORY_SIZE, StringHistory};
use crate::keymap::KeyBinding;
use crate::search::{CaseSetting, FindAction, NavAction};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const RC_FILE_NAME: &str = ".findrusrc";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindConfig {
    pub case: CaseSetting,
    pub wrap_search: bool,
    pub history_size: usize,
    pub tab_stop: usize,
    pub prev_match_key: KeyBinding,
    pub next_match_key: KeyBinding,
}

impl Default for FindConfig {
    fn default() -> Self {
        Self {
            case: CaseSetting::Smart,
            wrap_search: true,
            history_size: DEFAULT_HISTORY_SIZE,
            tab_stop: 4,
            prev_match_key: KeyBinding::ctrl('d'),
            next_match_key: KeyBinding::ctrl('g'),
        }
    }
}

pub struct RcLoader;

impl RcLoader {
    /// Get the path to the RC file
    /// Looks for .findrusrc in:
    /// 1. Current directory
    /// 2. Home directory (~/.findrusrc)
    pub fn get_rc_path() -> Option<PathBuf> {
        let current_rc = Path::new(RC_FILE_NAME);
        if current_rc.exists() {
            return Some(current_rc.to_path_buf());
        }

        if let Ok(home) = env::var("HOME") {
            let home_rc = Path::new(&home).join(RC_FILE_NAME);
            if home_rc.exists() {
                return Some(home_rc);
            }
        }

        None
    }

    /// Load the RC file if there is one. A file that cannot be read is
    /// logged and the defaults are used.
    pub fn load_config() -> FindConfig {
        let Some(rc_path) = Self::get_rc_path() else {
            return FindConfig::default();
        };

        match Self::load_from(&rc_path) {
            Ok(config) => config,
            Err(err) => {
                warn!(%err, "ignoring rc file");
                FindConfig::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<FindConfig, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading rc file");

        let mut config = FindConfig::default();
        Self::parse_config_content(&content, &mut config);
        Ok(config)
    }

    fn parse_config_content(content: &str, config: &mut FindConfig) {
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') || line.starts_with('"') {
                continue;
            }

            Self::parse_config_line(line, config);
        }
    }

    fn parse_config_line(line: &str, config: &mut FindConfig) {
        // Remove inline comments
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        }
        .trim();

        if let Some(setting) = line.strip_prefix("set ") {
            match setting.trim() {
                "smartcase" | "scs" => config.case = CaseSetting::Smart,
                "ignorecase" | "ic" => config.case = CaseSetting::Insensitive,
                "noignorecase" | "noic" => config.case = CaseSetting::Sensitive,
                "wrapscan" | "ws" => config.wrap_search = true,
                "nowrapscan" | "nows" => config.wrap_search = false,
                other => match other.split_once('=') {
                    Some((key, value)) => Self::apply_value(key.trim(), value.trim(), config),
                    None => debug!(setting = other, "unknown rc setting"),
                },
            }
        } else if let Some((key, value)) = line.split_once('=') {
            Self::apply_value(key.trim(), value.trim(), config);
        }
    }

    fn apply_value(key: &str, value: &str, config: &mut FindConfig) {
        match key {
            "case" => {
                if let Some(case) = CaseSetting::parse(value) {
                    config.case = case;
                }
            }
            "wrap" | "wrapscan" | "wrap_search" => {
                if let Some(wrap) = parse_bool(value) {
                    config.wrap_search = wrap;
                }
            }
            "history" | "history_size" => {
                if let Ok(size @ 1..) = value.parse::<usize>() {
                    config.history_size = size;
                }
            }
            "tabstop" | "tab_stop" => {
                if let Ok(tab_stop @ 1..=16) = value.parse::<usize>() {
                    config.tab_stop = tab_stop;
                }
            }
            "prev_match_key" => match KeyBinding::parse(value) {
                Ok(binding) => config.prev_match_key = binding,
                Err(err) => warn!(%err, key, "ignoring key binding"),
            },
            "next_match_key" => match KeyBinding::parse(value) {
                Ok(binding) => config.next_match_key = binding,
                Err(err) => warn!(%err, key, "ignoring key binding"),
            },
            _ => debug!(key, "unknown rc setting"),
        }
    }

    /// Apply the configuration to a find action and the history it reads.
    pub fn apply_config(action: &mut FindAction, history: &mut StringHistory, config: &FindConfig) {
        action.set_case_setting(config.case);
        action.set_wrap_search(config.wrap_search);
        history.set_capacity(config.history_size);

        let keys = action.keys_mut();
        keys.bind(config.prev_match_key, NavAction::Previous);
        keys.bind(config.next_match_key, NavAction::Next);
    }

    /// Generate a sample RC file content
    pub fn generate_sample_rc() -> String {
        r#"# find-rus configuration file (.findrusrc)
# Lines starting with # or " are comments

# Case handling: smartcase, ignorecase or noignorecase
set smartcase

# Wrap around the ends of the document when navigating
set wrapscan           # (or set nowrapscan)

set history=50         # Remembered find patterns
set tabstop=4

# Alternative key=value syntax:
# case=smart
# wrap=true
# history=50
# prev_match_key=C-d
# next_match_key=C-g
"#
        .to_string()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
