use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a run can be tuned with. Every field has a built-in default, so
/// a config file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Subject keywords used when neither a preset nor custom keywords are
    /// chosen.
    pub keywords: Vec<String>,
    pub cleaner: CleanerConfig,
    #[serde(rename = "preset")]
    pub presets: Vec<Preset>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// A line containing any of these is dropped.
    pub noise_markers: Vec<String>,
    /// Quoted message headers and banners, dropped when `strip_sections` is
    /// set.
    pub section_markers: Vec<String>,
    pub strip_sections: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Preset {
    pub name: String,
    pub keywords: Vec<String>,
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

const DEFAULT_KEYWORDS: &[&str] = &[
    "Shift Report",
    "Maintenance shift report",
    "mech shift report",
];

impl Default for Config {
    fn default() -> Self {
        Config {
            keywords: strings(DEFAULT_KEYWORDS),
            cleaner: CleanerConfig::default(),
            presets: vec![
                Preset {
                    name: "all".to_string(),
                    keywords: strings(DEFAULT_KEYWORDS),
                },
                Preset {
                    name: "maintenance".to_string(),
                    keywords: strings(&["Maintenance shift report"]),
                },
                Preset {
                    name: "mechanical".to_string(),
                    keywords: strings(&["mech shift report"]),
                },
            ],
        }
    }
}

impl Default for CleanerConfig {
    fn default() -> Self {
        CleanerConfig {
            noise_markers: strings(&[
                "*",
                "<",
                "Confidentiality Warning",
                "AUTOMATION TECHNICIAN",
            ]),
            section_markers: strings(&[
                "Sent:",
                "Subject:",
                "From:",
                "To:",
                "Date:",
                "SHIFT REPORT",
            ]),
            strip_sections: true,
        }
    }
}

impl Config {
    /// Looks a preset up by name, ignoring case. Names are unique in a parsed
    /// config, so at most one preset matches.
    pub fn preset(&self, name: &str) -> Option<&Preset> {
        self.presets
            .iter()
            .find(|preset| preset.name.eq_ignore_ascii_case(name))
    }

    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        for (index, preset) in config.presets.iter().enumerate() {
            let earlier = &config.presets[..index];
            if earlier.iter().any(|p| p.name.eq_ignore_ascii_case(&preset.name)) {
                bail!("duplicate preset name {:?}", preset.name);
            }
        }
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("shift-reports").join("config.toml"))
}

/// Loads the configuration. An explicitly given file must exist; the default
/// location is only used when a file is present there.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(Config::default()),
        },
    };
    let s = fs::read_to_string(&path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    let config = Config::parse(&s)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
