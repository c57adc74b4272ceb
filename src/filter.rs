use crate::config::Config;
use std::fmt;
use thiserror::Error;

/// The subject keywords of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    keywords: Vec<String>,
    lowered: Vec<String>,
}

impl FilterSet {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords: Vec<String> = keywords.into_iter().map(Into::into).collect();
        let lowered = keywords.iter().map(|k| k.to_lowercase()).collect();
        FilterSet { keywords, lowered }
    }

    /// Parses a comma separated keyword list. Pieces are trimmed and empty
    /// pieces are dropped.
    pub fn parse_custom(s: &str) -> Result<Self, SelectionError> {
        let keywords: Vec<&str> = s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(SelectionError::EmptyCustom);
        }
        Ok(FilterSet::new(keywords))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Whether any keyword occurs in `subject`, ignoring case.
    pub fn matches(&self, subject: &str) -> bool {
        if self.lowered.is_empty() {
            return false;
        }
        let subject = subject.to_lowercase();
        self.lowered.iter().any(|k| subject.contains(k.as_str()))
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.keywords().join(", "))
    }
}

/// How the keywords of a run are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Default,
    Preset(String),
    Custom(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("custom keywords must not be empty")]
    EmptyCustom,
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
}

impl Selection {
    pub fn resolve(&self, config: &Config) -> Result<FilterSet, SelectionError> {
        match self {
            Selection::Default => Ok(FilterSet::new(config.keywords.iter().cloned())),
            Selection::Preset(name) => config
                .preset(name)
                .map(|preset| FilterSet::new(preset.keywords.iter().cloned()))
                .ok_or_else(|| SelectionError::UnknownPreset(name.clone())),
            Selection::Custom(s) => FilterSet::parse_custom(s),
        }
    }
}
