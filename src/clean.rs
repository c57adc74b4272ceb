use crate::config::CleanerConfig;

/// Strips signatures, disclaimers and quoted thread headers from message
/// bodies.
#[derive(Debug, Clone)]
pub struct Cleaner {
    markers: Vec<String>,
}

impl Cleaner {
    pub fn new(config: &CleanerConfig) -> Self {
        let mut markers = config.noise_markers.clone();
        if config.strip_sections {
            markers.extend(config.section_markers.iter().cloned());
        }
        // An empty marker would match every line.
        markers.retain(|marker| !marker.is_empty());
        Cleaner { markers }
    }

    fn keep(&self, line: &str) -> bool {
        !line.is_empty() && !self.markers.iter().any(|marker| line.contains(marker.as_str()))
    }

    /// Returns the trimmed, non-empty lines of `body` without any line that
    /// contains a marker, joined with `\n`.
    ///
    /// Cleaning is idempotent: every kept line is already trimmed, free of
    /// line breaks and free of markers.
    pub fn clean(&self, body: &str) -> String {
        body.split(|c: char| c == '\n' || c == '\r')
            .map(str::trim)
            .filter(|line| self.keep(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
