use regex::Regex;

/// Patterns matching runtime banner lines printed by llama.cpp based runtimes.
pub const DEFAULT_NOISE_PATTERNS: &[&str] = &["(?i)llama", "AVX"];

/// Drops log-noise lines from stderr before it is used as a fallback output.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    patterns: Vec<Regex>,
}

impl NoiseFilter {
    /// Compile a filter from regular expressions; a line matching any of them is noise.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|pattern| Regex::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(NoiseFilter { patterns })
    }

    pub fn is_noise(&self, line: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(line))
    }

    /// Keep the lines that are not noise, joined with `\n`.
    pub fn filter(&self, text: &str) -> String {
        text.lines()
            .filter(|line| !self.is_noise(line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        NoiseFilter {
            patterns: DEFAULT_NOISE_PATTERNS
                .iter()
                .filter_map(|pattern| Regex::new(pattern).ok())
                .collect(),
        }
    }
}
