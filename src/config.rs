use serde::{Deserialize, Serialize};

/// Minimum corrected score for a platform match to be accepted.
pub const DEFAULT_PLATFORM_THRESHOLD: f64 = 50.0;

/// Divisor applied when the token-set ratio reports a perfect score for two
/// strings that are not literally equal. Empirically tuned upstream; kept
/// overridable rather than derived.
pub const DEFAULT_SUSPICIOUS_EXACT_DIVISOR: f64 = 1.75;

/// Tuning for the resolution pipeline. Every field has a serde default, so a
/// partial JSON override file works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Manufacturer names stripped from labels before platform comparison.
    pub manufacturer_tokens: Vec<String>,
    /// Keywords marking a label as a PC-family platform, outside the console
    /// taxonomy.
    pub pc_platform_keywords: Vec<String>,
    /// When set, platform resolution returns no-match for PC-family labels
    /// without scoring them.
    pub skip_pc_platforms: bool,
    /// Rejection floor for platform resolution.
    pub platform_threshold: f64,
    /// Optional rejection floor for catalog-candidate resolution. `None`
    /// keeps the historical behavior of always selecting a best candidate.
    pub candidate_threshold: Option<f64>,
    /// See [`DEFAULT_SUSPICIOUS_EXACT_DIVISOR`].
    pub suspicious_exact_divisor: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            manufacturer_tokens: ["nintendo", "microsoft", "sony", "sega"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            pc_platform_keywords: ["windows", "pc", "macintosh", "dos", "cd-rom", "mac", "ibm"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            skip_pc_platforms: false,
            platform_threshold: DEFAULT_PLATFORM_THRESHOLD,
            candidate_threshold: None,
            suspicious_exact_divisor: DEFAULT_SUSPICIOUS_EXACT_DIVISOR,
        }
    }
}

impl MatchConfig {
    /// Whether a label names a PC-family platform ("windows", "dos", ...).
    /// Those live outside the console reference set and should be skipped
    /// rather than force-matched.
    pub fn is_pc_platform(&self, label: &str) -> bool {
        let lower = label.to_lowercase();
        self.pc_platform_keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}
