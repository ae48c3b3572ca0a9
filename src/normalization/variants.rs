use indexmap::IndexSet;
use itertools::Itertools;
use regex::Regex;

/// Expands a raw title into the surface forms worth trying against a
/// catalog, in priority order: the title itself, a cleaned form with
/// separator and attribution tails removed, an acronym-spaced form of that,
/// and any subtitle segment long enough to stand alone.
pub struct VariantGenerator {
    separators: Regex,
    attribution: Regex,
    trailing_punctuation: Regex,
    letter_digit: Regex,
    digit_letter: Regex,
    subtitle: Regex,
}

impl Default for VariantGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantGenerator {
    pub fn new() -> Self {
        Self {
            separators: Regex::new(r"[/(\[;]").expect("static pattern"),
            attribution: Regex::new(r"\b(?:by|developed by|written by|produced by|from)\b.*")
                .expect("static pattern"),
            trailing_punctuation: Regex::new(r"[:\-]+$").expect("static pattern"),
            letter_digit: Regex::new(r"([A-Za-z])(\d)").expect("static pattern"),
            digit_letter: Regex::new(r"(\d)([A-Za-z])").expect("static pattern"),
            subtitle: Regex::new(r"[:\-]").expect("static pattern"),
        }
    }

    /// Ordered, deduplicated variant list. Empty entries are dropped; the
    /// list is rebuilt on every call.
    pub fn generate(&self, title: &str) -> Vec<String> {
        let base = title.trim().to_lowercase();
        let clean = self.clean(&base);
        let acronyms = self.space_acronyms(&clean);

        let mut ordered: IndexSet<String> = IndexSet::new();
        for form in [base.clone(), clean, acronyms] {
            if !form.is_empty() {
                ordered.insert(form);
            }
        }
        // The segment after a subtitle separator often carries the real title.
        for part in self.subtitle.split(&base) {
            let part = part.trim();
            if part.chars().count() > 3 {
                ordered.insert(part.to_string());
            }
        }
        ordered.into_iter().collect()
    }

    /// Truncates at the first separator, drops attribution tails
    /// ("/ developed by ..."), and tidies leftover punctuation.
    fn clean(&self, title: &str) -> String {
        let head = match self.separators.find(title) {
            Some(m) => &title[..m.start()],
            None => title,
        };
        let without_attribution = self.attribution.replace(head, "");
        let without_tail = self
            .trailing_punctuation
            .replace(without_attribution.trim(), "");
        let collapsed = without_tail.split_whitespace().join(" ");
        collapsed
            .trim_matches(|c: char| matches!(c, ' ' | ':' | ';' | '-' | ','))
            .to_string()
    }

    /// Inserts a boundary between letter and digit runs so "pes2017" also
    /// surfaces as "pes 2017".
    fn space_acronyms(&self, title: &str) -> String {
        let spaced = self.letter_digit.replace_all(title, "${1} ${2}");
        self.digit_letter.replace_all(&spaced, "${1} ${2}").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaces_acronym_digits() {
        let variants = VariantGenerator::new().generate("PES2017");
        assert_eq!(variants, vec!["pes2017".to_string(), "pes 2017".to_string()]);
    }

    #[test]
    fn splits_subtitles_longer_than_three_chars() {
        let variants =
            VariantGenerator::new().generate("Metal Gear Solid: Snake Eater");
        assert!(variants.contains(&"metal gear solid: snake eater".to_string()));
        assert!(variants.contains(&"metal gear solid".to_string()));
        assert!(variants.contains(&"snake eater".to_string()));
    }

    #[test]
    fn truncates_at_separator() {
        let variants = VariantGenerator::new().generate("Cat Quest / The Gentlebros.");
        assert_eq!(variants[0], "cat quest / the gentlebros.");
        assert!(variants.contains(&"cat quest".to_string()));
    }

    #[test]
    fn drops_attribution_tail() {
        let variants = VariantGenerator::new().generate("Destiny by Bungie");
        assert!(variants.contains(&"destiny".to_string()));
    }

    #[test]
    fn never_emits_duplicates_or_empties() {
        for title in ["Halo", "a: b", "", "   ", "/ ("] {
            let variants = VariantGenerator::new().generate(title);
            let unique: IndexSet<&String> = variants.iter().collect();
            assert_eq!(unique.len(), variants.len(), "duplicates for {title:?}");
            assert!(variants.iter().all(|v| !v.is_empty()));
        }
    }

    #[test]
    fn short_subtitle_segments_are_skipped() {
        let variants = VariantGenerator::new().generate("X-Com");
        assert_eq!(variants, vec!["x-com".to_string()]);
    }
}
