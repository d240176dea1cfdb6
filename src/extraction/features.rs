// ============================================================
// Layer 5 - Feature Extractor
// ============================================================
// Turns a finalised Example into features for a label-dependent
// ranking model:
//
//   shared features      describe the source side (phrase,
//                        context window, syntax), the same for
//                        every candidate
//   candidate features   describe one target candidate
//
// Feature names are built from template prefixes joined with '^',
// e.g. "srcext^L1^0^the" = left context, distance 1, factor 0.
// Escaping for a particular output format is the sink's job.

use std::collections::BTreeSet;

use crate::domain::phrase_group::{Example, SentenceContext, TranslationCandidate};
use crate::domain::extractor_config::ExtractorConfig;

const SENTENCE_START: &str = "<s>";
const SENTENCE_END:   &str = "</s>";

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub name:  String,
    pub value: f32,
}

impl Feature {
    pub fn indicator(name: impl Into<String>) -> Self {
        Self { name: name.into(), value: 1.0 }
    }

    pub fn real(name: impl Into<String>, value: f32) -> Self {
        Self { name: name.into(), value }
    }
}

/// All features of one example.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExampleFeatures {
    pub shared:     Vec<Feature>,
    /// One list per candidate, in candidate order
    pub candidates: Vec<Vec<Feature>>,
}

pub struct FeatureExtractor {
    config: ExtractorConfig,
}

impl FeatureExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn extract(&self, example: &Example) -> ExampleFeatures {
        ExampleFeatures {
            shared:     self.shared_features(example),
            candidates: example
                .candidates
                .iter()
                .map(|c| self.candidate_features(c))
                .collect(),
        }
    }

    fn shared_features(&self, ex: &Example) -> Vec<Feature> {
        let flags   = &self.config.features;
        let factors = self.config.factor_count();
        let mut out = Vec::new();

        if flags.source_indicator {
            out.push(Feature::indicator(format!("srcphr^{}", join_words(&ex.source_phrase))));
        }

        if flags.source_internal {
            for pos in ex.span_start..=ex.span_end {
                for f in 0..factors {
                    if let Some(w) = ex.context.factor(pos, f) {
                        out.push(Feature::indicator(format!("srcint^{f}^{w}")));
                    }
                }
            }
        }

        if flags.source_external {
            for dist in 1..=self.config.window_size {
                for f in 0..factors {
                    let left  = ex.span_start.checked_sub(dist).and_then(|p| ex.context.factor(p, f));
                    let right = ex.context.factor(ex.span_end + dist, f);
                    out.push(Feature::indicator(format!(
                        "srcext^L{dist}^{f}^{}",
                        left.unwrap_or(SENTENCE_START)
                    )));
                    out.push(Feature::indicator(format!(
                        "srcext^R{dist}^{f}^{}",
                        right.unwrap_or(SENTENCE_END)
                    )));
                }
            }
        }

        if flags.bag_of_words {
            for name in bag_of_words(&ex.context, factors) {
                out.push(Feature::indicator(name));
            }
        }

        if flags.syntax {
            for label in &ex.syntax_features {
                out.push(Feature::indicator(format!("syn^{label}")));
            }
            out.push(Feature::indicator(format!("parent^{}", ex.parent_label)));
            out.push(Feature::indicator(format!("span^{}", ex.span_bucket)));
        }

        out
    }

    fn candidate_features(&self, cand: &TranslationCandidate) -> Vec<Feature> {
        let flags   = &self.config.features;
        let mut out = Vec::new();

        if flags.target_indicator {
            out.push(Feature::indicator(format!("tgtphr^{}", join_words(&cand.phrase))));
        }
        if flags.target_internal {
            for w in cand.phrase.split_whitespace() {
                out.push(Feature::indicator(format!("tgtint^{w}")));
            }
        }
        if flags.scores {
            for (i, score) in cand.scores.iter().enumerate() {
                out.push(Feature::real(format!("p{i}"), *score));
            }
        }
        out
    }
}

fn join_words(phrase: &str) -> String {
    phrase.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Distinct "bow^factor^word" names, sorted for stable output.
fn bag_of_words(context: &SentenceContext, factors: usize) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    for token in &context.tokens {
        for (f, w) in token.iter().enumerate().take(factors) {
            names.insert(format!("bow^{f}^{w}"));
        }
    }
    names
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::context::read_factored_line;
    use crate::domain::extractor_config::FeatureFlags;

    fn example() -> Example {
        Example {
            sentence_index:  1,
            context:         read_factored_line("a|DT big|JJ cat|NN sat|VBD", 2).unwrap(),
            source_phrase:   "big cat".into(),
            syntax_features: vec!["NML".into()],
            parent_label:    "NP".into(),
            span_bucket:     2,
            span_start:      1,
            span_end:        2,
            candidates:      vec![
                TranslationCandidate::new(3, "gros chat").with_scores(vec![0.5, 0.25]),
                TranslationCandidate::new(7, "chat"),
            ],
            losses:          vec![0.0, 1.0],
        }
    }

    fn config(flags: FeatureFlags) -> ExtractorConfig {
        ExtractorConfig { factors: vec!["w".into(), "pos".into()], window_size: 1, features: flags }
    }

    fn names(features: &[Feature]) -> Vec<&str> {
        features.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_one_candidate_list_per_candidate() {
        let fx = FeatureExtractor::new(config(FeatureFlags::default()));
        let features = fx.extract(&example());
        assert_eq!(features.candidates.len(), 2);
    }

    #[test]
    fn test_context_window_with_padding() {
        let fx     = FeatureExtractor::new(config(FeatureFlags::default()));
        let shared = fx.extract(&example()).shared;
        let shared = names(&shared);
        assert!(shared.contains(&"srcext^L1^0^a"));
        assert!(shared.contains(&"srcext^R1^1^VBD"));
        assert!(shared.contains(&"srcint^1^NN"));
        assert!(shared.contains(&"srcphr^big_cat"));
    }

    #[test]
    fn test_window_past_sentence_edge_uses_boundary_markers() {
        let mut cfg     = config(FeatureFlags::default());
        cfg.window_size = 3;
        let shared      = FeatureExtractor::new(cfg).extract(&example()).shared;
        let shared      = names(&shared);
        assert!(shared.contains(&"srcext^L2^0^<s>"));
        assert!(shared.contains(&"srcext^R3^0^</s>"));
    }

    #[test]
    fn test_syntax_templates() {
        let shared = FeatureExtractor::new(config(FeatureFlags::default())).extract(&example()).shared;
        let shared = names(&shared);
        assert!(shared.contains(&"syn^NML"));
        assert!(shared.contains(&"parent^NP"));
        assert!(shared.contains(&"span^2"));
    }

    #[test]
    fn test_scores_are_real_valued() {
        let features = FeatureExtractor::new(config(FeatureFlags::default())).extract(&example());
        assert!(features.candidates[0].contains(&Feature::real("p1", 0.25)));
        assert!(features.candidates[1].iter().all(|f| !f.name.starts_with('p')));
    }

    #[test]
    fn test_disabled_templates_fire_nothing() {
        let flags = FeatureFlags {
            source_indicator: false,
            source_internal:  false,
            source_external:  false,
            bag_of_words:     false,
            syntax:           false,
            target_indicator: false,
            target_internal:  false,
            scores:           false,
        };
        let features = FeatureExtractor::new(config(flags)).extract(&example());
        assert!(features.shared.is_empty());
        assert!(features.candidates.iter().all(Vec::is_empty));
    }

    #[test]
    fn test_bag_of_words_is_deduplicated() {
        let ctx = read_factored_line("a|DT a|DT b|NN", 2).unwrap();
        let bow = bag_of_words(&ctx, 2);
        assert_eq!(bow.len(), 4);
        assert!(bow.contains("bow^1^NN"));
    }
}
