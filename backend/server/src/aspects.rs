//! # Aspects
//!
//! Keyword lookup that files review sentences under fixed categories.
//!
//! ## Rules
//! - Categories are checked in declared order, first match wins
//! - A sentence lands in at most one category
//! - Keywords match whole words, multi-word keywords match as a contiguous phrase
//! - Categories without sentences are left out
use reviews::ReviewKind;

use crate::utils::{sentences, words};

pub struct Aspect {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const MOVIE_ASPECTS: &[Aspect] = &[
    Aspect {
        name: "acting",
        keywords: &[
            "acting", "actor", "actors", "actress", "cast", "performance", "performances", "role",
            "character", "characters",
        ],
    },
    Aspect {
        name: "plot",
        keywords: &[
            "plot", "story", "storyline", "script", "ending", "twist", "writing", "pacing",
            "narrative",
        ],
    },
    Aspect {
        name: "visuals",
        keywords: &[
            "visuals", "visual", "effects", "cgi", "cinematography", "scenery", "shots", "camera",
            "special effects",
        ],
    },
    Aspect {
        name: "music",
        keywords: &["music", "soundtrack", "score", "songs", "song", "sound"],
    },
    Aspect {
        name: "direction",
        keywords: &["director", "direction", "directed", "directing", "editing"],
    },
];

pub const PRODUCT_ASPECTS: &[Aspect] = &[
    Aspect {
        name: "quality",
        keywords: &[
            "quality", "build", "material", "materials", "durable", "sturdy", "flimsy", "broke",
            "broken", "defective",
        ],
    },
    Aspect {
        name: "price",
        keywords: &["price", "cost", "expensive", "cheap", "value", "money", "worth", "overpriced"],
    },
    Aspect {
        name: "shipping",
        keywords: &[
            "shipping", "delivery", "delivered", "arrived", "package", "packaging", "shipped",
        ],
    },
    Aspect {
        name: "service",
        keywords: &[
            "customer service", "support", "seller", "refund", "return", "warranty", "staff",
        ],
    },
    Aspect {
        name: "usability",
        keywords: &[
            "easy", "setup", "install", "instructions", "design", "use", "using", "comfortable",
            "interface",
        ],
    },
];

pub fn aspects_for(kind: ReviewKind) -> &'static [Aspect] {
    match kind {
        ReviewKind::Movie => MOVIE_ASPECTS,
        ReviewKind::Product => PRODUCT_ASPECTS,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AspectMatch {
    pub aspect: &'static str,
    pub sentences: Vec<String>,
}

impl Aspect {
    fn matches(&self, tokens: &[String]) -> bool {
        self.keywords.iter().any(|keyword| {
            let phrase: Vec<&str> = keyword.split_whitespace().collect();

            tokens
                .windows(phrase.len())
                .any(|window| window.iter().zip(&phrase).all(|(a, b)| a == b))
        })
    }
}

/// Groups the sentences of `text` under the aspects of `kind`, in declared order.
pub fn extract(text: &str, kind: ReviewKind) -> Vec<AspectMatch> {
    let table = aspects_for(kind);
    let mut buckets: Vec<Vec<String>> = vec![Vec::new(); table.len()];

    for sentence in sentences(text) {
        let tokens = words(&sentence);

        if let Some(index) = table.iter().position(|aspect| aspect.matches(&tokens)) {
            buckets[index].push(sentence);
        }
    }

    table
        .iter()
        .zip(buckets)
        .filter(|(_, sentences)| !sentences.is_empty())
        .map(|(aspect, sentences)| AspectMatch {
            aspect: aspect.name,
            sentences,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_aspects_in_declared_order() {
        let found = extract(
            "The soundtrack was haunting. The cast was superb! Plot made no sense.",
            ReviewKind::Movie,
        );

        let names: Vec<&str> = found.iter().map(|m| m.aspect).collect();
        assert_eq!(names, vec!["acting", "plot", "music"]);
        assert_eq!(found[0].sentences, vec!["The cast was superb"]);
    }

    #[test]
    fn test_first_match_wins() {
        // "actors" (acting) and "story" (plot) share a sentence
        let found = extract("The actors carried a weak story.", ReviewKind::Movie);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].aspect, "acting");
    }

    #[test]
    fn test_sentences_grouped() {
        let found = extract(
            "Delivery took ages. Great build quality. The package was crushed.",
            ReviewKind::Product,
        );

        assert_eq!(found[0].aspect, "quality");
        assert_eq!(found[1].aspect, "shipping");
        assert_eq!(
            found[1].sentences,
            vec!["Delivery took ages", "The package was crushed"]
        );
    }

    #[test]
    fn test_newline_separates_sentences() {
        let found = extract("Great cast\nBoring plot", ReviewKind::Movie);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].sentences, vec!["Great cast"]);
        assert_eq!(found[1].sentences, vec!["Boring plot"]);
    }

    #[test]
    fn test_multi_word_keyword() {
        let found = extract("Customer service never answered", ReviewKind::Product);
        assert_eq!(found[0].aspect, "service");

        assert!(extract("The customer was rude", ReviewKind::Product).is_empty());
    }

    #[test]
    fn test_whole_words_only() {
        // "used" is not "use", "scored" is not "score"
        assert!(extract("I used it once", ReviewKind::Product).is_empty());
        assert!(extract("The team scored late", ReviewKind::Movie).is_empty());
    }

    #[test]
    fn test_kind_selects_table() {
        assert!(extract("The price is right", ReviewKind::Movie).is_empty());
        assert_eq!(
            extract("The price is right", ReviewKind::Product)[0].aspect,
            "price"
        );
    }
}
