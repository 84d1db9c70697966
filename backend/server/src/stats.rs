use std::collections::{BTreeMap, HashMap};

use reviews::{
    AspectStats, KindBreakdown, ReviewKind, Sentiment, SentimentBreakdown, SentimentShare, Stats,
};

use crate::database::TOTAL_FIELD;

fn count(counters: &HashMap<String, i64>, field: &str) -> u64 {
    counters.get(field).copied().unwrap_or(0).max(0) as u64
}

fn share(count: u64, total: u64) -> SentimentShare {
    let percentage = if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64 * 1000.0).round() / 10.0
    };

    SentimentShare { count, percentage }
}

/// Builds the stats payload from raw `reviews:stats` counters.
pub fn from_counters(counters: &HashMap<String, i64>) -> Stats {
    let total = count(counters, TOTAL_FIELD);

    let sentiment = |s: Sentiment| {
        share(count(counters, &format!("sentiment:{}", s.as_str())), total)
    };
    let kind = |k: ReviewKind| count(counters, &format!("kind:{}", k.as_str()));

    let mut aspects: BTreeMap<&str, AspectStats> = BTreeMap::new();
    for (field, value) in counters {
        let Some(rest) = field.strip_prefix("aspect:") else {
            continue;
        };
        let Some((name, metric)) = rest.rsplit_once(':') else {
            continue;
        };

        let entry = aspects.entry(name).or_insert_with(|| AspectStats {
            aspect: name.to_string(),
            ..Default::default()
        });
        let value = (*value).max(0) as u64;

        match metric {
            "mentions" => entry.mentions = value,
            "positive" => entry.positive = value,
            "negative" => entry.negative = value,
            "neutral" => entry.neutral = value,
            _ => {}
        }
    }

    let mut aspects: Vec<AspectStats> = aspects
        .into_values()
        .filter(|aspect| aspect.mentions > 0)
        .collect();
    // BTreeMap already ordered names, stable sort keeps it for ties
    aspects.sort_by(|a, b| b.mentions.cmp(&a.mentions));

    Stats {
        total,
        sentiments: SentimentBreakdown {
            positive: sentiment(Sentiment::Positive),
            negative: sentiment(Sentiment::Negative),
            neutral: sentiment(Sentiment::Neutral),
        },
        kinds: KindBreakdown {
            product: kind(ReviewKind::Product),
            movie: kind(ReviewKind::Movie),
        },
        aspects,
    }
}
