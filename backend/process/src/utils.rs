use reviews::{AnalyzeRequest, Review, ReviewKind, Sentiment};

use crate::models::{ImportLine, Summary};

/// Blank lines give `None`. Lines starting with `{` must be a JSON object with `text`.
pub fn parse_line(
    line: &str,
    default_kind: ReviewKind,
) -> Result<Option<AnalyzeRequest>, serde_json::Error> {
    let line = line.trim();

    if line.is_empty() {
        return Ok(None);
    }

    if line.starts_with('{') {
        let parsed: ImportLine = serde_json::from_str(line)?;

        return Ok(Some(AnalyzeRequest::new(
            parsed.text,
            parsed.kind.unwrap_or(default_kind),
        )));
    }

    Ok(Some(AnalyzeRequest::new(line, default_kind)))
}

/// Parses every line, counting unreadable JSON lines as skipped.
pub fn parse_lines(contents: &str, default_kind: ReviewKind) -> (Vec<AnalyzeRequest>, usize) {
    let mut requests = Vec::new();
    let mut skipped = 0;

    for (number, line) in contents.lines().enumerate() {
        match parse_line(line, default_kind) {
            Ok(Some(request)) => requests.push(request),
            Ok(None) => {}
            Err(e) => {
                eprintln!("Skipping line {}: {e}", number + 1);
                skipped += 1;
            }
        }
    }

    (requests, skipped)
}

pub fn tally(summary: &mut Summary, stored: &[Review]) {
    for review in stored {
        match review.sentiment {
            Sentiment::Positive => summary.positive += 1,
            Sentiment::Negative => summary.negative += 1,
            Sentiment::Neutral => summary.neutral += 1,
        }
    }
}

pub fn batch_url(endpoint: &str) -> String {
    format!("{}{}", endpoint.trim_end_matches('/'), crate::models::BATCH_PATH)
}
