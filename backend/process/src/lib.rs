//! # Review Import
//!
//! Feeds a file of reviews through the running server, mostly to seed a fresh
//! Redis with something to chart.
//!
//! ## Input
//! - One review per line
//! - Plain text, or a JSON object `{"text": "...", "kind": "movie"}`
//! - Blank lines are ignored, unreadable JSON lines are skipped and counted
//!
//! ## Flow
//! 1. Parse the whole file up front so bad lines are reported before anything is sent.
//!
//! 2. Chunk into batches no larger than the server's `MAX_BATCH`.
//!
//! 3. POST each chunk to `/analyze/batch`. A rejected chunk stops the import, earlier
//!    chunks stay stored.
//!
//! 4. Tally the returned sentiments.
use std::{fs, path::Path};

use anyhow::{Context, Error, bail};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

pub mod models;
pub mod utils;

use models::Summary;
use reviews::{AnalyzeRequest, BatchRequest, Review, ReviewKind};
use utils::{batch_url, parse_lines, tally};

pub async fn load_reviews(
    path: &Path,
    endpoint: &str,
    kind: ReviewKind,
    batch_size: usize,
) -> Result<Summary, Error> {
    if batch_size == 0 {
        bail!("Batch size must be at least 1");
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let (requests, skipped) = parse_lines(&contents, kind);

    println!("Loaded Reviews: {}", requests.len());
    println!("Skipped Lines: {}\n", skipped);

    let mut summary = Summary {
        skipped,
        ..Default::default()
    };

    if requests.is_empty() {
        println!("No reviews found. Exiting.");
        return Ok(summary);
    }

    let client = Client::new();
    let url = batch_url(endpoint);

    let pb = ProgressBar::new(requests.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    for chunk in requests.chunks(batch_size) {
        pb.set_message(format!("Sending {} reviews", chunk.len()));

        let stored = send_batch(&client, &url, chunk.to_vec()).await?;
        tally(&mut summary, &stored);

        pb.inc(chunk.len() as u64);
    }

    pb.finish_with_message("Done");

    println!("\nStored: {}", summary.stored());
    println!("Positive: {}", summary.positive);
    println!("Negative: {}", summary.negative);
    println!("Neutral: {}", summary.neutral);

    Ok(summary)
}

async fn send_batch(
    client: &Client,
    url: &str,
    reviews: Vec<AnalyzeRequest>,
) -> Result<Vec<Review>, Error> {
    let res = client
        .post(url)
        .json(&BatchRequest { reviews })
        .send()
        .await
        .with_context(|| format!("Failed to reach {url}"))?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        bail!("Server rejected batch with {status}: {body}");
    }

    Ok(res.json().await?)
}

#[cfg(test)]
mod tests {
    use std::{env, net::SocketAddr, path::PathBuf};

    use axum::{Json, Router, routing::post};
    use chrono::Utc;
    use reviews::Sentiment;
    use tokio::net::TcpListener;

    use super::*;

    fn write_input(name: &str, contents: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("process-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();

        path
    }

    async fn stub_server() -> SocketAddr {
        let app = Router::new().route(
            "/analyze/batch",
            post(|Json(batch): Json<BatchRequest>| async move {
                let stored: Vec<Review> = batch
                    .reviews
                    .into_iter()
                    .enumerate()
                    .map(|(i, request)| Review {
                        id: i as u64 + 1,
                        sentiment: if request.text.contains("bad") {
                            Sentiment::Negative
                        } else {
                            Sentiment::Positive
                        },
                        text: request.text,
                        kind: request.kind,
                        confidence: 0.9,
                        aspects: Vec::new(),
                        created_at: Utc::now(),
                    })
                    .collect();

                Json(stored)
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        address
    }

    #[tokio::test]
    async fn test_load_reviews() {
        let address = stub_server().await;
        let path = write_input("load", "good\nbad one\n\n{oops\n{\"text\": \"fine\"}\n");

        let summary = load_reviews(&path, &format!("http://{address}"), ReviewKind::Product, 2)
            .await
            .unwrap();

        assert_eq!(
            summary,
            Summary {
                positive: 2,
                negative: 1,
                neutral: 0,
                skipped: 1,
            }
        );

        fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_rejects_zero_batch() {
        let path = write_input("zero", "good\n");

        assert!(
            load_reviews(&path, "http://localhost:1", ReviewKind::Product, 0)
                .await
                .is_err()
        );

        fs::remove_file(path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file() {
        let path = env::temp_dir().join("process-definitely-missing.txt");

        assert!(
            load_reviews(&path, "http://localhost:1", ReviewKind::Product, 10)
                .await
                .is_err()
        );
    }
}
