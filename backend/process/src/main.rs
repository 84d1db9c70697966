use std::path::PathBuf;

use clap::Parser;
use process::models::ENDPOINT;
use reviews::ReviewKind;

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Product,
    Movie,
}

impl From<Kind> for ReviewKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Product => ReviewKind::Product,
            Kind::Movie => ReviewKind::Movie,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One review per line, plain text or JSON
    file: PathBuf,

    #[arg(long, default_value = ENDPOINT)]
    endpoint: String,

    /// Kind for lines that do not name one
    #[arg(long, value_enum, default_value_t = Kind::Product)]
    kind: Kind,

    #[arg(long, default_value_t = 50)]
    batch_size: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    process::load_reviews(&args.file, &args.endpoint, args.kind.into(), args.batch_size).await?;

    Ok(())
}
