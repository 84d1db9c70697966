use reviews::ReviewKind;
use serde::Deserialize;

pub const ENDPOINT: &str = "http://localhost:1111";

pub const BATCH_PATH: &str = "/analyze/batch";

/// JSON form of an import line, plain text lines skip this.
#[derive(Deserialize)]
pub struct ImportLine {
    pub text: String,

    #[serde(default)]
    pub kind: Option<ReviewKind>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub skipped: usize,
}

impl Summary {
    pub fn stored(&self) -> usize {
        self.positive + self.negative + self.neutral
    }
}
