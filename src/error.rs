use thiserror::Error;

/// Rejections raised while building a weighted sampler.
#[derive(Debug, Error, PartialEq)]
pub enum ProbError {
    #[error("weights slice is empty")]
    Empty,
    #[error("weights contain a negative value at index {index}: {value}")]
    Negative { index: usize, value: f64 },
    #[error("weights contain a non-finite value at index {index}: {value}")]
    NonFinite { index: usize, value: f64 },
    #[error("sum of weights is zero")]
    ZeroSum,
}

/// Problems with a rank table, found while loading or validating it.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("rank table has no ranks")]
    EmptyTable,
    #[error("rank `{0}` appears more than once")]
    DuplicateRank(String),
    #[error("rank `{0}` has no values")]
    EmptyValues(String),
    #[error("rank `{rank}` has {values} values but {weights} weights")]
    LengthMismatch {
        rank: String,
        values: usize,
        weights: usize,
    },
    #[error("tier weights: {0}")]
    TierWeights(#[source] ProbError),
    #[error("value weights of rank `{rank}`: {source}")]
    ValueWeights {
        rank: String,
        #[source]
        source: ProbError,
    },
    #[error("parse rank table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("read rank table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum GachaError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error("gacha system has not been set up")]
    Uninitialized,
    #[error("invalid pull count: {0}")]
    InvalidArgument(String),
}
