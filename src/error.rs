#[derive(thiserror::Error, Debug)]
pub enum CacheError {
    #[error("Invalid sample range [{from}, {to}) for series '{label}'")]
    InvalidRange { label: String, from: u64, to: u64 },
    #[error("Internal error")]
    Other(#[from] anyhow::Error),
}
