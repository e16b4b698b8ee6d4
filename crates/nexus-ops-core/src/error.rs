#[derive(Debug, thiserror::Error)]
pub enum NexusError {
    #[error("bad catalog.toml: {0}")]
    Catalog(String),

    #[error("bad pricing.toml: {0}")]
    Pricing(String),
}

pub type Result<T> = std::result::Result<T, NexusError>;
