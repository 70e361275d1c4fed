use anyhow::Result;
use tracing_subscriber::EnvFilter;

pub fn setup_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_repeated_setup_fails_without_panicking() {
        assert!(super::setup_tracing().is_ok());
        assert!(super::setup_tracing().is_err());
    }
}
