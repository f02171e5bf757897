use anyhow::Result;

use super::config_model::{Cancellation, DotEnvyConfig};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let cancellation = Cancellation {
        delay_seconds: std::env::var("CANCELLATION_DELAY_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()?,
    };

    Ok(DotEnvyConfig { cancellation })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_absent() {
        let config = load().unwrap();
        assert!(config.cancellation.delay_seconds > 0);
    }
}
