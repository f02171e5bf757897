#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub cancellation: Cancellation,
}

#[derive(Debug, Clone)]
pub struct Cancellation {
    /// Delay before the deferred cancellation check re-reads the state.
    pub delay_seconds: u64,
}
