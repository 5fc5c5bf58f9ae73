use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConduitError {
    // Pipeline
    #[error("failed to spawn stage `{stage}`")]
    Spawn {
        stage: String,
        #[source]
        source: std::io::Error,
    },

    #[error("timed out waiting for the next element")]
    Timeout,

    #[error("pipeline cancelled")]
    Cancelled,

    // Ledger
    #[error("unknown account `{0}`")]
    UnknownAccount(String),

    #[error("insufficient funds in `{account}`: requested {requested}, available {available}")]
    InsufficientFunds {
        account:   String,
        requested: u64,
        available: u64,
    },

    #[error("ledger actor stopped")]
    ActorStopped,
}

impl ConduitError {
    /// The account this error refers to, if applicable.
    pub fn account(&self) -> Option<&str> {
        match self {
            Self::UnknownAccount(a) | Self::InsufficientFunds { account: a, .. } => Some(a),
            _ => None,
        }
    }

    /// Whether the caller can simply carry on after this error.
    ///
    /// Ledger refusals and receive timeouts leave everything intact. Spawn
    /// failures, cancellation and a dead actor mean the component is gone.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Timeout | Self::UnknownAccount(_) | Self::InsufficientFunds { .. }
        )
    }
}
