use strum_macros::Display;

/// Lifecycle events dispatched around each test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TransactionEvent {
    #[strum(to_string = "startTestTransactionRequest")]
    StartTestTransactionRequest,
    #[strum(to_string = "endTestTransactionRequest")]
    EndTestTransactionRequest,
    #[strum(to_string = "startTransaction")]
    StartTransaction,
    #[strum(to_string = "rollbackTransaction")]
    RollbackTransaction,
}

/// Mutable request passed to observers of the two request events.
///
/// Observers only signal; the coordinator acts on the flags once every
/// observer has seen the request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionRequest {
    start_requested: bool,
    rollback_requested: bool,
}

impl TransactionRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_transaction_start(&mut self) {
        self.start_requested = true;
    }

    pub fn request_transaction_rollback(&mut self) {
        self.rollback_requested = true;
    }

    pub fn is_start_requested(&self) -> bool {
        self.start_requested
    }

    pub fn is_rollback_requested(&self) -> bool {
        self.rollback_requested
    }
}
