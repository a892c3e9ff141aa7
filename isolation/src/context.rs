/// Whether a transaction is currently open around the running test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IsolationState {
    active: bool,
}

impl IsolationState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

/// Per-run state handed to every lifecycle hook.
///
/// One context lives for a whole test run; the isolation flag is reset
/// through the rollback hook between tests.
#[derive(Debug, Default)]
pub struct RunContext {
    isolation: IsolationState,
    tests_started: usize,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn isolation_mut(&mut self) -> &mut IsolationState {
        &mut self.isolation
    }

    pub fn is_isolation_active(&self) -> bool {
        self.isolation.is_active()
    }

    pub fn tests_started(&self) -> usize {
        self.tests_started
    }

    pub(crate) fn record_test_start(&mut self) {
        self.tests_started += 1;
    }
}
