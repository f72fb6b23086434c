//! Per-query search session

use super::cancellable::Cancellable;
use crate::provider::ResultId;
use std::collections::HashMap;
use uuid::Uuid;

/// Lifecycle of a single search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Started,
    Cancelled,
    Completed,
}

/// One query's terms, cancellation signal and the ids each provider returned
#[derive(Debug)]
pub struct SearchSession {
    id: Uuid,
    terms: Vec<String>,
    cancellable: Cancellable,
    state: SessionState,
    results: HashMap<String, Vec<ResultId>>,
}

impl SearchSession {
    pub fn new(terms: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            terms,
            cancellable: Cancellable::new(),
            state: SessionState::Started,
            results: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn cancellable(&self) -> &Cancellable {
        &self.cancellable
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Result ids a provider returned in this session
    pub fn results_for(&self, provider_id: &str) -> &[ResultId] {
        self.results
            .get(provider_id)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Cancel a running session; terminal sessions are left alone
    pub fn cancel(&mut self) {
        if self.state == SessionState::Started {
            self.state = SessionState::Cancelled;
            self.cancellable.cancel();
        }
    }

    /// Record results and finish a running session.
    ///
    /// Returns false when the session was already cancelled, in which case
    /// the results are dropped.
    pub fn complete(&mut self, results: HashMap<String, Vec<ResultId>>) -> bool {
        if self.state != SessionState::Started || self.cancellable.is_cancelled() {
            self.state = SessionState::Cancelled;
            return false;
        }
        self.results = results;
        self.state = SessionState::Completed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms() -> Vec<String> {
        vec!["rust".to_string()]
    }

    #[test]
    fn test_complete_records_results() {
        let mut session = SearchSession::new(terms());
        let mut results = HashMap::new();
        results.insert("web".to_string(), vec!["Web Search".to_string()]);

        assert!(session.complete(results));
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.results_for("web"), ["Web Search".to_string()]);
        assert!(session.results_for("other").is_empty());
    }

    #[test]
    fn test_cancel_is_terminal() {
        let mut session = SearchSession::new(terms());
        session.cancel();

        assert!(session.cancellable().is_cancelled());
        assert!(!session.complete(HashMap::new()));
        assert_eq!(session.state(), SessionState::Cancelled);
    }

    #[test]
    fn test_cancel_after_complete_is_ignored() {
        let mut session = SearchSession::new(terms());
        assert!(session.complete(HashMap::new()));
        session.cancel();

        assert_eq!(session.state(), SessionState::Completed);
        assert!(!session.cancellable().is_cancelled());
    }
}
