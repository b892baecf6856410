//! Items-source abstraction: where the records to export come from.

use std::sync::Mutex;

use super::Record;

/// Snapshot of an asynchronous data source at a point in time.
///
/// The export path reads exactly one snapshot per invocation and never
/// mutates it; driving the state machine is the owner's business.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum FetchState<T> {
    /// No fetch has been attempted yet.
    #[default]
    NotAsked,
    /// A fetch is in flight.
    Loading,
    /// The fetch completed with a payload.
    Success(T),
    /// The fetch failed.
    Failure(Vec<String>),
}

impl<T> FetchState<T> {
    /// Get the success payload, if any.
    pub fn success(&self) -> Option<&T> {
        match self {
            FetchState::Success(payload) => Some(payload),
            _ => None,
        }
    }
}

/// Provider of the current items snapshot.
///
/// Implementations must be thread-safe (Send + Sync) so a model can be
/// driven from an async host.
pub trait ItemsSource: Send + Sync {
    /// Get the current state of the underlying dataset.
    fn snapshot(&self) -> FetchState<Vec<Record>>;
}

/// A source holding its snapshot in memory.
///
/// Hosts update the state with [`set`](InMemorySource::set) as their fetch
/// progresses; tests use it to script every snapshot shape.
#[derive(Debug, Default)]
pub struct InMemorySource {
    state: Mutex<FetchState<Vec<Record>>>,
}

impl InMemorySource {
    /// Create a source in the `NotAsked` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source already holding a successful payload.
    pub fn with_items(items: Vec<Record>) -> Self {
        Self {
            state: Mutex::new(FetchState::Success(items)),
        }
    }

    /// Replace the current state.
    pub fn set(&self, state: FetchState<Vec<Record>>) {
        *self.state.lock().unwrap() = state;
    }
}

impl ItemsSource for InMemorySource {
    fn snapshot(&self) -> FetchState<Vec<Record>> {
        self.state.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_not_asked() {
        let source = InMemorySource::new();
        assert_eq!(source.snapshot(), FetchState::NotAsked);
    }

    #[test]
    fn test_set_replaces_state() {
        let source = InMemorySource::new();
        source.set(FetchState::Loading);
        assert_eq!(source.snapshot(), FetchState::Loading);

        source.set(FetchState::Failure(vec!["timeout".to_string()]));
        assert!(matches!(source.snapshot(), FetchState::Failure(_)));
    }

    #[test]
    fn test_success_accessor() {
        let items = vec![Record::new().with_field("runNumber", 1)];
        let state = FetchState::Success(items);
        assert_eq!(state.success().map(Vec::len), Some(1));
        assert!(FetchState::<Vec<Record>>::Loading.success().is_none());
    }
}
