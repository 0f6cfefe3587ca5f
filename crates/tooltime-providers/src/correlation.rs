use std::collections::{HashMap, VecDeque};
use tooltime_types::UnifiedEvent;

/// Calls seen but not yet matched to a result, keyed by the source-native
/// correlation id (`tool_use_id`, `call_id`, `toolCallId`).
#[derive(Debug, Default)]
pub(crate) struct PendingCalls {
    last_seq: u64,
    calls: HashMap<String, (u64, UnifiedEvent)>,
}

impl PendingCalls {
    /// Next per-session sequence number (1-based)
    pub(crate) fn next_seq(&mut self) -> u64 {
        self.last_seq += 1;
        self.last_seq
    }

    /// Register a call. A call already pending under the same id is pushed
    /// to `out` as unresolved rather than lost.
    pub(crate) fn open(
        &mut self,
        correlation_id: String,
        seq: u64,
        event: UnifiedEvent,
        out: &mut VecDeque<UnifiedEvent>,
    ) {
        if let Some((_, displaced)) = self.calls.insert(correlation_id, (seq, event)) {
            out.push_back(displaced);
        }
    }

    /// Pop the call matching a result and fold the outcome into it.
    /// Results with no pending call yield None.
    pub(crate) fn resolve(
        &mut self,
        correlation_id: &str,
        error: Option<String>,
    ) -> Option<UnifiedEvent> {
        let (_, mut event) = self.calls.remove(correlation_id)?;
        event.error = error;
        Some(event)
    }

    /// Flush unresolved calls in call order, all without error
    pub(crate) fn drain_into(&mut self, out: &mut VecDeque<UnifiedEvent>) {
        let mut remaining: Vec<_> = self.calls.drain().map(|(_, call)| call).collect();
        remaining.sort_by_key(|(seq, _)| *seq);
        out.extend(remaining.into_iter().map(|(_, event)| event));
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.calls.len()
    }
}
