//! What a run reports back to its caller.

use ak_agent::ComponentFailure;
use ak_core::AgentId;

/// Where one agent stands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AgentStatus {
    /// Still being scheduled.
    Active,
    /// Excluded after a component failure; its channels keep their last
    /// values.
    Failed(ComponentFailure),
}

impl AgentStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, AgentStatus::Failed(_))
    }
}

/// Outcome of a run, also passed to sinks as the interim result after each
/// cycle.
///
/// `succeeded` is `false` only when the run stopped early: an abort under
/// [`FailurePolicy::AbortOnAny`][ak_core::FailurePolicy::AbortOnAny] or
/// cancellation.  Agents isolated under `IsolateAgent` show up in
/// `agent_status` but do not fail the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunResult {
    pub succeeded:        bool,
    pub failure_reason:   Option<String>,
    /// Indexed by `AgentId`.
    pub agent_status:     Vec<AgentStatus>,
    pub cycles_completed: u64,
    pub cancelled:        bool,
}

impl RunResult {
    pub fn new(agent_count: usize) -> Self {
        Self {
            succeeded:        true,
            failure_reason:   None,
            agent_status:     vec![AgentStatus::Active; agent_count],
            cycles_completed: 0,
            cancelled:        false,
        }
    }

    pub fn status(&self, agent: AgentId) -> Option<&AgentStatus> {
        self.agent_status.get(agent.index())
    }

    pub fn failed_agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agent_status
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_failed())
            .map(|(i, _)| AgentId::from_index(i))
    }
}
