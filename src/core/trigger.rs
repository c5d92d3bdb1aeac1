//! Trigger events

/// An event delivered by the trigger source
///
/// The metadata is used only to decide whether a run starts; the engine
/// does not interpret it further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    /// A push to a branch
    Push { branch: String, commit: String },

    /// A pull request opened or updated
    PullRequest {
        source_branch: String,
        target_branch: String,
        commit: String,
    },
}

impl TriggerEvent {
    /// The branch the trigger filters match against: the pushed branch,
    /// or the pull request's target branch
    pub fn branch(&self) -> &str {
        match self {
            TriggerEvent::Push { branch, .. } => branch,
            TriggerEvent::PullRequest { target_branch, .. } => target_branch,
        }
    }

    /// Commit reference carried by the event
    pub fn commit(&self) -> &str {
        match self {
            TriggerEvent::Push { commit, .. } => commit,
            TriggerEvent::PullRequest { commit, .. } => commit,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TriggerEvent::Push { .. } => "push",
            TriggerEvent::PullRequest { .. } => "pull-request",
        }
    }
}
