use serde::{Deserialize, Serialize};
use taskdag::BuildPolicy;

/// Configuration for trace loading
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrapherConfig {
    /// How redeclared names, reused task ids and parallel edges are handled
    pub policy: BuildPolicy,

    /// Fail when a node's label and tooltip disagree on the taskpool.
    /// When off, the mismatch is logged and the label's value is used.
    pub check_taskpool: bool,
}

impl GrapherConfig {
    /// Permissive config matching how the runtime's own tooling reads traces
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Reject duplicates and inconsistent node declarations
    pub fn strict() -> Self {
        Self {
            policy: BuildPolicy::strict(),
            check_taskpool: true,
        }
    }

    /// Set the build policy
    pub fn with_policy(mut self, policy: BuildPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Enable or disable the label/tooltip taskpool check
    pub fn with_taskpool_check(mut self, check: bool) -> Self {
        self.check_taskpool = check;
        self
    }
}
