//! Vehicle role tag shared across the workspace.

/// Who an actor represents, from this core's point of view.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum Role {
    /// A background vehicle owned by this core.
    #[default]
    Social,
    /// The agent under evaluation, controlled by an external policy.
    EgoAgent,
    /// A background vehicle controlled by a peer provider's social model.
    SocialAgent,
    /// Role could not be determined from the incoming state.
    Unknown,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Social => "social",
            Role::EgoAgent => "ego_agent",
            Role::SocialAgent => "social_agent",
            Role::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
