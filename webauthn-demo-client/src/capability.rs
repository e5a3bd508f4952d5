/// Whether the environment exposes a credential API at all.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The credential API is present.
    Available,
    /// The credential API is missing. No platform call is made.
    Unavailable,
    /// The probe could not tell. The platform call is attempted anyway.
    #[default]
    Unknown,
}

impl Capability {
    /// Whether a ceremony should reach the platform.
    pub fn allows_call(self) -> bool {
        !matches!(self, Capability::Unavailable)
    }
}

/// Checked at the start of every invocation, before any state changes.
pub trait CapabilityProbe {
    /// Report the current capability.
    fn probe(&self) -> Capability;
}

impl CapabilityProbe for Capability {
    fn probe(&self) -> Capability {
        *self
    }
}

impl<F> CapabilityProbe for F
where
    F: Fn() -> Capability,
{
    fn probe(&self) -> Capability {
        self()
    }
}
