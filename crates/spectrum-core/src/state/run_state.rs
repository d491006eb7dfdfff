/// Whether the machine still accepts work from the frame scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RunState {
    /// Frames run the CPU engine normally.
    #[default]
    Running,
    /// The engine signalled completion; the machine is inert until reset.
    Done,
}

impl RunState {
    /// Returns `true` once the terminal state was reached.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::RunState;

    #[test]
    fn run_state_default_is_running() {
        assert_eq!(RunState::default(), RunState::Running);
        assert!(!RunState::Running.is_done());
        assert!(RunState::Done.is_done());
    }
}
