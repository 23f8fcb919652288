/// Lifecycle of one channel within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelPhase {
    #[default]
    Unconfigured,
    Selecting,
    Selected,
    Materializing,
    Done,
    SelectionFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseEvent {
    SelectionStarted,
    SelectionSucceeded,
    SelectionFailed,
    MaterializationStarted,
    MaterializationFinished,
}

impl ChannelPhase {
    /// Pure transition; events that do not apply leave the phase unchanged.
    pub fn apply(self, event: PhaseEvent) -> ChannelPhase {
        use ChannelPhase as P;
        use PhaseEvent as E;
        match (self, event) {
            (P::Unconfigured, E::SelectionStarted) => P::Selecting,
            (P::Selecting, E::SelectionSucceeded) => P::Selected,
            (P::Selecting, E::SelectionFailed) => P::SelectionFailed,
            (P::Selected, E::MaterializationStarted) => P::Materializing,
            (P::Materializing, E::MaterializationFinished) => P::Done,
            (phase, _) => phase,
        }
    }
}
