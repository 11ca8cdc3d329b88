use crate::error::ErrorKind;

/// Where the launcher is in its run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    ResolvingInput,
    CleaningStale,
    EnsuringImage,
    Launching,
    WaitingReady,
    Ready,
    Relaying,
    Terminated,
    Error(ErrorKind),
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Idle => "idle",
            LifecycleState::ResolvingInput => "resolving-input",
            LifecycleState::CleaningStale => "cleaning-stale",
            LifecycleState::EnsuringImage => "ensuring-image",
            LifecycleState::Launching => "launching",
            LifecycleState::WaitingReady => "waiting-ready",
            LifecycleState::Ready => "ready",
            LifecycleState::Relaying => "relaying",
            LifecycleState::Terminated => "terminated",
            LifecycleState::Error(_) => "error",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Terminated | LifecycleState::Error(_))
    }

    /// Whether `next` is a legal successor of `self`.
    ///
    /// Every non-terminal state may fail, and may end early on cancellation.
    pub fn allows(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        if self.is_terminal() {
            return false;
        }
        match next {
            Error(_) => self != Idle,
            Terminated => true,
            ResolvingInput => self == Idle,
            CleaningStale => self == ResolvingInput,
            EnsuringImage => self == CleaningStale,
            Launching => self == EnsuringImage,
            WaitingReady => self == Launching,
            Ready => self == WaitingReady,
            Relaying => self == Ready,
            Idle => false,
        }
    }
}
