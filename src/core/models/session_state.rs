use crate::core::errors::SessionError;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    AwaitingUpload,
    RegionsPending,
    RegionsReady,
    Processing,
    Done,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ImagesUploaded { has_regions: bool },
    ImagesCleared,
    RegionsUpdated { region_count: usize },
    ProcessRequested,
    ProcessingSucceeded,
    ProcessingFailed(String),
    Reset,
}

impl SessionEvent {
    pub fn trigger_name(&self) -> &'static str {
        match self {
            SessionEvent::ImagesUploaded { .. } => "upload images",
            SessionEvent::ImagesCleared => "clear images",
            SessionEvent::RegionsUpdated { .. } => "update regions",
            SessionEvent::ProcessRequested => "process",
            SessionEvent::ProcessingSucceeded => "finish processing",
            SessionEvent::ProcessingFailed(_) => "fail processing",
            SessionEvent::Reset => "reset",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::AwaitingUpload => write!(f, "awaiting upload"),
            SessionState::RegionsPending => write!(f, "waiting for regions"),
            SessionState::RegionsReady => write!(f, "ready to process"),
            SessionState::Processing => write!(f, "processing"),
            SessionState::Done => write!(f, "done"),
            SessionState::Failed(reason) => write!(f, "failed ({})", reason),
        }
    }
}

impl SessionState {
    pub fn apply(&self, event: &SessionEvent) -> Result<SessionState, SessionError> {
        use SessionEvent as Event;
        use SessionState as State;

        let next = match (self, event) {
            (State::Processing, Event::ProcessingSucceeded) => State::Done,
            (State::Processing, Event::ProcessingFailed(reason)) => State::Failed(reason.clone()),
            (State::Processing, _) => return Err(self.reject(event)),

            (_, Event::ImagesUploaded { has_regions: true }) => State::RegionsReady,
            (_, Event::ImagesUploaded { has_regions: false }) => State::RegionsPending,
            (_, Event::ImagesCleared) | (_, Event::Reset) => State::AwaitingUpload,

            (State::AwaitingUpload, Event::RegionsUpdated { .. }) => State::AwaitingUpload,
            (_, Event::RegionsUpdated { region_count: 0 }) => State::RegionsPending,
            (_, Event::RegionsUpdated { .. }) => State::RegionsReady,

            (State::RegionsReady | State::Done | State::Failed(_), Event::ProcessRequested) => {
                State::Processing
            }

            _ => return Err(self.reject(event)),
        };

        log::debug!(
            "[SESSION] '{}' moved session from {} to {}",
            event.trigger_name(),
            self,
            next
        );

        Ok(next)
    }

    pub fn can_process(&self) -> bool {
        matches!(
            self,
            SessionState::RegionsReady | SessionState::Done | SessionState::Failed(_)
        )
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::Processing)
    }

    fn reject(&self, event: &SessionEvent) -> SessionError {
        log::warn!(
            "[SESSION] rejected '{}' while {}",
            event.trigger_name(),
            self
        );
        SessionError::InvalidTransition {
            state: self.clone(),
            trigger: event.trigger_name(),
        }
    }
}
