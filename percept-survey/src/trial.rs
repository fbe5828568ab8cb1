use percept_core::ImageDescriptor;

/// Controller-private state for one image-display attempt.
///
/// Timer deadlines live on the controller, not here, so a trial can be
/// handed to observers as a [`TrialSnapshot`] without leaking anything
/// cancellable.
#[derive(Debug, Clone)]
pub(crate) struct Trial {
    pub image: ImageDescriptor,
    pub hidden: bool,
    /// Set the moment the image becomes visible; `Some` iff `!hidden`.
    pub revealed_at: Option<u64>,
    /// Randomized pre-reveal delay, chosen when the trial becomes current.
    pub delay_ms: Option<u64>,
}

impl Trial {
    pub fn new(image: ImageDescriptor) -> Self {
        Self {
            image,
            hidden: true,
            revealed_at: None,
            delay_ms: None,
        }
    }

    pub fn snapshot(&self, index: usize) -> TrialSnapshot {
        TrialSnapshot {
            index,
            image: self.image.clone(),
            hidden: self.hidden,
        }
    }
}

/// Immutable view of a trial as broadcast to observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialSnapshot {
    pub index: usize,
    pub image: ImageDescriptor,
    pub hidden: bool,
}
