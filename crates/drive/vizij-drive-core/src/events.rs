//! Session lifecycle records.
//!
//! [`EventLog`] is a listener that simply records what happened, for hosts that poll once per
//! frame instead of reacting inside callbacks.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::data::{BezierCurve, Pose};
use crate::ids::SessionId;
use crate::sampler::{MotionListener, Sample};

/// Discrete signals emitted while driving.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum MotionEvent {
    Started {
        session: SessionId,
        curve: BezierCurve,
    },
    Sampled(Sample),
    Completed {
        session: SessionId,
        pose: Pose,
    },
    Cancelled {
        session: SessionId,
        pose: Pose,
    },
}

impl MotionEvent {
    #[inline]
    pub fn session(&self) -> SessionId {
        match self {
            Self::Started { session, .. }
            | Self::Completed { session, .. }
            | Self::Cancelled { session, .. } => *session,
            Self::Sampled(sample) => sample.session,
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Cancelled { .. })
    }
}

/// Shared, append-only event buffer. Clones write to the same buffer.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<MotionEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Boxed clone, ready to pass to `MotionSampler::start`.
    pub fn listener(&self) -> Box<dyn MotionListener> {
        Box::new(self.clone())
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&self) -> Vec<MotionEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Copy of the recorded events.
    pub fn events(&self) -> Vec<MotionEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    fn push(&self, event: MotionEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl MotionListener for EventLog {
    fn on_start(&mut self, session: SessionId, curve: &BezierCurve) {
        self.push(MotionEvent::Started {
            session,
            curve: *curve,
        });
    }

    fn on_sample(&mut self, sample: &Sample) {
        self.push(MotionEvent::Sampled(*sample));
    }

    fn on_complete(&mut self, session: SessionId, pose: Pose) {
        self.push(MotionEvent::Completed { session, pose });
    }

    fn on_cancel(&mut self, session: SessionId, pose: Pose) {
        self.push(MotionEvent::Cancelled { session, pose });
    }
}
