//! Holds the session runtime once it boots, and the actions dispatched before that.

use std::{mem, rc::Rc};

use file_session::{SessionAction, SessionRuntime};

/// Runtime slot owned by [`crate::FileManagerApp`].
///
/// Config loading is async, so a drop or picker change can arrive before the runtime exists.
/// Those actions wait here instead of being discarded, since an `AddFiles` payload owns object
/// URLs that only the session knows how to release.
#[derive(Debug)]
pub(crate) enum SessionSlot {
    Booting(Vec<SessionAction>),
    Ready(Rc<SessionRuntime>),
}

impl Default for SessionSlot {
    fn default() -> Self {
        Self::Booting(Vec::new())
    }
}

impl SessionSlot {
    /// Pairs `action` with the runtime to run it on, or queues it while booting.
    pub(crate) fn accept(
        &mut self,
        action: SessionAction,
    ) -> Option<(Rc<SessionRuntime>, SessionAction)> {
        match self {
            Self::Booting(pending) => {
                pending.push(action);
                None
            }
            Self::Ready(runtime) => Some((Rc::clone(runtime), action)),
        }
    }

    /// Installs the runtime and hands back queued actions in dispatch order.
    pub(crate) fn ready(&mut self, runtime: Rc<SessionRuntime>) -> Vec<SessionAction> {
        match mem::replace(self, Self::Ready(runtime)) {
            Self::Booting(pending) => pending,
            Self::Ready(_) => Vec::new(),
        }
    }

    /// Number of actions waiting for boot.
    pub(crate) fn pending_len(&self) -> usize {
        match self {
            Self::Booting(pending) => pending.len(),
            Self::Ready(_) => 0,
        }
    }
}
