//! Tap handles for links and their lifecycle.
//!
//! Every link in a rendered tree carries a [`TapHandle`]. Handles are owned
//! by an [`InteractionManager`], which disposes the whole set before each
//! rebuild and when the view is torn down. A disposed handle never invokes
//! its callback again.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Callback invoked with the link target when a link is tapped.
pub type LinkCallback = Arc<dyn Fn(&str) + Send + Sync>;

struct HandleInner {
    id: u64,
    href: String,
    callback: Mutex<Option<LinkCallback>>,
    disposed: AtomicBool,
}

/// A releasable recognizer bound to one link.
#[derive(Clone)]
pub struct TapHandle {
    inner: Arc<HandleInner>,
}

impl TapHandle {
    /// Fires the tap. Returns true if a callback was invoked.
    pub fn tap(&self) -> bool {
        if self.is_disposed() {
            tracing::warn!(id = self.inner.id, href = %self.inner.href, "tap on disposed link handle");
            return false;
        }
        let callback = self.inner.callback.lock().clone();
        match callback {
            Some(callback) => {
                callback(&self.inner.href);
                true
            }
            None => false,
        }
    }

    /// Returns true once the owning manager has released this handle.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// The link target.
    pub fn href(&self) -> &str {
        &self.inner.href
    }

    /// Identifier unique within the owning manager.
    pub fn id(&self) -> u64 {
        self.inner.id
    }

    /// Returns true if both values refer to the same handle.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::Release);
        self.inner.callback.lock().take();
    }
}

/// Compares link targets only; two builds of the same tree compare equal.
impl PartialEq for TapHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.href == other.inner.href
    }
}

impl fmt::Debug for TapHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TapHandle")
            .field("id", &self.inner.id)
            .field("href", &self.inner.href)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl Serialize for TapHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TapHandle", 2)?;
        state.serialize_field("id", &self.inner.id)?;
        state.serialize_field("href", &self.inner.href)?;
        state.end()
    }
}

/// Owns every live [`TapHandle`] of one view.
#[derive(Default)]
pub struct InteractionManager {
    handles: Vec<TapHandle>,
    next_id: u64,
}

impl InteractionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a handle for `href`.
    pub fn create_link_handle(&mut self, href: impl Into<String>, callback: Option<LinkCallback>) -> TapHandle {
        let id = self.next_id;
        self.next_id += 1;
        let handle = TapHandle {
            inner: Arc::new(HandleInner {
                id,
                href: href.into(),
                callback: Mutex::new(callback),
                disposed: AtomicBool::new(false),
            }),
        };
        self.handles.push(handle.clone());
        handle
    }

    /// Releases every live handle. Safe to call repeatedly.
    pub fn dispose_all(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        tracing::debug!(count = self.handles.len(), "disposing link handles");
        for handle in self.handles.drain(..) {
            handle.dispose();
        }
    }

    /// Number of handles not yet disposed.
    pub fn live_count(&self) -> usize {
        self.handles.len()
    }

    /// Number of handles ever created by this manager.
    pub fn created_total(&self) -> u64 {
        self.next_id
    }
}

impl Drop for InteractionManager {
    fn drop(&mut self) {
        self.dispose_all();
    }
}

impl fmt::Debug for InteractionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionManager")
            .field("live", &self.live_count())
            .field("created", &self.created_total())
            .finish()
    }
}
