use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::nav::context::ScreenContext;
use crate::nav::lifecycle::LifecycleNode;

/// Opaque key identifying a registered screen or modal template.
///
/// Unique within one controller's registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenId(String);

impl ScreenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScreenId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ScreenId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability contract for anything the controller can navigate to.
///
/// A screen (or modal template) implements the navigation hooks on top of the
/// [`LifecycleNode`] state machine. The controller invokes
/// `on_navigated_to`/`on_navigated_from` synchronously during a transition and
/// schedules the mount/unmount propagation for the next tick; hook errors are
/// logged by the controller and never abort the navigation operation.
pub trait Screen: LifecycleNode + Send {
    /// Called when this screen becomes the active one (or a modal opens),
    /// with the parameter store for the activated instance.
    fn on_navigated_to(&mut self, ctx: &ScreenContext) -> Result<()> {
        let _ = ctx;
        Ok(())
    }

    /// Called when navigation moves away from this screen.
    fn on_navigated_from(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the screen is deregistered or the controller is cleared.
    fn on_cleanup(&mut self) -> Result<()> {
        Ok(())
    }
}
