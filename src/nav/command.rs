use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::nav::context::ControllerId;
use crate::nav::modal::ModalResult;
use crate::nav::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigateKind {
    Push,
    Pop,
    Replace,
}

/// Commands the navigation core consumes from the process-wide bus.
///
/// Senders stay decoupled from the controller; the host subscribes the
/// controller's `dispatch` to whatever bus the application uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NavCommand {
    /// Push/Replace require a route; Pop without a route pops the top,
    /// Pop with a route pops that specific entry.
    Navigate {
        kind: NavigateKind,
        route: Option<ScreenId>,
        #[serde(default)]
        params: HashMap<String, Value>,
    },

    OpenModal {
        route: ScreenId,
        callback_id: Option<String>,
        #[serde(default)]
        params: HashMap<String, Value>,
    },

    /// Finalizes the result (when one is carried) and closes the instance.
    CloseModal {
        instance_id: String,
        result: Option<ModalResult>,
    },

    ClearStack {
        controller_id: ControllerId,
    },
}

impl NavCommand {
    pub fn push(route: impl Into<ScreenId>) -> Self {
        NavCommand::Navigate {
            kind: NavigateKind::Push,
            route: Some(route.into()),
            params: HashMap::new(),
        }
    }

    pub fn push_with(route: impl Into<ScreenId>, params: HashMap<String, Value>) -> Self {
        NavCommand::Navigate { kind: NavigateKind::Push, route: Some(route.into()), params }
    }

    pub fn pop() -> Self {
        NavCommand::Navigate { kind: NavigateKind::Pop, route: None, params: HashMap::new() }
    }

    pub fn pop_route(route: impl Into<ScreenId>) -> Self {
        NavCommand::Navigate {
            kind: NavigateKind::Pop,
            route: Some(route.into()),
            params: HashMap::new(),
        }
    }

    pub fn replace(route: impl Into<ScreenId>, params: HashMap<String, Value>) -> Self {
        NavCommand::Navigate { kind: NavigateKind::Replace, route: Some(route.into()), params }
    }
}

/// Events the core publishes back for external consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NavEvent {
    /// Re-published once a modal is torn down, carrying whatever result the
    /// modal finalized, so the opener can react.
    ModalClosed { instance_id: String, result: ModalResult },
}
