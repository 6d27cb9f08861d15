use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::nav::command::{NavCommand, NavEvent, NavigateKind};
use crate::nav::context::{ContextRegistry, ControllerId, ScreenContext};
use crate::nav::modal::{MODAL_RESULT_KEY, ModalEntry, ModalResult, ModalStack, ModalStatus};
use crate::nav::scheduler::{Deferred, TickQueue};
use crate::nav::screen::{Screen, ScreenId};
use crate::nav::stack::NavigationStack;

/// Well-known fallback route for unresolvable navigation targets.
pub const NOT_FOUND_SCREEN: &str = "not-found";

/// Orchestrates screen transitions and overlays for one window.
///
/// Owns the screen registry, the back-history [`NavigationStack`], the
/// [`ModalStack`], and this controller's partition of the
/// [`ContextRegistry`]. Navigation hooks run synchronously during a
/// transition; mount/unmount propagation is scheduled on the [`TickQueue`]
/// and applied when the host drains it via [`run_deferred`], so callers must
/// not assume a screen is mounted when `push` returns.
///
/// Registry lookups never fail toward the caller: unknown routes degrade to
/// the [`NOT_FOUND_SCREEN`] fallback or a logged no-op.
///
/// [`run_deferred`]: NavigationController::run_deferred
pub struct NavigationController {
    id: ControllerId,
    screens: HashMap<ScreenId, Box<dyn Screen>>,
    stack: NavigationStack,
    modals: ModalStack,
    contexts: Arc<ContextRegistry>,
    visible: Option<ScreenId>,
    queue: TickQueue,
    events: Vec<NavEvent>,
}

impl NavigationController {
    pub fn new() -> Self {
        Self::with_contexts(Arc::new(ContextRegistry::new()))
    }

    /// Builds a controller sharing a registry with other controllers.
    /// Storage stays partitioned by controller id either way.
    pub fn with_contexts(contexts: Arc<ContextRegistry>) -> Self {
        Self {
            id: ControllerId::new(),
            screens: HashMap::new(),
            stack: NavigationStack::new(),
            modals: ModalStack::new(),
            contexts,
            visible: None,
            queue: TickQueue::new(),
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> ControllerId {
        self.id
    }

    pub fn visible(&self) -> Option<&ScreenId> {
        self.visible.as_ref()
    }

    pub fn stack(&self) -> &NavigationStack {
        &self.stack
    }

    pub fn modals(&self) -> &ModalStack {
        &self.modals
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    /// The parameter store for a screen or modal instance of this
    /// controller, created on first access.
    pub fn context(&self, instance_id: &str) -> Arc<ScreenContext> {
        self.contexts.get_or_create(self.id, instance_id)
    }

    pub fn add_screen(&mut self, id: impl Into<ScreenId>, screen: Box<dyn Screen>) {
        let id = id.into();
        if self.screens.insert(id.clone(), screen).is_some() {
            log::warn!("screen '{}' was already registered, replacing it", id);
        }
    }

    /// Deregisters a screen: runs cleanup/teardown and purges the id from
    /// history, from the modal stack, and from context storage.
    pub fn remove_screen(&mut self, id: &ScreenId) {
        if let Some(mut screen) = self.screens.remove(id) {
            if let Err(e) = screen.on_cleanup() {
                log::warn!("cleanup failed for '{}': {:#}", id, e);
            }
            screen.unmount();
            screen.destroy();
        }
        self.stack.remove_all(id);
        loop {
            let instance = self
                .modals
                .iter()
                .find(|entry| &entry.template_id == id)
                .map(|entry| entry.instance_id.clone());
            let Some(instance) = instance else { break };
            log::debug!("purging open modal instance '{}' of removed screen '{}'", instance, id);
            self.modals.remove(&instance);
            self.contexts.clear(self.id, &instance);
        }
        self.contexts.clear(self.id, id.as_str());
        if self.visible.as_ref() == Some(id) {
            self.visible = None;
        }
    }

    fn resolve(&self, id: ScreenId) -> Option<ScreenId> {
        if self.screens.contains_key(&id) {
            return Some(id);
        }
        log::warn!("no screen registered for route '{}', redirecting to '{}'", id, NOT_FOUND_SCREEN);
        let fallback = ScreenId::from(NOT_FOUND_SCREEN);
        if self.screens.contains_key(&fallback) {
            Some(fallback)
        } else {
            log::error!("fallback screen '{}' is not registered, ignoring navigation", NOT_FOUND_SCREEN);
            None
        }
    }

    fn fire_navigated_to(&mut self, id: &ScreenId, instance_id: &str) {
        let ctx = self.contexts.get_or_create(self.id, instance_id);
        if let Some(screen) = self.screens.get_mut(id) {
            if let Err(e) = screen.on_navigated_to(&ctx) {
                log::warn!("on_navigated_to failed for '{}': {:#}", id, e);
            }
            self.queue.schedule(Deferred::Mount(id.clone()));
        }
    }

    fn fire_navigated_from(&mut self, id: &ScreenId) {
        if let Some(screen) = self.screens.get_mut(id) {
            if let Err(e) = screen.on_navigated_from() {
                log::warn!("on_navigated_from failed for '{}': {:#}", id, e);
            }
            self.queue.schedule(Deferred::Unmount(id.clone()));
        }
    }

    /// Like [`fire_navigated_from`], but without scheduling an unmount: a
    /// modal covered by another modal stays on screen.
    ///
    /// [`fire_navigated_from`]: NavigationController::fire_navigated_from
    fn fire_modal_from(&mut self, id: &ScreenId) {
        if let Some(screen) = self.screens.get_mut(id) {
            if let Err(e) = screen.on_navigated_from() {
                log::warn!("on_navigated_from failed for modal '{}': {:#}", id, e);
            }
        }
    }

    /// Navigates to `route`, making it the visible screen.
    ///
    /// Unknown routes fall back to [`NOT_FOUND_SCREEN`]. Pushing the
    /// visible screen again is a no-op; pushing the entry directly beneath
    /// the top is treated as an implicit back navigation instead of a
    /// duplicate history entry.
    pub fn push(&mut self, route: impl Into<ScreenId>, params: HashMap<String, Value>) {
        let Some(id) = self.resolve(route.into()) else { return };

        if self.visible.as_ref() == Some(&id) && self.stack.top() == Some(&id) {
            return;
        }

        // Implicit back: the user routed explicitly to where pop() would go.
        if self.visible.as_ref() == self.stack.top() && self.stack.below_top() == Some(&id) {
            self.pop();
            return;
        }

        self.contexts.get_or_create(self.id, id.as_str()).merge(params);
        self.stack.push(id.clone());

        if let Some(from) = self.visible.clone() {
            self.fire_navigated_from(&from);
        }
        self.visible = Some(id.clone());
        self.fire_navigated_to(&id, id.as_str());
    }

    /// Navigates back one entry. No-op at the stack floor.
    ///
    /// History entries whose screen has been deregistered in the meantime
    /// are logged and discarded, and recovery retries the next entry down.
    pub fn pop(&mut self) {
        if self.stack.pop_top().is_none() {
            return;
        }
        loop {
            let Some(top) = self.stack.top().cloned() else { return };
            if self.screens.contains_key(&top) {
                if let Some(from) = self.visible.clone() {
                    self.fire_navigated_from(&from);
                }
                self.visible = Some(top.clone());
                self.fire_navigated_to(&top, top.as_str());
                return;
            }
            log::warn!("navigation history references unregistered screen '{}', discarding", top);
            if self.stack.pop_top().is_none() {
                log::error!("no registered screen left in navigation history");
                if let Some(from) = self.visible.take() {
                    self.fire_navigated_from(&from);
                }
                return;
            }
        }
    }

    /// Removes a specific entry from history. Behaves like [`pop`] when the
    /// entry is the active one; otherwise prunes silently.
    ///
    /// [`pop`]: NavigationController::pop
    pub fn pop_screen(&mut self, id: &ScreenId) {
        let is_active = self.stack.top() == Some(id) && self.visible.as_ref() == Some(id);
        if is_active {
            self.pop();
        } else {
            self.stack.remove(id);
        }
    }

    /// Replaces the current entry with `route`.
    ///
    /// Equivalent to pop-then-push, except the outgoing screen's
    /// `on_navigated_from` fires once, and the pop defers to the
    /// floor-guarded semantics: on a single-entry stack nothing is popped
    /// and the push proceeds on top of the root.
    pub fn replace(&mut self, route: impl Into<ScreenId>, params: HashMap<String, Value>) {
        let Some(id) = self.resolve(route.into()) else { return };
        self.stack.pop_top();
        self.push(id, params);
    }

    /// Preloads `route` behind the visible screen, so a later [`pop`]
    /// reveals it already mounted. Degrades to [`push`] when nothing is
    /// visible yet.
    ///
    /// [`pop`]: NavigationController::pop
    /// [`push`]: NavigationController::push
    pub fn navigate_in_background(&mut self, route: impl Into<ScreenId>) {
        let Some(id) = self.resolve(route.into()) else { return };
        if self.visible.is_none() {
            self.push(id, HashMap::new());
            return;
        }
        if self.stack.insert_below_top(id.clone()) {
            self.queue.schedule(Deferred::Mount(id));
        }
    }

    /// Resets the controller to its initial state: closes all modals in
    /// LIFO order, tears every registered screen down, and discards history
    /// and this controller's parameter stores.
    pub fn clear(&mut self) {
        self.close_all_modals();

        let ids: Vec<ScreenId> = self.screens.keys().cloned().collect();
        for id in ids {
            if let Some(screen) = self.screens.get_mut(&id) {
                if let Err(e) = screen.on_navigated_from() {
                    log::warn!("on_navigated_from failed for '{}': {:#}", id, e);
                }
                if let Err(e) = screen.on_cleanup() {
                    log::warn!("cleanup failed for '{}': {:#}", id, e);
                }
                screen.unmount();
            }
        }

        self.stack.clear();
        self.visible = None;
        // Anything still queued refers to torn-down state.
        self.queue.clear();
        self.contexts.clear_all(self.id);
    }

    /// Opens a modal over the current screen. Reopening an already-open
    /// template is a no-op that keeps the original callback association.
    pub fn open_modal(
        &mut self,
        template: impl Into<ScreenId>,
        callback_id: Option<String>,
        params: HashMap<String, Value>,
    ) {
        let template = template.into();
        if self.modals.contains_template(&template) {
            log::debug!("modal '{}' is already open, ignoring", template);
            return;
        }
        if !self.screens.contains_key(&template) {
            log::warn!("no modal registered for route '{}', ignoring open", template);
            return;
        }

        let instance_id = self.modals.next_instance_id(&template);
        let ctx = self.contexts.get_or_create(self.id, &instance_id);
        let pending = ModalResult::pending(callback_id.clone());
        ctx.set(MODAL_RESULT_KEY, serde_json::to_value(pending).unwrap_or(Value::Null));
        ctx.merge(params);

        if let Some(prev) = self.modals.top().map(|entry| entry.template_id.clone()) {
            self.fire_modal_from(&prev);
        }

        self.modals.push(ModalEntry {
            template_id: template.clone(),
            instance_id: instance_id.clone(),
            callback_id,
        });
        self.fire_navigated_to(&template, &instance_id);
    }

    /// Records the outcome of a modal interaction. Called by the modal
    /// itself before it requests its own close; a second finalize for the
    /// same instance is a logged no-op.
    pub fn finalize_modal(&mut self, instance_id: &str, status: ModalStatus, payload: Option<Value>) {
        let Some(entry) = self.modals.find(instance_id).cloned() else {
            log::warn!("finalize for unknown modal instance '{}', ignoring", instance_id);
            return;
        };
        let ctx = self.contexts.get_or_create(self.id, instance_id);
        if let Some(existing) = ctx.get_as::<ModalResult>(MODAL_RESULT_KEY) {
            if !existing.is_pending() {
                log::warn!("modal '{}' result already finalized, ignoring", instance_id);
                return;
            }
        }
        let result = ModalResult { status, payload, callback_id: entry.callback_id };
        ctx.set(MODAL_RESULT_KEY, serde_json::to_value(result).unwrap_or(Value::Null));
    }

    /// Closes the top of the modal stack (pure LIFO) and broadcasts its
    /// result. Reveals the modal below, if any; otherwise the modal layer
    /// goes back to letting input through.
    pub fn close_top_modal(&mut self) {
        let Some(entry) = self.modals.top().cloned() else { return };

        self.fire_modal_from(&entry.template_id);
        self.queue.schedule(Deferred::Unmount(entry.template_id.clone()));

        let result = self.take_modal_result(&entry);
        self.contexts.clear(self.id, &entry.instance_id);
        self.modals.pop();
        self.events.push(NavEvent::ModalClosed { instance_id: entry.instance_id, result });

        if let Some(next) = self.modals.top().cloned() {
            self.fire_navigated_to(&next.template_id, &next.instance_id);
        }
    }

    /// Closes a specific modal instance wherever it sits in the stack. For
    /// the topmost this is a normal LIFO close; for any other entry only
    /// the removal happens, with no lifecycle transitions on its
    /// neighbors. The result broadcast happens either way.
    pub fn close_modal(&mut self, instance_id: &str) {
        if self.modals.is_top(instance_id) {
            self.close_top_modal();
            return;
        }
        let Some(entry) = self.modals.remove(instance_id) else {
            log::debug!("no open modal instance '{}', ignoring close", instance_id);
            return;
        };
        let result = self.take_modal_result(&entry);
        self.contexts.clear(self.id, &entry.instance_id);
        self.events.push(NavEvent::ModalClosed { instance_id: entry.instance_id, result });
    }

    pub fn close_all_modals(&mut self) {
        while !self.modals.is_empty() {
            self.close_top_modal();
        }
    }

    fn take_modal_result(&self, entry: &ModalEntry) -> ModalResult {
        self.contexts
            .get_or_create(self.id, &entry.instance_id)
            .get_as::<ModalResult>(MODAL_RESULT_KEY)
            .unwrap_or_else(|| ModalResult::pending(entry.callback_id.clone()))
    }

    /// Entry point for commands arriving from the bus.
    pub fn dispatch(&mut self, command: NavCommand) {
        match command {
            NavCommand::Navigate { kind: NavigateKind::Push, route: Some(route), params } => {
                self.push(route, params);
            }
            NavCommand::Navigate { kind: NavigateKind::Replace, route: Some(route), params } => {
                self.replace(route, params);
            }
            NavCommand::Navigate { kind: NavigateKind::Pop, route, .. } => match route {
                Some(route) => self.pop_screen(&route),
                None => self.pop(),
            },
            NavCommand::Navigate { kind, route: None, .. } => {
                log::warn!("{:?} command without a route, ignoring", kind);
            }
            NavCommand::OpenModal { route, callback_id, params } => {
                self.open_modal(route, callback_id, params);
            }
            NavCommand::CloseModal { instance_id, result } => {
                if let Some(result) = result {
                    self.finalize_modal(&instance_id, result.status, result.payload);
                }
                self.close_modal(&instance_id);
            }
            NavCommand::ClearStack { controller_id } => {
                if controller_id == self.id {
                    self.clear();
                } else {
                    log::debug!("clear-stack for controller {} is not for us", controller_id);
                }
            }
        }
    }

    /// Takes the events produced since the last call, for the host to
    /// publish on the bus.
    pub fn take_events(&mut self) -> Vec<NavEvent> {
        std::mem::take(&mut self.events)
    }

    /// Applies all deferred mount/unmount propagation. Called once per
    /// event-loop iteration by the host. Mount failures are fatal and
    /// propagate; unmount failures never block the drain.
    pub fn run_deferred(&mut self) -> Result<()> {
        for task in self.queue.drain() {
            match task {
                Deferred::Mount(id) => {
                    if let Some(screen) = self.screens.get_mut(&id) {
                        screen.mount().with_context(|| format!("mounting screen '{}'", id))?;
                    }
                }
                Deferred::Unmount(id) => {
                    if let Some(screen) = self.screens.get_mut(&id) {
                        screen.unmount();
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for NavigationController {
    fn default() -> Self {
        Self::new()
    }
}
