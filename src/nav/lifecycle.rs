use anyhow::{Context, Result};

/// Lifecycle state of a mountable UI component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Component exists but has never been mounted.
    #[default]
    Uninitialized,

    /// One-time initialization ran; not yet attached.
    Initialized,

    /// Attached and active.
    Mounted,

    /// Detached, can be mounted again.
    Unmounted,

    /// Terminal. A destroyed component never mounts again.
    Destroyed,
}

/// Capability interface for UI elements that participate in
/// mount/unmount/destroy.
///
/// Implementors supply the state accessors and the hooks; the provided
/// `mount`/`unmount`/`destroy` methods implement the guarded state machine:
///
/// - `mount` runs the one-time `on_init` before the first `on_mount`.
///   Initialization and mount failures are fatal and propagated; a failed
///   init leaves the component `Uninitialized` so mounting can be retried
///   once the defect is fixed. Mounting a destroyed component is a logged
///   no-op.
/// - `unmount` and `destroy` swallow hook failures after logging, because
///   teardown must never block forward progress.
/// - `destroy` is idempotent; a second call does nothing.
pub trait LifecycleNode {
    fn state(&self) -> LifecycleState;
    fn set_state(&mut self, state: LifecycleState);

    /// One-time setup, run before the first `on_mount`.
    fn on_init(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_mount(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_unmount(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_destroy(&mut self) -> Result<()> {
        Ok(())
    }

    fn mount(&mut self) -> Result<()> {
        match self.state() {
            LifecycleState::Destroyed => {
                log::warn!("mount() called on a destroyed component, ignoring");
                Ok(())
            }
            LifecycleState::Mounted => Ok(()),
            LifecycleState::Uninitialized => {
                self.on_init().context("component initialization failed")?;
                self.set_state(LifecycleState::Initialized);
                self.on_mount().context("mount hook failed")?;
                self.set_state(LifecycleState::Mounted);
                Ok(())
            }
            LifecycleState::Initialized | LifecycleState::Unmounted => {
                self.on_mount().context("mount hook failed")?;
                self.set_state(LifecycleState::Mounted);
                Ok(())
            }
        }
    }

    fn unmount(&mut self) {
        match self.state() {
            LifecycleState::Uninitialized | LifecycleState::Destroyed => {}
            _ => {
                if let Err(e) = self.on_unmount() {
                    log::warn!("unmount hook failed: {:#}", e);
                }
                self.set_state(LifecycleState::Unmounted);
            }
        }
    }

    fn destroy(&mut self) {
        if self.state() == LifecycleState::Destroyed {
            return;
        }
        if let Err(e) = self.on_destroy() {
            log::warn!("destroy hook failed: {:#}", e);
        }
        self.set_state(LifecycleState::Destroyed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[derive(Default)]
    struct Probe {
        state: LifecycleState,
        inits: usize,
        mounts: usize,
        unmounts: usize,
        destroys: usize,
        fail_init: bool,
        fail_mount: bool,
        fail_unmount: bool,
    }

    impl LifecycleNode for Probe {
        fn state(&self) -> LifecycleState {
            self.state
        }

        fn set_state(&mut self, state: LifecycleState) {
            self.state = state;
        }

        fn on_init(&mut self) -> Result<()> {
            if self.fail_init {
                return Err(anyhow!("init boom"));
            }
            self.inits += 1;
            Ok(())
        }

        fn on_mount(&mut self) -> Result<()> {
            if self.fail_mount {
                return Err(anyhow!("mount boom"));
            }
            self.mounts += 1;
            Ok(())
        }

        fn on_unmount(&mut self) -> Result<()> {
            if self.fail_unmount {
                return Err(anyhow!("unmount boom"));
            }
            self.unmounts += 1;
            Ok(())
        }

        fn on_destroy(&mut self) -> Result<()> {
            self.destroys += 1;
            Ok(())
        }
    }

    #[test]
    fn first_mount_runs_init_once() {
        let mut probe = Probe::default();
        probe.mount().unwrap();
        assert_eq!(probe.state(), LifecycleState::Mounted);

        probe.unmount();
        probe.mount().unwrap();

        assert_eq!(probe.inits, 1);
        assert_eq!(probe.mounts, 2);
    }

    #[test]
    fn mount_is_noop_when_already_mounted() {
        let mut probe = Probe::default();
        probe.mount().unwrap();
        probe.mount().unwrap();
        assert_eq!(probe.mounts, 1);
    }

    #[test]
    fn failed_init_is_fatal_but_retryable() {
        let mut probe = Probe { fail_init: true, ..Probe::default() };
        assert!(probe.mount().is_err());
        assert_eq!(probe.state(), LifecycleState::Uninitialized);

        probe.fail_init = false;
        probe.mount().unwrap();
        assert_eq!(probe.state(), LifecycleState::Mounted);
    }

    #[test]
    fn failed_mount_hook_propagates() {
        let mut probe = Probe { fail_mount: true, ..Probe::default() };
        assert!(probe.mount().is_err());
        // Init already ran, so the retry skips it.
        assert_eq!(probe.state(), LifecycleState::Initialized);
        assert_eq!(probe.inits, 1);
    }

    #[test]
    fn unmount_failure_is_swallowed() {
        let mut probe = Probe { fail_unmount: true, ..Probe::default() };
        probe.mount().unwrap();
        probe.unmount();
        assert_eq!(probe.state(), LifecycleState::Unmounted);
    }

    #[test]
    fn unmount_before_init_is_noop() {
        let mut probe = Probe::default();
        probe.unmount();
        assert_eq!(probe.state(), LifecycleState::Uninitialized);
        assert_eq!(probe.unmounts, 0);
    }

    #[test]
    fn destroy_is_idempotent() {
        let mut probe = Probe::default();
        probe.mount().unwrap();
        probe.destroy();
        probe.destroy();
        assert_eq!(probe.destroys, 1);
        assert_eq!(probe.state(), LifecycleState::Destroyed);
    }

    #[test]
    fn mount_after_destroy_is_rejected() {
        let mut probe = Probe::default();
        probe.destroy();
        probe.mount().unwrap();
        assert_eq!(probe.state(), LifecycleState::Destroyed);
        assert_eq!(probe.mounts, 0);
    }
}
