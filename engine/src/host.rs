//! Process-level ownership of the run loop.
//!
//! The host creates exactly one [`RunLoop`], drives its blocking `run`, and
//! tears it down on every way out of [`Host::start`]: normal return, an
//! error from `run`, or a panic unwinding through it.

use std::thread::{self, ThreadId};

use log::{debug, error, info};

use crate::error::HostError;

/// A blocking interactive session the [`Host`] can own.
pub trait RunLoop {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Blocks until the session ends.
    fn run(&mut self) -> Result<(), Self::Error>;

    /// Releases everything the session holds.
    ///
    /// Called exactly once by the host, also after `run` failed or panicked.
    fn dispose(self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    NotStarted,
    Running,
    Terminated,
}

/// The thread a [`Host`] is allowed to start on.
///
/// The windowing and graphics stack keeps per-thread state, so the whole
/// session has to live on the thread that owns the event loop.
#[derive(Debug, Clone)]
pub struct ThreadAffinity {
    id: ThreadId,
    label: String,
}

impl ThreadAffinity {
    /// Binds to the process main thread.
    pub fn main() -> Result<Self, HostError> {
        let current = thread::current();
        if current.name() != Some("main") {
            return Err(HostError::NotMainThread {
                actual: describe(&current),
            });
        }
        Ok(Self::current())
    }

    /// Binds to whatever thread is calling.
    pub fn current() -> Self {
        let current = thread::current();
        Self {
            id: current.id(),
            label: describe(&current),
        }
    }

    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    pub fn check(&self) -> Result<(), HostError> {
        if self.is_current() {
            return Ok(());
        }
        Err(HostError::WrongThread {
            expected: self.label.clone(),
            actual: describe(&thread::current()),
        })
    }
}

fn describe(thread: &thread::Thread) -> String {
    match thread.name() {
        Some(name) => format!("'{name}' ({:?})", thread.id()),
        None => format!("{:?}", thread.id()),
    }
}

#[derive(Debug)]
pub struct Host {
    affinity: ThreadAffinity,
    state: Lifecycle,
}

impl Host {
    pub fn new(affinity: ThreadAffinity) -> Self {
        Self {
            affinity,
            state: Lifecycle::NotStarted,
        }
    }

    /// A host that may only start on the process main thread.
    pub fn on_main_thread() -> Result<Self, HostError> {
        ThreadAffinity::main().map(Self::new)
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Constructs the run loop with `construct`, runs it to completion and
    /// disposes of it.
    ///
    /// Blocks for the whole session. Must be called on the host's designated
    /// thread and at most once per host.
    pub fn start<R, F>(&mut self, construct: F) -> Result<(), HostError>
    where
        R: RunLoop,
        F: FnOnce() -> Result<R, R::Error>,
    {
        self.affinity.check()?;
        if self.state != Lifecycle::NotStarted {
            return Err(HostError::AlreadyStarted);
        }

        let mut session = Session::enter(&mut self.state);
        let instance = construct().map_err(|err| {
            error!("run loop construction failed: {err}");
            HostError::Construction(anyhow::Error::new(err))
        })?;
        session.adopt(instance);

        let result = session.run();
        drop(session);

        result.map_err(|err| {
            error!("run loop failed: {err}");
            HostError::Run(anyhow::Error::new(err))
        })
    }
}

/// Scoped ownership of the run loop while the host is running.
///
/// Dropping the session disposes of the instance (if one was adopted) and
/// marks the host terminated, which also happens while unwinding.
struct Session<'h, R: RunLoop> {
    instance: Option<R>,
    state: &'h mut Lifecycle,
}

impl<'h, R: RunLoop> Session<'h, R> {
    fn enter(state: &'h mut Lifecycle) -> Self {
        debug!("host: {:?} -> {:?}", *state, Lifecycle::Running);
        *state = Lifecycle::Running;
        Self {
            instance: None,
            state,
        }
    }

    fn adopt(&mut self, instance: R) {
        self.instance = Some(instance);
    }

    fn run(&mut self) -> Result<(), R::Error> {
        match self.instance.as_mut() {
            Some(instance) => instance.run(),
            None => Ok(()),
        }
    }
}

impl<R: RunLoop> Drop for Session<'_, R> {
    fn drop(&mut self) {
        if let Some(instance) = self.instance.take() {
            if thread::panicking() {
                error!("run loop panicked, disposing");
            }
            instance.dispose();
            info!("run loop disposed");
        }
        debug!("host: {:?} -> {:?}", *self.state, Lifecycle::Terminated);
        *self.state = Lifecycle::Terminated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("nope")]
    struct Nope;

    struct Idle;

    impl RunLoop for Idle {
        type Error = Nope;

        fn run(&mut self) -> Result<(), Nope> {
            Ok(())
        }

        fn dispose(self) {}
    }

    #[test]
    fn new_host_has_not_started() {
        let host = Host::new(ThreadAffinity::current());
        assert_eq!(host.state(), Lifecycle::NotStarted);
    }

    #[test]
    fn affinity_accepts_its_own_thread() {
        assert!(ThreadAffinity::current().check().is_ok());
    }

    #[test]
    fn affinity_rejects_other_threads() {
        let affinity = ThreadAffinity::current();
        let result = thread::spawn(move || affinity.check()).join().unwrap();
        assert!(matches!(result, Err(HostError::WrongThread { .. })));
    }

    #[test]
    fn main_affinity_rejects_unnamed_thread() {
        let result = thread::spawn(ThreadAffinity::main).join().unwrap();
        assert!(matches!(result, Err(HostError::NotMainThread { .. })));
    }

    #[test]
    fn start_terminates_host() {
        let mut host = Host::new(ThreadAffinity::current());
        host.start(|| Ok(Idle)).unwrap();
        assert_eq!(host.state(), Lifecycle::Terminated);
    }

    #[test]
    fn construction_error_keeps_source() {
        let mut host = Host::new(ThreadAffinity::current());
        let err = host.start(|| Err::<Idle, _>(Nope)).unwrap_err();
        let HostError::Construction(source) = err else {
            panic!("expected construction failure, got {err:?}");
        };
        assert!(source.downcast_ref::<Nope>().is_some());
        assert_eq!(host.state(), Lifecycle::Terminated);
    }
}
