//! State cells that validate, update, and notify on change.

use crate::connection::Connection;
use crate::engine;
use crate::error::Error;
use crate::payload::NoopOps;
use crate::sink::Sink;
use crate::source::Source;
use crate::time::Timeout;
use std::sync::{Arc, Mutex, MutexGuard, TryLockError};
use std::time::Instant;

type Validator<T> = dyn Fn(&T) -> Result<(), Error> + Send + Sync;

/// A mutex-guarded value cell that validates writes, optionally notifies a
/// single "owner" sink, and fans the new value out to any number of
/// external observers through an internal source.
///
/// The internal source uses a no-op [`PayloadOps`](crate::payload::PayloadOps)
/// (always `Delivered`) purely so its mere presence lets the source bypass
/// the single-sink-without-ops restriction — observers don't need real
/// ref/unref bookkeeping since each notification is an independent `Arc<T>`.
pub struct Observable<T: Clone + Send + Sync + 'static> {
    value: Mutex<T>,
    validator: Option<Arc<Validator<T>>>,
    owner: Option<Arc<Sink<Arc<T>, ()>>>,
    source: Source<Arc<T>, ()>,
}

impl<T: Clone + Send + Sync + 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: Mutex::new(initial),
            validator: None,
            owner: None,
            source: Source::fan_out(
                #[cfg(feature = "names")]
                "observable",
                Arc::new(NoopOps),
            ),
        }
    }

    pub fn with_validator(
        initial: T,
        validator: impl Fn(&T) -> Result<(), Error> + Send + Sync + 'static,
    ) -> Self {
        let mut obs = Self::new(initial);
        obs.validator = Some(Arc::new(validator));
        obs
    }

    pub fn with_owner(mut self, owner: Arc<Sink<Arc<T>, ()>>) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Subscribe an external observer; it is notified on every subsequent
    /// `set`/`publish`, immediately or queued per its own mode.
    pub fn subscribe(&self, sink: Arc<Sink<Arc<T>, ()>>) {
        self.source.link(Arc::new(Connection::new(sink)));
    }

    /// Validate `candidate` without applying it.
    pub fn validate(&self, candidate: &T) -> Result<(), Error> {
        match &self.validator {
            Some(v) => v(candidate),
            None => Ok(()),
        }
    }

    pub fn get(&self) -> T {
        self.value.lock().unwrap().clone()
    }

    /// Validate, replace the value under the mutex, then notify the owner
    /// (if any) and every external observer. Returns the number of external
    /// observers notified.
    pub fn set(&self, new_value: T) -> Result<usize, Error> {
        self.validate(&new_value)?;
        *self.value.lock().unwrap() = new_value;
        self.notify()
    }

    /// Acquire the value under the mutex for in-place mutation, waiting up
    /// to `timeout`. The guard must be consumed via `finish` or `publish` —
    /// whether the update is announced is always explicit at the call site.
    pub fn claim(&self, timeout: Timeout) -> Result<ObservableGuard<'_, T>, Error> {
        let guard = lock_with_timeout(&self.value, timeout)?;
        Ok(ObservableGuard {
            observable: self,
            guard,
        })
    }

    fn notify(&self) -> Result<usize, Error> {
        let value = Arc::new(self.get());
        if let Some(owner) = &self.owner {
            engine::send_direct(owner, value.clone(), None, Timeout::NonBlocking)?;
        }
        engine::emit(&self.source, value, Timeout::NonBlocking)
    }
}

fn lock_with_timeout<T>(mutex: &Mutex<T>, timeout: Timeout) -> Result<MutexGuard<'_, T>, Error> {
    match timeout {
        Timeout::Indefinite => Ok(mutex.lock().unwrap()),
        Timeout::NonBlocking => mutex.try_lock().map_err(|_| Error::Timeout),
        Timeout::After(d) => {
            let deadline = Instant::now() + d;
            loop {
                match mutex.try_lock() {
                    Ok(g) => return Ok(g),
                    Err(TryLockError::WouldBlock) => {
                        if Instant::now() >= deadline {
                            return Err(Error::Timeout);
                        }
                        std::hint::spin_loop();
                    }
                    Err(TryLockError::Poisoned(e)) => return Ok(e.into_inner()),
                }
            }
        }
    }
}

/// An exclusive, in-place view of an [`Observable`]'s value, held under its
/// mutex.
pub struct ObservableGuard<'a, T: Clone + Send + Sync + 'static> {
    observable: &'a Observable<T>,
    guard: MutexGuard<'a, T>,
}

impl<'a, T: Clone + Send + Sync + 'static> ObservableGuard<'a, T> {
    pub fn get(&self) -> &T {
        &self.guard
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.guard
    }

    /// Release the claim without notifying anyone.
    pub fn finish(self) {
        drop(self.guard);
    }

    /// Release the claim and run the same notification sequence as `set`.
    pub fn publish(self) -> Result<usize, Error> {
        drop(self.guard);
        self.observable.notify()
    }
}
