//! Player-move notifications
//!
//! Each vehicle tick publishes one [`MoveEvent`] to every subscriber, in
//! subscription order. Subscribers can be closures or an mpsc channel.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::{self, Receiver};
use tracing::trace;

/// State of the craft after a vehicle tick
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveEvent {
    pub position: DVec3,
    pub velocity: DVec3,
    /// Applied force, after vehicle scaling
    pub force: DVec3,
    /// Applied torque, after vehicle scaling
    pub torque: DVec3,
    pub light_vector: DVec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverHandle(u64);

pub type MoveCallback = Box<dyn FnMut(&MoveEvent) + Send>;

#[derive(Default)]
pub struct MoveObservers {
    next: u64,
    callbacks: Vec<(ObserverHandle, MoveCallback)>,
}

impl MoveObservers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> ObserverHandle
    where
        F: FnMut(&MoveEvent) + Send + 'static,
    {
        let handle = ObserverHandle(self.next);
        self.next += 1;
        self.callbacks.push((handle, Box::new(callback)));
        handle
    }

    /// Returns false if the handle was already removed
    pub fn unsubscribe(&mut self, handle: ObserverHandle) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(h, _)| *h != handle);
        self.callbacks.len() != before
    }

    /// Receive every future event on a channel until `handle` is
    /// unsubscribed
    pub fn channel(&mut self) -> (ObserverHandle, Receiver<MoveEvent>) {
        let (tx, rx) = mpsc::channel();
        let handle = self.subscribe(move |event| {
            // Receiver dropped; nothing left to deliver to
            let _ = tx.send(*event);
        });
        (handle, rx)
    }

    pub fn notify(&mut self, event: &MoveEvent) {
        trace!(observers = self.callbacks.len(), "player moved");
        for (_, callback) in self.callbacks.iter_mut() {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl std::fmt::Debug for MoveObservers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveObservers")
            .field("subscribers", &self.callbacks.len())
            .finish()
    }
}
