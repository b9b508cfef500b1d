// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `gpu-shader`.
//
// `gpu-shader` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `gpu-shader` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `gpu-shader`. If not, see <https://www.gnu.org/licenses/>.

//! Deferred release of shader handles.
//!
//! Shaders may be dropped or disposed from anywhere, but their native objects can only be
//! deleted on the thread that owns the graphics context. Disposal therefore sends the handle
//! through a channel, and the context owner deletes it the next time it drains the queue.

use crate::gpu_backend::{self, ShaderBackend};

use crossbeam::channel::{self, Receiver, SendError, Sender};

use std::fmt;

/// The context-side end of the release channel.
pub struct ReleaseQueue<S> {
    sender: Sender<S>,
    receiver: Receiver<S>,
}

impl<S> fmt::Debug for ReleaseQueue<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseQueue")
            .field("pending", &self.receiver.len())
            .finish()
    }
}

impl<S> Default for ReleaseQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ReleaseQueue<S> {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = channel::unbounded();
        Self { sender, receiver }
    }

    /// Get a handle that shaders use to enqueue their native objects.
    pub fn releaser(&self) -> Releaser<S> {
        Releaser {
            sender: self.sender.clone(),
        }
    }

    /// The number of handles waiting to be deleted.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Delete every queued handle that the backend still recognizes.
    ///
    /// This must be called on the thread that owns the context. Returns the number of
    /// requests consumed.
    pub fn process<B>(&self, backend: &B) -> usize
    where
        B: ShaderBackend<Shader = S> + ?Sized,
    {
        let mut count = 0;

        for shader in self.receiver.try_iter() {
            gpu_backend::delete_if_live(backend, shader);
            count += 1;
        }

        if count > 0 {
            tracing::debug!("released {count} shader objects");
        }

        count
    }

    /// Flush pending requests while the graphics device is resetting.
    ///
    /// Call this before the new context starts handing out objects, so that a queued handle
    /// cannot be mistaken for one of its objects. Returns the number of requests consumed.
    pub fn on_context_lost<B>(&self, backend: &B) -> usize
    where
        B: ShaderBackend<Shader = S> + ?Sized,
    {
        let count = self.process(backend);

        if count > 0 {
            tracing::debug!("flushed {count} release requests during a device reset");
        }

        count
    }
}

/// The shader-side end of the release channel.
///
/// This can be sent to other threads as long as the handle type can.
pub struct Releaser<S> {
    sender: Sender<S>,
}

impl<S> Clone for Releaser<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S> fmt::Debug for Releaser<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Releaser").finish_non_exhaustive()
    }
}

impl<S: fmt::Debug> Releaser<S> {
    pub(crate) fn release(&self, shader: S) {
        if let Err(SendError(shader)) = self.sender.send(shader) {
            // The queue went away along with its context.
            tracing::debug!("release queue is closed, dropping {shader:?}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn releases_are_queued_until_processed() {
        let queue = ReleaseQueue::<u32>::new();
        let releaser = queue.releaser();

        releaser.release(1);
        releaser.clone().release(2);
        assert_eq!(queue.pending(), 2);
    }

    #[test]
    fn releases_from_other_threads() {
        let queue = ReleaseQueue::<u32>::new();
        let releaser = queue.releaser();

        std::thread::spawn(move || releaser.release(7))
            .join()
            .unwrap();

        assert_eq!(queue.pending(), 1);
    }

    #[test]
    fn closed_queue_does_not_panic() {
        let queue = ReleaseQueue::<u32>::new();
        let releaser = queue.releaser();
        drop(queue);

        releaser.release(3);
    }
}
