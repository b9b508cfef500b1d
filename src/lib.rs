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

//! Lazily compiled GPU shader objects that survive context loss.
//!
//! A [`Shader`] is parsed from a precompiled resource without touching the GPU. The first
//! call to [`Shader::handle`] compiles it against a [`ShaderBackend`], and the handle is
//! cached until the graphics context is lost or the shader is disposed. After that, the next
//! call compiles it again from the source text it kept around.
//!
//! Native objects are only ever deleted on the thread that owns the context. Disposal hands
//! them to a [`ReleaseQueue`], which the context owner drains with [`ReleaseQueue::process`].
//!
//! The [`ShaderBackend`] trait is the only thing that talks to the GPU. The `gpu-shader-glow`
//! crate implements it for [`glow`].
//!
//! [`glow`]: https://crates.io/crates/glow

#![forbid(unsafe_code)]

mod attribute;
mod config;
mod error;
mod fingerprint;
mod gpu_backend;
mod loader;
mod reader;
mod release;
mod sampler;
mod shader;

pub use attribute::{Attribute, AttributeTable, VertexElementUsage};
pub use config::{ShaderConfig, DEFAULT_MAX_INFO_LOG_LEN};
pub use error::{CompileDiagnostic, Error, Malformed, Result};
pub use fingerprint::Fingerprint;
pub use gpu_backend::{BackendCall, BackendErrorCode, ShaderBackend, ShaderStage};
pub use loader::ShaderLoader;
pub use release::{ReleaseQueue, Releaser};
pub use sampler::Sampler;
pub use shader::Shader;

struct CallOnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for CallOnDrop<F> {
    fn drop(&mut self) {
        (self.0)();
    }
}
