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

//! Builds shaders out of serialized resources.

use crate::config::ShaderConfig;
use crate::error::Result;
use crate::gpu_backend::{ShaderBackend, ShaderStage};
use crate::release::{ReleaseQueue, Releaser};
use crate::shader::Shader;

use std::fmt;

/// Turns serialized shader resources into [`Shader`]s.
///
/// Loading only parses; it does not need the graphics context and can run on any thread.
pub struct ShaderLoader<B: ShaderBackend + ?Sized> {
    releaser: Releaser<B::Shader>,
    config: ShaderConfig,
}

impl<B: ShaderBackend + ?Sized> fmt::Debug for ShaderLoader<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderLoader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<B: ShaderBackend + ?Sized> Clone for ShaderLoader<B> {
    fn clone(&self) -> Self {
        Self {
            releaser: self.releaser.clone(),
            config: self.config,
        }
    }
}

impl<B: ShaderBackend + ?Sized> ShaderLoader<B> {
    /// Create a loader whose shaders release into `queue`.
    pub fn new(queue: &ReleaseQueue<B::Shader>) -> Self {
        Self::with_config(queue, ShaderConfig::default())
    }

    /// Create a loader with a custom configuration.
    pub fn with_config(queue: &ReleaseQueue<B::Shader>, config: ShaderConfig) -> Self {
        Self {
            releaser: queue.releaser(),
            config,
        }
    }

    /// The configuration handed to every loaded shader.
    pub fn config(&self) -> &ShaderConfig {
        &self.config
    }

    /// Load a shader from a complete resource.
    ///
    /// The layout is a little-endian `u32` bytecode length, the bytecode, a one-byte
    /// attribute count, then the attribute records. Anything after the last record is
    /// ignored.
    pub fn load(&self, stage: ShaderStage, data: &[u8]) -> Result<Shader<B>> {
        let shader = Shader::from_bytes(stage, data, self.releaser.clone(), self.config)?;
        tracing::debug!(
            "loaded {:?} shader {} with {} attributes",
            stage,
            shader.fingerprint(),
            shader.attributes().len()
        );

        Ok(shader)
    }

    /// Load a shader whose bytecode was already split out by the container reader.
    ///
    /// `attributes` starts at the one-byte attribute count.
    pub fn load_parts(
        &self,
        stage: ShaderStage,
        bytecode: &[u8],
        attributes: &[u8],
    ) -> Result<Shader<B>> {
        Shader::from_parts(
            stage,
            bytecode,
            attributes,
            self.releaser.clone(),
            self.config,
        )
    }
}
