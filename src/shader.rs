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

//! The shader object itself.

use crate::attribute::{AttributeTable, VertexElementUsage};
use crate::config::ShaderConfig;
use crate::error::{CompileDiagnostic, Error, Result};
use crate::gpu_backend::{self, BackendCall, ShaderBackend, ShaderStage};
use crate::reader::{self, ByteReader};
use crate::release::Releaser;
use crate::sampler::Sampler;
use crate::{CallOnDrop, Fingerprint};

use std::fmt;
use std::mem;

/// A shader that compiles itself on first use.
///
/// Parsing the resource never touches the GPU. The native object is created by [`handle`],
/// thrown away by [`on_context_lost`] and [`dispose`], and recreated from the retained source
/// on the next call to [`handle`].
///
/// [`handle`]: Shader::handle
/// [`on_context_lost`]: Shader::on_context_lost
/// [`dispose`]: Shader::dispose
pub struct Shader<B: ShaderBackend + ?Sized> {
    /// The stage this shader compiles for.
    stage: ShaderStage,

    /// Source text decoded from the bytecode.
    source: Box<str>,

    /// Hash of the raw bytecode.
    fingerprint: Fingerprint,

    /// Declared vertex attributes.
    attributes: AttributeTable,

    /// Sampler uniforms, filled in from program metadata.
    samplers: Vec<Sampler>,

    /// The compiled shader object, if there is one in the current context.
    handle: Option<B::Shader>,

    /// Where the handle goes when this shader is disposed.
    releaser: Releaser<B::Shader>,

    config: ShaderConfig,
}

impl<B: ShaderBackend + ?Sized> fmt::Debug for Shader<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shader")
            .field("stage", &self.stage)
            .field("fingerprint", &self.fingerprint)
            .field("attributes", &self.attributes.len())
            .field("samplers", &self.samplers.len())
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl<B: ShaderBackend + ?Sized> Shader<B> {
    /// Parse a shader from its bytecode blob and its attribute section.
    pub(crate) fn from_parts(
        stage: ShaderStage,
        bytecode: &[u8],
        attributes: &[u8],
        releaser: Releaser<B::Shader>,
        config: ShaderConfig,
    ) -> Result<Self> {
        let attributes = AttributeTable::parse(&mut ByteReader::new(attributes))?;

        Ok(Self::assemble(stage, bytecode, attributes, releaser, config))
    }

    /// Parse a shader from a length-prefixed bytecode blob followed by its attributes.
    pub(crate) fn from_bytes(
        stage: ShaderStage,
        data: &[u8],
        releaser: Releaser<B::Shader>,
        config: ShaderConfig,
    ) -> Result<Self> {
        let mut reader = ByteReader::new(data);

        let len = reader.u32_le("bytecode length")?;
        let bytecode = reader.bytes(len as usize, "bytecode")?;
        let attributes = AttributeTable::parse(&mut reader)?;

        Ok(Self::assemble(stage, bytecode, attributes, releaser, config))
    }

    fn assemble(
        stage: ShaderStage,
        bytecode: &[u8],
        attributes: AttributeTable,
        releaser: Releaser<B::Shader>,
        config: ShaderConfig,
    ) -> Self {
        Self {
            stage,
            source: reader::decode_ascii(bytecode).into_boxed_str(),
            fingerprint: Fingerprint::of(bytecode),
            attributes,
            samplers: Vec::new(),
            handle: None,
            releaser,
            config,
        }
    }

    /// The stage this shader compiles for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The source text submitted to the compiler.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The fingerprint of the raw bytecode.
    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// The declared vertex attributes.
    pub fn attributes(&self) -> &AttributeTable {
        &self.attributes
    }

    /// The sampler uniforms.
    pub fn samplers(&self) -> &[Sampler] {
        &self.samplers
    }

    /// Replace the sampler uniforms with ones read from program metadata.
    pub fn set_samplers(&mut self, samplers: impl IntoIterator<Item = Sampler>) {
        self.samplers = samplers.into_iter().collect();
    }

    /// Whether a native object currently exists.
    pub fn is_compiled(&self) -> bool {
        self.handle.is_some()
    }

    /// Get the native shader object, compiling it if necessary.
    ///
    /// Compilation is synchronous. A failed compile leaves the shader uncompiled, so the next
    /// call tries again from scratch.
    pub fn handle(&mut self, backend: &B) -> Result<B::Shader> {
        if let Some(handle) = self.handle {
            return Ok(handle);
        }

        let handle = self.compile(backend)?;
        self.handle = Some(handle);

        Ok(handle)
    }

    fn compile(&self, backend: &B) -> Result<B::Shader> {
        let shader = backend
            .create_shader(self.stage)
            .map_err(|err| Error::Backend(Box::new(err)))?;

        // Any early return past this point must not leak the object.
        let delete_on_error = CallOnDrop(|| gpu_backend::delete_if_live(backend, shader));
        gpu_backend::check(backend, BackendCall::CreateShader)?;

        backend.shader_source(shader, &self.source);
        gpu_backend::check(backend, BackendCall::ShaderSource)?;

        backend.compile_shader(shader);
        gpu_backend::check(backend, BackendCall::CompileShader)?;

        let compiled = backend.shader_compile_status(shader);
        gpu_backend::check(backend, BackendCall::CompileStatus)?;

        if !compiled {
            let max_len = self.config.max_info_log_len;
            let log = backend.shader_info_log(shader, max_len);
            gpu_backend::check(backend, BackendCall::InfoLog)?;

            let diagnostic = CompileDiagnostic::new(self.stage, self.fingerprint, log, max_len);
            tracing::debug!("{:?} shader {} failed to compile", self.stage, self.fingerprint);

            return Err(Error::CompilationFailed(Box::new(diagnostic)));
        }

        mem::forget(delete_on_error);
        tracing::debug!(
            "compiled {:?} shader {} as {shader:?}",
            self.stage,
            self.fingerprint
        );

        Ok(shader)
    }

    /// Query `program` for the binding slot of every attribute.
    ///
    /// This overwrites the locations from whatever program was linked before. Attributes the
    /// program does not use end up unresolved; that is not an error.
    pub fn resolve_attribute_locations(&mut self, backend: &B, program: B::Program) -> Result<()> {
        self.attributes.resolve(|name| {
            let location = backend.attrib_location(program, name);
            gpu_backend::check(backend, BackendCall::AttribLocation)?;
            Ok(location)
        })
    }

    /// Get the resolved location of the first attribute with this usage and index.
    ///
    /// Returns `None` if no such attribute is declared or if it is not used by the most
    /// recently linked program.
    pub fn attribute_location(&self, usage: VertexElementUsage, index: u8) -> Option<u32> {
        self.attributes.location(usage, index)
    }

    /// Point every sampler uniform in `program` at its texture unit.
    ///
    /// `program` must be the program currently in use. Samplers the program optimized out are
    /// skipped.
    pub fn bind_sampler_units(&self, backend: &B, program: B::Program) -> Result<()> {
        for sampler in &self.samplers {
            let location = backend.uniform_location(program, &sampler.name);
            gpu_backend::check(backend, BackendCall::UniformLocation)?;

            match location {
                Some(location) => {
                    backend.uniform_1_i32(&location, sampler.texture_slot);
                    gpu_backend::check(backend, BackendCall::Uniform1i)?;
                }
                None => tracing::trace!("sampler {} is not used by {program:?}", sampler.name),
            }
        }

        Ok(())
    }

    /// Forget the native object because the graphics device is resetting.
    ///
    /// The object is deleted if the backend still recognizes it. The next call to
    /// [`handle`](Shader::handle) recompiles.
    pub fn on_context_lost(&mut self, backend: &B) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!("dropping {handle:?} for shader {}", self.fingerprint);
            gpu_backend::delete_if_live(backend, handle);
        }
    }

    /// Give the native object back to the context owner for deletion.
    ///
    /// The delete itself happens when the owner processes its [`ReleaseQueue`]. Calling this
    /// on a shader without a native object does nothing.
    ///
    /// [`ReleaseQueue`]: crate::ReleaseQueue
    pub fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.releaser.release(handle);
        }
    }
}

impl<B: ShaderBackend + ?Sized> Drop for Shader<B> {
    fn drop(&mut self) {
        self.dispose();
    }
}
