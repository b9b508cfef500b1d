// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `gpu-shader-glow`.
//
// `gpu-shader-glow` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `gpu-shader-glow` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `gpu-shader-glow`. If not, see <https://www.gnu.org/licenses/>.

//! An OpenGL backend for [`gpu-shader`] that uses the [`glow`] crate.
//!
//! [`glow`] papers over the differences between desktop OpenGL, OpenGL ES and WebGL, so one
//! [`GlBackend`] covers all three.
//!
//! [`gpu-shader`]: https://crates.io/crates/gpu-shader
//! [`glow`]: https://crates.io/crates/glow

use glow::HasContext;
use gpu_shader::{BackendErrorCode, ShaderBackend, ShaderStage};

use std::fmt;

/// A wrapper around a [`glow`] context that can compile shaders.
pub struct GlBackend<H: HasContext + ?Sized> {
    /// The underlying context.
    context: H,
}

impl<H: HasContext + ?Sized> fmt::Debug for GlBackend<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlBackend").finish_non_exhaustive()
    }
}

impl<H: HasContext> GlBackend<H> {
    /// Create a new [`GlBackend`] from a [`glow`] context.
    ///
    /// # Safety
    ///
    /// The context must be current whenever any [`ShaderBackend`] method is called on the
    /// returned value, and those calls must happen on the thread that owns it.
    pub unsafe fn new(context: H) -> Self {
        let version = context.version();
        tracing::debug!(
            "creating shader backend for {}OpenGL {}.{}",
            if version.is_embedded { "embedded " } else { "" },
            version.major,
            version.minor
        );

        Self { context }
    }

    /// Consume this structure and return the underlying context.
    pub fn into_inner(self) -> H {
        self.context
    }
}

impl<H: HasContext + ?Sized> GlBackend<H> {
    /// Get a reference to the underlying [`glow`] context.
    pub fn context(&self) -> &H {
        &self.context
    }
}

/// An error from the OpenGL driver.
#[derive(Debug)]
pub struct GlError(String);

impl From<String> for GlError {
    fn from(s: String) -> Self {
        GlError(s)
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gl error: {}", self.0)
    }
}

impl std::error::Error for GlError {}

impl<H: HasContext + ?Sized> ShaderBackend for GlBackend<H> {
    type Shader = H::Shader;
    type Program = H::Program;
    type UniformLocation = H::UniformLocation;
    type Error = GlError;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, Self::Error> {
        unsafe { self.context.create_shader(shader_type(stage)).gl_err() }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe {
            self.context.shader_source(shader, source);
        }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe {
            self.context.compile_shader(shader);
        }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.context.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader, max_len: usize) -> String {
        let log = unsafe { self.context.get_shader_info_log(shader) };

        if log.len() > max_len {
            tracing::trace!("driver returned {} bytes of log, limit is {max_len}", log.len());
        }

        log
    }

    fn is_shader(&self, shader: Self::Shader) -> bool {
        unsafe { self.context.is_shader(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe {
            self.context.delete_shader(shader);
        }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.context.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.context.get_uniform_location(program, name) }
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32) {
        unsafe {
            self.context.uniform_1_i32(Some(location), value);
        }
    }

    fn last_error(&self) -> Option<BackendErrorCode> {
        let err = unsafe { self.context.get_error() };
        let code = error_code(err)?;

        tracing::trace!("GL error: {}", code);
        Some(code)
    }
}

fn shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn error_code(err: u32) -> Option<BackendErrorCode> {
    Some(match err {
        glow::NO_ERROR => return None,
        glow::INVALID_ENUM => BackendErrorCode::InvalidEnum,
        glow::INVALID_VALUE => BackendErrorCode::InvalidValue,
        glow::INVALID_OPERATION => BackendErrorCode::InvalidOperation,
        glow::STACK_OVERFLOW => BackendErrorCode::StackOverflow,
        glow::STACK_UNDERFLOW => BackendErrorCode::StackUnderflow,
        glow::OUT_OF_MEMORY => BackendErrorCode::OutOfMemory,
        glow::INVALID_FRAMEBUFFER_OPERATION => BackendErrorCode::InvalidFramebufferOperation,
        glow::CONTEXT_LOST => BackendErrorCode::ContextLost,
        other => BackendErrorCode::Other(other),
    })
}

trait ResultExt<T, E> {
    fn gl_err(self) -> Result<T, GlError>;
}

impl<T, E: Into<GlError>> ResultExt<T, E> for Result<T, E> {
    fn gl_err(self) -> Result<T, GlError> {
        self.map_err(Into::into)
    }
}
