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

//! Defines the GPU backend for gpu-shader.

use std::error::Error;
use std::fmt;

/// The backend for compiling and querying shaders.
///
/// Every method is expected to be called on the thread that owns the active graphics
/// context. None of the state-mutating calls report errors directly; instead, the caller
/// follows each of them with [`last_error`], mirroring the global error flag exposed by
/// OpenGL-like APIs.
///
/// [`last_error`]: ShaderBackend::last_error
pub trait ShaderBackend {
    /// A handle to a shader object living in the current context.
    ///
    /// This corresponds to [`Shader`] in [`glow`].
    ///
    /// [`Shader`]: https://docs.rs/glow/latest/glow/trait.HasContext.html#associatedtype.Shader
    /// [`glow`]: https://crates.io/crates/glow
    type Shader: Copy + PartialEq + fmt::Debug;

    /// A handle to a linked program.
    type Program: Copy + fmt::Debug;

    /// The location of a uniform inside of a linked program.
    type UniformLocation;

    /// The error type associated with this backend.
    type Error: Error + Send + Sync + 'static;

    /// Allocate a new, empty shader object for the given stage.
    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, Self::Error>;

    /// Replace the source text of a shader.
    fn shader_source(&self, shader: Self::Shader, source: &str);

    /// Compile the source text currently attached to a shader.
    fn compile_shader(&self, shader: Self::Shader);

    /// Whether the last compilation of this shader succeeded.
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;

    /// Read back the compiler's diagnostic log.
    ///
    /// Backends should not return more than `max_len` bytes; however, callers truncate the
    /// result again, so it is not an error to ignore the limit.
    fn shader_info_log(&self, shader: Self::Shader, max_len: usize) -> String;

    /// Whether `shader` is still recognized as a live shader object.
    fn is_shader(&self, shader: Self::Shader) -> bool;

    /// Delete a shader object.
    fn delete_shader(&self, shader: Self::Shader);

    /// Get the binding slot of a vertex attribute in a linked program.
    ///
    /// Returns `None` if the program has no active attribute with this name.
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;

    /// Get the location of a uniform in a linked program.
    ///
    /// Returns `None` if the program has no active uniform with this name.
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;

    /// Write an integer into a uniform of the program currently in use.
    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32);

    /// Take the error flag set by the most recent call, if any.
    fn last_error(&self) -> Option<BackendErrorCode>;
}

/// The pipeline stage a shader is compiled for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// The shader runs once per vertex.
    Vertex,

    /// The shader runs once per fragment.
    Fragment,
}

/// An error flag raised by the backend after a call.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum BackendErrorCode {
    /// An enumeration argument was out of range.
    InvalidEnum,

    /// A numeric argument was out of range.
    InvalidValue,

    /// The operation is not allowed in the current state.
    InvalidOperation,

    /// The command would overflow the stack.
    StackOverflow,

    /// The command would underflow the stack.
    StackUnderflow,

    /// There is not enough memory left to execute the command.
    OutOfMemory,

    /// The framebuffer object is not complete.
    InvalidFramebufferOperation,

    /// The context was lost due to a graphics card reset.
    ContextLost,

    /// A code this crate does not know about.
    Other(u32),
}

impl fmt::Display for BackendErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnum => f.write_str("GL_INVALID_ENUM"),
            Self::InvalidValue => f.write_str("GL_INVALID_VALUE"),
            Self::InvalidOperation => f.write_str("GL_INVALID_OPERATION"),
            Self::StackOverflow => f.write_str("GL_STACK_OVERFLOW"),
            Self::StackUnderflow => f.write_str("GL_STACK_UNDERFLOW"),
            Self::OutOfMemory => f.write_str("GL_OUT_OF_MEMORY"),
            Self::InvalidFramebufferOperation => f.write_str("GL_INVALID_FRAMEBUFFER_OPERATION"),
            Self::ContextLost => f.write_str("GL_CONTEXT_LOST"),
            Self::Other(code) => write!(f, "unknown error {code:#06x}"),
        }
    }
}

/// The backend call that was checked when an error flag was observed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BackendCall {
    /// [`ShaderBackend::create_shader`]
    CreateShader,

    /// [`ShaderBackend::shader_source`]
    ShaderSource,

    /// [`ShaderBackend::compile_shader`]
    CompileShader,

    /// [`ShaderBackend::shader_compile_status`]
    CompileStatus,

    /// [`ShaderBackend::shader_info_log`]
    InfoLog,

    /// [`ShaderBackend::delete_shader`]
    DeleteShader,

    /// [`ShaderBackend::attrib_location`]
    AttribLocation,

    /// [`ShaderBackend::uniform_location`]
    UniformLocation,

    /// [`ShaderBackend::uniform_1_i32`]
    Uniform1i,
}

impl fmt::Display for BackendCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CreateShader => "create_shader",
            Self::ShaderSource => "shader_source",
            Self::CompileShader => "compile_shader",
            Self::CompileStatus => "shader_compile_status",
            Self::InfoLog => "shader_info_log",
            Self::DeleteShader => "delete_shader",
            Self::AttribLocation => "attrib_location",
            Self::UniformLocation => "uniform_location",
            Self::Uniform1i => "uniform_1_i32",
        })
    }
}

/// Check the backend's error flag after `call`.
pub(crate) fn check<B: ShaderBackend + ?Sized>(
    backend: &B,
    call: BackendCall,
) -> Result<(), crate::Error> {
    match backend.last_error() {
        None => Ok(()),
        Some(code) => Err(crate::Error::UnexpectedBackendState { call, code }),
    }
}

/// Delete `shader` if the backend still knows about it.
///
/// This is used by every path that gives up a handle; none of them are allowed to fail, so
/// a fault here is logged instead of returned.
pub(crate) fn delete_if_live<B: ShaderBackend + ?Sized>(backend: &B, shader: B::Shader) {
    if backend.is_shader(shader) {
        backend.delete_shader(shader);

        if let Err(err) = check(backend, BackendCall::DeleteShader) {
            tracing::error!("failed to delete shader {shader:?}: {err}");
        }
    }
}
