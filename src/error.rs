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

//! Error types for shader loading and compilation.

use crate::gpu_backend::{BackendCall, BackendErrorCode, ShaderStage};
use crate::Fingerprint;

use std::error::Error as StdError;

/// A specialized result type for shader operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error that occurred while loading or compiling a shader.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The shader resource could not be parsed.
    #[error("malformed shader resource at byte {offset}: {reason}")]
    MalformedResource {
        /// The offset into the stream where parsing failed.
        offset: usize,

        /// What was wrong with the stream.
        reason: Malformed,
    },

    /// The compiler rejected the shader source.
    #[error("{} shader {} failed to compile", stage_name(.0.stage), .0.fingerprint)]
    CompilationFailed(Box<CompileDiagnostic>),

    /// A backend call raised an error flag.
    ///
    /// This means the call itself was invalid, usually because of a stale handle or because the
    /// context was in the wrong state.
    #[error("backend raised {code} after `{call}`")]
    UnexpectedBackendState {
        /// The call that was being checked.
        call: BackendCall,

        /// The error flag that was raised.
        code: BackendErrorCode,
    },

    /// The backend refused to allocate a shader object.
    #[error("failed to create shader object")]
    Backend(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

impl Error {
    /// Get the compiler diagnostic, if this is a compilation failure.
    pub fn diagnostic(&self) -> Option<&CompileDiagnostic> {
        match self {
            Self::CompilationFailed(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

/// The reason a shader resource is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Malformed {
    /// The stream ended early.
    #[error("expected {needed} more bytes for {what}, but only {remaining} remain")]
    Truncated {
        /// The field being read.
        what: &'static str,

        /// How many bytes the field needs.
        needed: usize,

        /// How many bytes were left.
        remaining: usize,
    },

    /// A variable-length string prefix did not terminate.
    #[error("string length prefix is too long")]
    BadLengthPrefix,

    /// A string was not valid UTF-8.
    #[error("attribute name is not valid UTF-8")]
    InvalidUtf8,

    /// An attribute usage ordinal is out of range.
    #[error("unknown vertex element usage {0}")]
    UnknownUsage(u8),
}

/// The diagnostic produced when a shader fails to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    /// The stage the shader was compiled for.
    pub stage: ShaderStage,

    /// The fingerprint of the shader's bytecode.
    pub fingerprint: Fingerprint,

    /// The compiler's log.
    pub log: String,

    /// Whether `log` was cut short to fit the configured limit.
    pub truncated: bool,
}

impl CompileDiagnostic {
    pub(crate) fn new(
        stage: ShaderStage,
        fingerprint: Fingerprint,
        mut log: String,
        max_len: usize,
    ) -> Self {
        let truncated = truncate_log(&mut log, max_len);

        Self {
            stage,
            fingerprint,
            log,
            truncated,
        }
    }
}

/// Cut `log` down to at most `max_len` bytes, on a character boundary.
fn truncate_log(log: &mut String, max_len: usize) -> bool {
    if log.len() <= max_len {
        return false;
    }

    let mut end = max_len;
    while !log.is_char_boundary(end) {
        end -= 1;
    }
    log.truncate(end);

    true
}

fn stage_name(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex => "vertex",
        ShaderStage::Fragment => "fragment",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_logs_are_untouched() {
        let mut log = String::from("0:1: error");
        assert!(!truncate_log(&mut log, 64));
        assert_eq!(log, "0:1: error");
    }

    #[test]
    fn long_logs_cut_on_char_boundary() {
        // "é" is two bytes, so a limit of 2 cannot split it.
        let mut log = String::from("aé error");
        assert!(truncate_log(&mut log, 2));
        assert_eq!(log, "a");

        let mut log = String::from("abcdef");
        assert!(truncate_log(&mut log, 3));
        assert_eq!(log, "abc");
    }

    #[test]
    fn compilation_failure_display() {
        let err = Error::CompilationFailed(Box::new(CompileDiagnostic::new(
            ShaderStage::Fragment,
            Fingerprint::of(b"void main(){}"),
            "syntax error".into(),
            4096,
        )));

        let display = err.to_string();
        assert!(display.starts_with("fragment shader "));
        assert!(display.ends_with("failed to compile"));
        assert_eq!(err.diagnostic().unwrap().log, "syntax error");
    }

    #[test]
    fn malformed_display_includes_offset() {
        let err = Error::MalformedResource {
            offset: 7,
            reason: Malformed::UnknownUsage(42),
        };

        assert_eq!(
            err.to_string(),
            "malformed shader resource at byte 7: unknown vertex element usage 42"
        );
        assert!(err.diagnostic().is_none());
    }
}
