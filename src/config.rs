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

//! Tunable limits for shader compilation.

/// The default cap on the size of a compiler log, in bytes.
pub const DEFAULT_MAX_INFO_LOG_LEN: usize = 4096;

/// Configuration shared by every shader a [`ShaderLoader`] produces.
///
/// [`ShaderLoader`]: crate::ShaderLoader
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShaderConfig {
    /// The largest compiler log kept in a [`CompileDiagnostic`], in bytes.
    ///
    /// Longer logs are cut on a character boundary and flagged as truncated.
    ///
    /// [`CompileDiagnostic`]: crate::CompileDiagnostic
    pub max_info_log_len: usize,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            max_info_log_len: DEFAULT_MAX_INFO_LOG_LEN,
        }
    }
}

impl ShaderConfig {
    /// Set the compiler log cap.
    pub fn with_max_info_log_len(mut self, len: usize) -> Self {
        self.max_info_log_len = len;
        self
    }
}
