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

//! Sampler uniforms and the texture units they read from.

/// A sampler uniform declared by a shader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sampler {
    /// The uniform's identifier in the shader source.
    pub name: String,

    /// The texture unit the sampler reads from.
    pub texture_slot: i32,
}

impl Sampler {
    /// Create a new sampler descriptor.
    pub fn new(name: impl Into<String>, texture_slot: i32) -> Self {
        Self {
            name: name.into(),
            texture_slot,
        }
    }
}
