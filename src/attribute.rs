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

//! The vertex attribute table declared by a shader.

use crate::error::{Malformed, Result};
use crate::reader::ByteReader;

/// The semantic role of a vertex attribute.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexElementUsage {
    /// Vertex position.
    Position,

    /// Vertex color.
    Color,

    /// Texture coordinate.
    TextureCoordinate,

    /// Vertex normal.
    Normal,

    /// Vertex binormal.
    Binormal,

    /// Vertex tangent.
    Tangent,

    /// Blending indices for skinning.
    BlendIndices,

    /// Blending weights for skinning.
    BlendWeight,

    /// Depth value.
    Depth,

    /// Fog value.
    Fog,

    /// Point sprite size.
    PointSize,

    /// Multisampling sample.
    Sample,

    /// Tessellation factor.
    TessellateFactor,
}

impl VertexElementUsage {
    /// Convert an ordinal from the binary format.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Some(match ordinal {
            0 => Self::Position,
            1 => Self::Color,
            2 => Self::TextureCoordinate,
            3 => Self::Normal,
            4 => Self::Binormal,
            5 => Self::Tangent,
            6 => Self::BlendIndices,
            7 => Self::BlendWeight,
            8 => Self::Depth,
            9 => Self::Fog,
            10 => Self::PointSize,
            11 => Self::Sample,
            12 => Self::TessellateFactor,
            _ => return None,
        })
    }
}

/// A vertex attribute declared by the shader source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The role of the attribute.
    pub usage: VertexElementUsage,

    /// Distinguishes repeated usages, like the `1` in `texcoord1`.
    pub index: u8,

    /// The identifier used in the shader source.
    pub name: String,

    /// The element encoding. Informational only.
    pub format: i16,

    /// The binding slot in the most recently linked program.
    ///
    /// `None` until resolved, or if the program does not use the attribute.
    pub location: Option<u32>,
}

/// The ordered list of attributes a shader declares.
///
/// The entries are fixed once parsed; only their resolved locations change, and those are
/// overwritten every time the shader is linked into a new program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTable {
    attributes: Box<[Attribute]>,
}

impl AttributeTable {
    /// Parse a one-byte count followed by that many attribute records.
    pub(crate) fn parse(reader: &mut ByteReader<'_>) -> Result<Self> {
        let count = reader.u8("attribute count")?;

        let attributes = (0..count)
            .map(|_| {
                let name = reader.string("attribute name")?.to_owned();

                let ordinal = reader.u8("attribute usage")?;
                let usage = VertexElementUsage::from_ordinal(ordinal)
                    .ok_or_else(|| reader.error(Malformed::UnknownUsage(ordinal)))?;

                let index = reader.u8("attribute index")?;
                let format = reader.i16_le("attribute format")?;

                Ok(Attribute {
                    usage,
                    index,
                    name,
                    format,
                    location: None,
                })
            })
            .collect::<Result<_>>()?;

        Ok(Self { attributes })
    }

    /// Find the location of the first attribute with this usage and index.
    pub fn location(&self, usage: VertexElementUsage, index: u8) -> Option<u32> {
        self.attributes
            .iter()
            .find(|attr| attr.usage == usage && attr.index == index)
            .and_then(|attr| attr.location)
    }

    /// Resolve every location with `lookup`, in declaration order.
    ///
    /// Stops at the first error and leaves every location unresolved.
    pub(crate) fn resolve<E>(
        &mut self,
        mut lookup: impl FnMut(&str) -> Result<Option<u32>, E>,
    ) -> Result<(), E> {
        for i in 0..self.attributes.len() {
            let attr = &mut self.attributes[i];

            match lookup(&attr.name) {
                Ok(location) => {
                    attr.location = location;
                    tracing::trace!("attribute {} resolved to {:?}", attr.name, location);
                }
                Err(err) => {
                    self.clear_locations();
                    return Err(err);
                }
            }
        }

        Ok(())
    }

    fn clear_locations(&mut self) {
        for attr in self.attributes.iter_mut() {
            attr.location = None;
        }
    }

    /// Iterate over the attributes.
    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.attributes.iter()
    }

    /// The number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the shader declares no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttributeTable {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
