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

//! Content fingerprints for shader bytecode.

use ahash::RandomState;

use std::fmt;

// Fixed keys keep fingerprints stable across runs of the same build.
const SEEDS: [u64; 4] = [
    0x243f_6a88_85a3_08d3,
    0x1319_8a2e_0370_7344,
    0xa409_3822_299f_31d0,
    0x082e_fa98_ec4e_6c89,
];

/// A content hash over raw shader bytecode.
///
/// Two shaders with the same fingerprint were built from the same bytes, which lets shader
/// caches deduplicate them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Compute the fingerprint of some bytecode.
    pub fn of(bytecode: &[u8]) -> Self {
        let [k0, k1, k2, k3] = SEEDS;
        Self(RandomState::with_seeds(k0, k1, k2, k3).hash_one(bytecode))
    }

    /// Get the raw hash value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::Fingerprint;

    #[test]
    fn same_bytes_same_fingerprint() {
        assert_eq!(
            Fingerprint::of(b"void main(){}"),
            Fingerprint::of(b"void main(){}")
        );
    }

    #[test]
    fn different_bytes_different_fingerprint() {
        assert_ne!(
            Fingerprint::of(b"void main(){}"),
            Fingerprint::of(b"void main() {}")
        );
    }

    #[test]
    fn display_is_fixed_width_hex() {
        let text = Fingerprint::of(b"").to_string();
        assert_eq!(text.len(), 16);
        assert!(text.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
