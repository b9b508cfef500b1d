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

//! A fake backend that records every call.

#![allow(dead_code)]

use gpu_shader::{BackendErrorCode, ShaderBackend, ShaderStage};

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FakeShader(pub u32);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct FakeProgram(pub u32);

#[derive(Debug)]
pub struct FakeError;

impl fmt::Display for FakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("out of shader objects")
    }
}

impl std::error::Error for FakeError {}

/// The shader objects and programs the fake context knows about.
#[derive(Debug, Default)]
pub struct State {
    next_id: u32,

    /// Live shader objects, with the source attached to them.
    pub live: BTreeMap<FakeShader, String>,

    /// Every call made, in order.
    pub calls: Vec<&'static str>,

    /// Make the compiler reject everything.
    pub reject: bool,

    /// The log the compiler produces on rejection.
    pub info_log: String,

    /// Refuse to create shader objects.
    pub out_of_objects: bool,

    /// Raise this error flag right after the named call.
    pub fault_after: Option<(&'static str, BackendErrorCode)>,

    /// Raise this error flag right after the n-th (1-based) call with this name.
    pub fault_after_nth: Option<(&'static str, usize, BackendErrorCode)>,

    pending_error: Option<BackendErrorCode>,

    /// Attribute locations per program.
    pub attributes: HashMap<(FakeProgram, String), u32>,

    /// Uniform locations per program.
    pub uniforms: HashMap<(FakeProgram, String), i32>,

    /// `(location, value)` for every uniform write.
    pub uniform_writes: Vec<(i32, i32)>,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    pub state: RefCell<State>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| **c == call)
            .count()
    }

    pub fn live(&self) -> Vec<FakeShader> {
        self.state.borrow().live.keys().copied().collect()
    }

    /// Forget every object, as if the context was recreated.
    pub fn reset_context(&self) {
        self.state.borrow_mut().live.clear();
    }

    fn record(&self, call: &'static str) {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);

        if let Some((after, code)) = state.fault_after {
            if after == call {
                state.pending_error = Some(code);
            }
        }

        if let Some((after, nth, code)) = state.fault_after_nth {
            if after == call && state.calls.iter().filter(|c| **c == call).count() == nth {
                state.pending_error = Some(code);
            }
        }
    }
}

impl ShaderBackend for FakeBackend {
    type Shader = FakeShader;
    type Program = FakeProgram;
    type UniformLocation = i32;
    type Error = FakeError;

    fn create_shader(&self, _stage: ShaderStage) -> Result<FakeShader, FakeError> {
        self.record("create_shader");

        let mut state = self.state.borrow_mut();
        if state.out_of_objects {
            return Err(FakeError);
        }

        state.next_id += 1;
        let shader = FakeShader(state.next_id);
        state.live.insert(shader, String::new());
        Ok(shader)
    }

    fn shader_source(&self, shader: FakeShader, source: &str) {
        self.record("shader_source");
        if let Some(slot) = self.state.borrow_mut().live.get_mut(&shader) {
            *slot = source.to_owned();
        }
    }

    fn compile_shader(&self, _shader: FakeShader) {
        self.record("compile_shader");
    }

    fn shader_compile_status(&self, _shader: FakeShader) -> bool {
        self.record("shader_compile_status");
        !self.state.borrow().reject
    }

    fn shader_info_log(&self, _shader: FakeShader, _max_len: usize) -> String {
        self.record("shader_info_log");
        self.state.borrow().info_log.clone()
    }

    fn is_shader(&self, shader: FakeShader) -> bool {
        self.record("is_shader");
        self.state.borrow().live.contains_key(&shader)
    }

    fn delete_shader(&self, shader: FakeShader) {
        self.record("delete_shader");
        self.state.borrow_mut().live.remove(&shader);
    }

    fn attrib_location(&self, program: FakeProgram, name: &str) -> Option<u32> {
        self.record("attrib_location");
        self.state
            .borrow()
            .attributes
            .get(&(program, name.to_owned()))
            .copied()
    }

    fn uniform_location(&self, program: FakeProgram, name: &str) -> Option<i32> {
        self.record("uniform_location");
        self.state
            .borrow()
            .uniforms
            .get(&(program, name.to_owned()))
            .copied()
    }

    fn uniform_1_i32(&self, location: &i32, value: i32) {
        self.record("uniform_1_i32");
        self.state.borrow_mut().uniform_writes.push((*location, value));
    }

    fn last_error(&self) -> Option<BackendErrorCode> {
        self.state.borrow_mut().pending_error.take()
    }
}

/// Serialize a complete shader resource.
pub fn resource(bytecode: &[u8], attributes: &[(&str, u8, u8, i16)]) -> Vec<u8> {
    let mut data = (bytecode.len() as u32).to_le_bytes().to_vec();
    data.extend_from_slice(bytecode);
    data.extend_from_slice(&attribute_section(attributes));
    data
}

/// Serialize just the attribute section.
pub fn attribute_section(attributes: &[(&str, u8, u8, i16)]) -> Vec<u8> {
    let mut data = vec![attributes.len() as u8];

    for &(name, usage, index, format) in attributes {
        data.push(name.len() as u8);
        data.extend_from_slice(name.as_bytes());
        data.push(usage);
        data.push(index);
        data.extend_from_slice(&format.to_le_bytes());
    }

    data
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
