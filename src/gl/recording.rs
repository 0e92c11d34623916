//! Test double that records every call and fakes compilation.
//!
//! A uniform exists in a linked program iff one of its attached shaders
//! declares it with a `uniform <type> <name>;` line.

use super::{GlApi, ShaderStage, NO_ERROR};
use crate::format::TextureTarget;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CompileShader(ShaderStage),
    LinkProgram(u32),
    DeleteProgram(u32),
    UniformLocation(String),
    ActiveTexture(u32),
    BindTexture(TextureTarget, u32),
    Uniform1i(String, i32),
    Uniform1f(String, f32),
    Uniform2f(String, f32, f32),
    Uniform3f(String, f32, f32, f32),
    Uniform4f(String, [f32; 4]),
    UniformMatrix(String, Vec<f32>),
}

impl Call {
    /// Name of the uniform written by this call, if any.
    pub fn uniform(&self) -> Option<&str> {
        match self {
            Call::Uniform1i(n, _)
            | Call::Uniform1f(n, _)
            | Call::Uniform2f(n, _, _)
            | Call::Uniform3f(n, _, _, _)
            | Call::Uniform4f(n, _)
            | Call::UniformMatrix(n, _) => Some(n),
            _ => None,
        }
    }
}

#[derive(Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, (ShaderStage, String)>,
    programs: HashMap<u32, Vec<u32>>,
    linked: HashMap<u32, HashMap<String, i32>>,
    location_names: HashMap<i32, String>,
    calls: Vec<Call>,
    fail_compile: Option<ShaderStage>,
    fail_link: bool,
    optimized_out: HashSet<String>,
    errors: Vec<u32>,
    upload_errors: Vec<u32>,
}

impl State {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct RecordingGl {
    state: RefCell<State>,
}

impl RecordingGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    pub fn link_count(&self) -> usize {
        self.count(|c| matches!(c, Call::LinkProgram(_)))
    }

    pub fn lookup_count(&self) -> usize {
        self.count(|c| matches!(c, Call::UniformLocation(_)))
    }

    /// Uniform writes targeting `name`, in call order.
    pub fn uploads_to(&self, name: &str) -> Vec<Call> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.uniform() == Some(name))
            .cloned()
            .collect()
    }

    /// Names of all uniforms written, in call order.
    pub fn uploaded_names(&self) -> Vec<String> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| c.uniform().map(str::to_string))
            .collect()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn fail_next_compile(&self, stage: ShaderStage) {
        self.state.borrow_mut().fail_compile = Some(stage);
    }

    pub fn fail_next_link(&self) {
        self.state.borrow_mut().fail_link = true;
    }

    /// Makes the driver report `name` as inactive in later links.
    pub fn optimize_out(&self, name: &str) {
        self.state.borrow_mut().optimized_out.insert(name.to_string());
    }

    /// Sets an error flag now, as if a call made before the converter ran failed.
    pub fn raise_error(&self, code: u32) {
        self.state.borrow_mut().errors.push(code);
    }

    /// Sets `codes` when the next uniform write happens.
    pub fn raise_on_next_upload(&self, codes: &[u32]) {
        self.state.borrow_mut().upload_errors.extend_from_slice(codes);
    }

    fn record(&self, call: Call) {
        let mut state = self.state.borrow_mut();
        if call.uniform().is_some() {
            let pending = std::mem::take(&mut state.upload_errors);
            state.errors.extend(pending);
        }
        state.calls.push(call);
    }

    fn name_of(&self, location: &i32) -> String {
        self.state
            .borrow()
            .location_names
            .get(location)
            .cloned()
            .unwrap_or_else(|| format!("<unknown {location}>"))
    }
}

fn declared_uniforms(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let rest = line.strip_prefix("uniform ")?;
            let decl = rest.strip_suffix(';')?;
            let name = decl.split_whitespace().last()?;
            Some(name.split('[').next().unwrap_or(name).to_string())
        })
        .collect()
}

impl GlApi for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Texture = u32;
    type UniformLocation = i32;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.next();
        state.shaders.insert(id, (stage, String::new()));
        Ok(id)
    }

    fn shader_source(&self, shader: u32, source: &str) {
        if let Some(entry) = self.state.borrow_mut().shaders.get_mut(&shader) {
            entry.1 = source.to_string();
        }
    }

    fn compile_shader(&self, shader: u32) {
        let stage = self.state.borrow().shaders.get(&shader).map(|s| s.0);
        if let Some(stage) = stage {
            self.record(Call::CompileShader(stage));
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        let mut state = self.state.borrow_mut();
        let stage = state.shaders.get(&shader).map(|s| s.0);
        if stage.is_some() && state.fail_compile == stage {
            state.fail_compile = None;
            return false;
        }
        true
    }

    fn shader_info_log(&self, _shader: u32) -> String {
        "0:1(1): error: syntax error".to_string()
    }

    fn delete_shader(&self, shader: u32) {
        self.state.borrow_mut().shaders.remove(&shader);
    }

    fn create_program(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        let id = state.next();
        state.programs.insert(id, Vec::new());
        Ok(id)
    }

    fn attach_shader(&self, program: u32, shader: u32) {
        if let Some(attached) = self.state.borrow_mut().programs.get_mut(&program) {
            attached.push(shader);
        }
    }

    fn detach_shader(&self, program: u32, shader: u32) {
        if let Some(attached) = self.state.borrow_mut().programs.get_mut(&program) {
            attached.retain(|s| *s != shader);
        }
    }

    fn link_program(&self, program: u32) {
        self.record(Call::LinkProgram(program));
        let mut state = self.state.borrow_mut();
        if std::mem::take(&mut state.fail_link) {
            return;
        }
        let attached = state.programs.get(&program).cloned().unwrap_or_default();
        let names: Vec<String> = attached
            .iter()
            .filter_map(|s| state.shaders.get(s))
            .flat_map(|(_, src)| declared_uniforms(src))
            .filter(|n| !state.optimized_out.contains(n))
            .collect();
        let mut table = HashMap::new();
        for name in names {
            if table.contains_key(&name) {
                continue;
            }
            let location = state.next() as i32;
            state.location_names.insert(location, name.clone());
            table.insert(name, location);
        }
        state.linked.insert(program, table);
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.state.borrow().linked.contains_key(&program)
    }

    fn program_info_log(&self, _program: u32) -> String {
        "error: unresolved symbols".to_string()
    }

    fn delete_program(&self, program: u32) {
        self.record(Call::DeleteProgram(program));
        let mut state = self.state.borrow_mut();
        state.programs.remove(&program);
        state.linked.remove(&program);
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<i32> {
        self.record(Call::UniformLocation(name.to_string()));
        self.state.borrow().linked.get(&program)?.get(name).copied()
    }

    fn active_texture(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: TextureTarget, texture: u32) {
        self.record(Call::BindTexture(target, texture));
    }

    fn uniform_1_i32(&self, location: &i32, x: i32) {
        let name = self.name_of(location);
        self.record(Call::Uniform1i(name, x));
    }

    fn uniform_1_f32(&self, location: &i32, x: f32) {
        let name = self.name_of(location);
        self.record(Call::Uniform1f(name, x));
    }

    fn uniform_2_f32(&self, location: &i32, x: f32, y: f32) {
        let name = self.name_of(location);
        self.record(Call::Uniform2f(name, x, y));
    }

    fn uniform_3_f32(&self, location: &i32, x: f32, y: f32, z: f32) {
        let name = self.name_of(location);
        self.record(Call::Uniform3f(name, x, y, z));
    }

    fn uniform_4_f32(&self, location: &i32, x: f32, y: f32, z: f32, w: f32) {
        let name = self.name_of(location);
        self.record(Call::Uniform4f(name, [x, y, z, w]));
    }

    fn uniform_matrix_2_f32(&self, location: &i32, v: &[f32]) {
        let name = self.name_of(location);
        self.record(Call::UniformMatrix(name, v.to_vec()));
    }

    fn uniform_matrix_3_f32(&self, location: &i32, v: &[f32]) {
        let name = self.name_of(location);
        self.record(Call::UniformMatrix(name, v.to_vec()));
    }

    fn uniform_matrix_4_f32(&self, location: &i32, v: &[f32]) {
        let name = self.name_of(location);
        self.record(Call::UniformMatrix(name, v.to_vec()));
    }

    fn error(&self) -> u32 {
        let mut state = self.state.borrow_mut();
        if state.errors.is_empty() {
            NO_ERROR
        } else {
            state.errors.remove(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_uniforms() {
        let src = "uniform sampler2D Texture0;\n  uniform vec4 Coeffs[4];\n\
                   varying vec2 TexCoord;\nuniform highp vec2 TexSize0;\n";
        assert_eq!(declared_uniforms(src), vec!["Texture0", "Coeffs", "TexSize0"]);
    }
}
