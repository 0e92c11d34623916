//! Optional color-management shading supplied by an external library.
//!
//! The extension is opaque to converters: some GLSL text, the name of a
//! `vec4 f(vec4)` function to call on the converted color, and an ordered
//! list of uniforms whose current values are queried every frame.

use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Int,
    Mat2,
    Mat3,
    Mat4,
}

impl VariableKind {
    pub fn glsl_type(&self) -> &'static str {
        match self {
            VariableKind::Float => "float",
            VariableKind::Vec2 => "vec2",
            VariableKind::Vec3 => "vec3",
            VariableKind::Vec4 => "vec4",
            VariableKind::Int => "int",
            VariableKind::Mat2 => "mat2",
            VariableKind::Mat3 => "mat3",
            VariableKind::Mat4 => "mat4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Int(i32),
    Mat2([f32; 4]),
    Mat3([f32; 9]),
    Mat4([f32; 16]),
}

impl UniformValue {
    pub fn kind(&self) -> VariableKind {
        match self {
            UniformValue::Float(_) => VariableKind::Float,
            UniformValue::Vec2(_) => VariableKind::Vec2,
            UniformValue::Vec3(_) => VariableKind::Vec3,
            UniformValue::Vec4(_) => VariableKind::Vec4,
            UniformValue::Int(_) => VariableKind::Int,
            UniformValue::Mat2(_) => VariableKind::Mat2,
            UniformValue::Mat3(_) => VariableKind::Mat3,
            UniformValue::Mat4(_) => VariableKind::Mat4,
        }
    }
}

/// A uniform the extension's GLSL reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderVariable {
    pub name: String,
    pub kind: VariableKind,
}

impl ShaderVariable {
    pub fn new(name: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Contract of an external color-management shading library.
///
/// The defaults describe an absent extension.
pub trait ColorManagement {
    /// Function definitions spliced before `main`. Must not declare the
    /// uniforms listed in [`variables`](Self::variables).
    fn glsl(&self) -> &str {
        ""
    }

    /// Name of a `vec4 f(vec4)` applied to the RGB result.
    fn entry_point(&self) -> Option<&str> {
        None
    }

    fn variables(&self) -> &[ShaderVariable] {
        &[]
    }

    /// Current value of `variables()[index]`.
    fn value(&self, _index: usize) -> Option<UniformValue> {
        None
    }

    fn is_enabled(&self) -> bool {
        self.entry_point().is_some() || !self.variables().is_empty()
    }
}

/// Null extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoColorManagement;

impl ColorManagement for NoColorManagement {}

/// Extension with fixed GLSL and values updated by the owner between frames.
#[derive(Debug, Default)]
pub struct StaticColorManagement {
    glsl: String,
    entry_point: Option<String>,
    variables: Vec<ShaderVariable>,
    values: RefCell<Vec<UniformValue>>,
}

impl StaticColorManagement {
    pub fn new(glsl: impl Into<String>, entry_point: impl Into<String>) -> Self {
        Self {
            glsl: glsl.into(),
            entry_point: Some(entry_point.into()),
            ..Default::default()
        }
    }

    /// Declares a variable with its initial value; the kind follows the value.
    pub fn with_variable(mut self, name: impl Into<String>, value: UniformValue) -> Self {
        self.variables.push(ShaderVariable::new(name, value.kind()));
        self.values.get_mut().push(value);
        self
    }

    /// Replaces the value of `name`. Returns false for unknown names or a kind mismatch.
    pub fn set_value(&self, name: &str, value: UniformValue) -> bool {
        let Some(index) = self.variables.iter().position(|v| v.name == name) else {
            return false;
        };
        if self.variables[index].kind != value.kind() {
            return false;
        }
        self.values.borrow_mut()[index] = value;
        true
    }
}

impl ColorManagement for StaticColorManagement {
    fn glsl(&self) -> &str {
        &self.glsl
    }

    fn entry_point(&self) -> Option<&str> {
        self.entry_point.as_deref()
    }

    fn variables(&self) -> &[ShaderVariable] {
        &self.variables
    }

    fn value(&self, index: usize) -> Option<UniformValue> {
        self.values.borrow().get(index).copied()
    }
}
