// shaders.rs - shader file splitting and program management

use gl::types::*;
use std::collections::HashMap;
use std::ffi::{CString, NulError};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::ptr;
use thiserror::Error;

/// Substring that marks a section boundary in a combined shader file.
pub const MARKER: &str = "#shader";

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Cannot read shader file {path:?}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to compile {stage} shader: {log}")]
    Compilation { stage: &'static str, log: String },
    #[error("Program linking failed: {0}")]
    Linking(String),
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
}

/// Which output buffer currently receives lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderSection {
    #[default]
    None,
    Vertex,
    Fragment,
}

impl ShaderSection {
    /// Mode selected by a marker line. `fragment` is checked after `vertex`,
    /// so a line naming both ends up in `Fragment`. A marker naming neither
    /// leaves the mode untouched.
    pub fn from_marker(line: &str, current: ShaderSection) -> ShaderSection {
        let mut section = current;
        if line.contains("vertex") {
            section = ShaderSection::Vertex;
        }
        if line.contains("fragment") {
            section = ShaderSection::Fragment;
        }
        section
    }
}

/// Vertex and fragment sources split out of a single `.shader` file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    pub vertex_source: String,
    pub fragment_source: String,
    /// Lines dropped because they came before the first marker.
    pub unmarked_lines: usize,
}

impl ShaderProgramSource {
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ShaderError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Self::parse(BufReader::new(file)).map_err(|e| match e {
            ShaderError::Io(source) => ShaderError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        if source.unmarked_lines > 0 {
            log::warn!(
                "{:?}: {} line(s) before the first {} marker were ignored",
                path,
                source.unmarked_lines,
                MARKER
            );
        }
        Ok(source)
    }

    pub fn parse<R: BufRead>(reader: R) -> Result<Self, ShaderError> {
        let mut splitter = Splitter::default();
        for line in reader.lines() {
            splitter.push(&line?);
        }
        Ok(splitter.finish())
    }

    pub fn parse_str(text: &str) -> Self {
        let mut splitter = Splitter::default();
        text.lines().for_each(|line| splitter.push(line));
        splitter.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_source.is_empty() && self.fragment_source.is_empty()
    }
}

impl fmt::Display for ShaderProgramSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{MARKER} vertex\n{}{MARKER} fragment\n{}",
            self.vertex_source, self.fragment_source
        )
    }
}

/// Line-by-line section state. Trailing carriage returns are trimmed from
/// every line, so buffers never hold a `\r` right before a newline.
#[derive(Default)]
struct Splitter {
    section: ShaderSection,
    out: ShaderProgramSource,
}

impl Splitter {
    fn push(&mut self, line: &str) {
        let line = line.trim_end_matches('\r');

        if line.contains(MARKER) {
            if !line.contains("vertex") && !line.contains("fragment") {
                log::debug!("Marker without a known stage: {:?}", line);
            }
            self.section = ShaderSection::from_marker(line, self.section);
            return;
        }

        let buffer = match self.section {
            ShaderSection::Vertex => &mut self.out.vertex_source,
            ShaderSection::Fragment => &mut self.out.fragment_source,
            ShaderSection::None => {
                self.out.unmarked_lines += 1;
                return;
            }
        };
        buffer.push_str(line);
        buffer.push('\n');
    }

    fn finish(self) -> ShaderProgramSource {
        self.out
    }
}

/// Linked GL program built from a [`ShaderProgramSource`].
pub struct ShaderProgram {
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl ShaderProgram {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ShaderError> {
        let source = ShaderProgramSource::parse_file(path.as_ref())?;
        log::info!(
            "Loaded {:?} (vertex: {} bytes, fragment: {} bytes)",
            path.as_ref(),
            source.vertex_source.len(),
            source.fragment_source.len()
        );
        Self::from_source(&source)
    }

    pub fn from_source(source: &ShaderProgramSource) -> Result<Self, ShaderError> {
        let vertex_shader = Self::compile_shader(&source.vertex_source, gl::VERTEX_SHADER)?;
        let fragment_shader = match Self::compile_shader(&source.fragment_source, gl::FRAGMENT_SHADER) {
            Ok(shader) => shader,
            Err(e) => {
                unsafe { gl::DeleteShader(vertex_shader) };
                return Err(e);
            }
        };

        let program = unsafe { gl::CreateProgram() };
        unsafe {
            gl::AttachShader(program, vertex_shader);
            gl::AttachShader(program, fragment_shader);
        }
        let linked = Self::link_program(program);
        unsafe {
            gl::DeleteShader(vertex_shader);
            gl::DeleteShader(fragment_shader);
        }

        if let Err(e) = linked {
            unsafe { gl::DeleteProgram(program) };
            return Err(e);
        }

        Ok(ShaderProgram {
            id: program,
            uniforms: HashMap::new(),
        })
    }

    fn compile_shader(source: &str, shader_type: GLenum) -> Result<GLuint, ShaderError> {
        let source = CString::new(source.as_bytes())?;
        let shader = unsafe { gl::CreateShader(shader_type) };

        let mut success = 1;
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
            gl::CompileShader(shader);
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }

        if success == 0 {
            let mut len = 0;
            unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };
            let log = info_log(len, |len, buf| unsafe {
                gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf)
            });
            unsafe { gl::DeleteShader(shader) };

            let stage = if shader_type == gl::VERTEX_SHADER {
                "vertex"
            } else {
                "fragment"
            };
            return Err(ShaderError::Compilation { stage, log });
        }

        Ok(shader)
    }

    fn link_program(program: GLuint) -> Result<(), ShaderError> {
        let mut success = 1;
        unsafe {
            gl::LinkProgram(program);
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        if success == 0 {
            return Err(ShaderError::Linking(Self::program_log(program)));
        }

        unsafe {
            gl::ValidateProgram(program);
            gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut success);
        }
        if success == 0 {
            log::warn!("Program validation failed: {}", Self::program_log(program));
        }

        Ok(())
    }

    fn program_log(program: GLuint) -> String {
        let mut len = 0;
        unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
        info_log(len, |len, buf| unsafe {
            gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf)
        })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    pub fn get_uniform_location(&mut self, name: &str) -> GLint {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        let location = match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) },
            Err(_) => -1,
        };

        if location == -1 {
            log::warn!("Uniform '{}' not found in shader", name);
        }

        self.uniforms.insert(name.to_string(), location);
        location
    }

    pub fn set_uniform_vec4(&mut self, name: &str, value: &[f32; 4]) {
        let location = self.get_uniform_location(name);
        unsafe {
            gl::Uniform4fv(location, 1, value.as_ptr());
        }
    }

    pub fn set_uniform_mat4(&mut self, name: &str, mat: &[f32; 16]) {
        let location = self.get_uniform_location(name);
        unsafe {
            gl::UniformMatrix4fv(location, 1, gl::FALSE, mat.as_ptr());
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe { gl::DeleteProgram(self.id) };
    }
}

/// Reads a GL info log of `len` bytes (including the terminating NUL).
fn info_log(len: GLint, read: impl FnOnce(GLsizei, *mut GLchar)) -> String {
    let len = len.max(1) as usize;
    let mut buffer = vec![0u8; len];
    read(len as GLsizei, buffer.as_mut_ptr() as *mut GLchar);
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(len);
    String::from_utf8_lossy(&buffer[..end]).trim_end().to_string()
}
