//! Recording uniform sink
//!
//! Captures every uniform write in program order instead of touching a GPU
//! context. Used by the test suites and handy for tracing a frame.

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

use super::UniformSink;

/// A single uniform value as written through [`UniformSink`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Mat4(Matrix4<f32>),
    Vec2(Vector2<f32>),
    Vec3(Vector3<f32>),
    Vec4(Vector4<f32>),
    Float(f32),
    Bool(bool),
    Int(i32),
    Sampler(u32),
}

/// Uniform sink that keeps an ordered log of writes
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    writes: Vec<(String, UniformValue)>,
    commits: Vec<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes, oldest first
    pub fn writes(&self) -> &[(String, UniformValue)] {
        &self.writes
    }

    /// Names of all writes, oldest first
    pub fn names(&self) -> Vec<&str> {
        self.writes.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Most recent value written to `name`
    pub fn last(&self, name: &str) -> Option<&UniformValue> {
        self.writes
            .iter()
            .rev()
            .find(|(written, _)| written == name)
            .map(|(_, value)| value)
    }

    /// Number of writes to `name`
    pub fn count(&self, name: &str) -> usize {
        self.writes.iter().filter(|(written, _)| written == name).count()
    }

    /// Distinct names starting with `prefix`, in first-written order
    pub fn distinct_with_prefix(&self, prefix: &str) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (name, _) in &self.writes {
            if name.starts_with(prefix) && !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// Number of commits, one per issued draw
    pub fn commits(&self) -> usize {
        self.commits.len()
    }

    /// Writes that preceded each commit
    pub fn writes_at_commits(&self) -> &[usize] {
        &self.commits
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    pub fn clear(&mut self) {
        self.writes.clear();
        self.commits.clear();
    }

    fn push(&mut self, name: &str, value: UniformValue) {
        self.writes.push((name.to_string(), value));
    }
}

impl UniformSink for RecordingSink {
    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.push(name, UniformValue::Mat4(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.push(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.push(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.push(name, UniformValue::Vec4(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.push(name, UniformValue::Float(value));
    }

    fn set_bool(&mut self, name: &str, value: bool) {
        self.push(name, UniformValue::Bool(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.push(name, UniformValue::Int(value));
    }

    fn set_sampler(&mut self, name: &str, unit: u32) {
        self.push(name, UniformValue::Sampler(unit));
    }

    fn commit(&mut self) {
        self.commits.push(self.writes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut sink = RecordingSink::new();
        sink.set_bool("bUseTexture", true);
        sink.set_sampler("objectTexture", 3);
        sink.set_vec2("UVscale", Vector2::new(0.5, 0.5));
        sink.set_bool("bUseTexture", false);

        assert_eq!(sink.names(), vec!["bUseTexture", "objectTexture", "UVscale", "bUseTexture"]);
        assert_eq!(sink.last("bUseTexture"), Some(&UniformValue::Bool(false)));
        assert_eq!(sink.last("objectTexture"), Some(&UniformValue::Sampler(3)));
        assert_eq!(sink.count("bUseTexture"), 2);
        assert_eq!(sink.last("model"), None);
    }

    #[test]
    fn test_distinct_with_prefix() {
        let mut sink = RecordingSink::new();
        sink.set_float("spotLight.cutOff", 0.9);
        sink.set_float("spotLight.outerCutOff", 0.8);
        sink.set_float("spotLight.cutOff", 0.95);
        sink.set_float("material.shininess", 1.0);

        assert_eq!(
            sink.distinct_with_prefix("spotLight."),
            vec!["spotLight.cutOff", "spotLight.outerCutOff"]
        );
    }

    #[test]
    fn test_works_through_mut_reference() {
        fn write_color(mut sink: impl UniformSink) {
            sink.set_vec4("objectColor", Vector4::new(1.0, 0.0, 0.0, 1.0));
        }

        let mut sink = RecordingSink::new();
        write_color(&mut sink);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_commit_marks_write_position() {
        let mut sink = RecordingSink::new();
        sink.set_bool("bUseTexture", true);
        (&mut sink).commit();
        sink.set_bool("bUseTexture", false);
        sink.set_vec2("UVscale", Vector2::new(1.0, 1.0));
        sink.commit();

        assert_eq!(sink.commits(), 2);
        assert_eq!(sink.writes_at_commits(), &[1, 3]);
        sink.clear();
        assert_eq!(sink.commits(), 0);
    }
}
