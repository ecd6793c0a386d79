use std::collections::HashMap;

use cgmath::{Matrix4, Vector3, Vector4};

/// Location reported by the device for names the program does not use.
pub const UNKNOWN_LOCATION: i32 = -1;

/// Name to location map of a single program.
///
/// Locations never change after linking, so every answer is kept, including
/// `-1` for unknown names. Failed queries are not answers and are not kept.
#[derive(Debug, Default)]
pub struct UniformCache {
    locations: HashMap<String, i32>,
}

impl UniformCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached location of `name`, asking `query` on a miss.
    pub fn resolve<E>(
        &mut self,
        name: &str,
        query: impl FnOnce(&str) -> Result<i32, E>,
    ) -> Result<i32, E> {
        if let Some(location) = self.locations.get(name) {
            return Ok(*location);
        }

        let location = query(name)?;
        if location == UNKNOWN_LOCATION {
            log::warn!("Uniform `{name}` not found in program");
        }

        self.locations.insert(name.to_owned(), location);
        Ok(location)
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.locations.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Host value that can be written to a uniform of the active program.
pub trait UniformValue {
    /// Textual form of the device call, for error reports.
    const CALL: &'static str;

    /// # Safety
    ///
    /// A context must be current and `location` must belong to the active
    /// program.
    unsafe fn write(&self, location: i32);
}

impl UniformValue for bool {
    const CALL: &'static str = "glUniform1i(location, value)";

    unsafe fn write(&self, location: i32) {
        gl::Uniform1i(location, *self as i32);
    }
}

impl UniformValue for i32 {
    const CALL: &'static str = "glUniform1i(location, value)";

    unsafe fn write(&self, location: i32) {
        gl::Uniform1i(location, *self);
    }
}

impl UniformValue for f32 {
    const CALL: &'static str = "glUniform1f(location, value)";

    unsafe fn write(&self, location: i32) {
        gl::Uniform1f(location, *self);
    }
}

impl UniformValue for [f32; 4] {
    const CALL: &'static str = "glUniform4f(location, v0, v1, v2, v3)";

    unsafe fn write(&self, location: i32) {
        gl::Uniform4f(location, self[0], self[1], self[2], self[3]);
    }
}

impl UniformValue for Vector3<f32> {
    const CALL: &'static str = "glUniform3f(location, x, y, z)";

    unsafe fn write(&self, location: i32) {
        gl::Uniform3f(location, self.x, self.y, self.z);
    }
}

impl UniformValue for Vector4<f32> {
    const CALL: &'static str = "glUniform4f(location, x, y, z, w)";

    unsafe fn write(&self, location: i32) {
        gl::Uniform4f(location, self.x, self.y, self.z, self.w);
    }
}

impl UniformValue for Matrix4<f32> {
    const CALL: &'static str = "glUniformMatrix4fv(location, 1, GL_FALSE, value)";

    unsafe fn write(&self, location: i32) {
        let columns: &[f32; 16] = self.as_ref();
        gl::UniformMatrix4fv(location, 1, gl::FALSE, columns.as_ptr());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_queries_once() {
        let mut cache = UniformCache::new();
        let mut queries = 0;

        for _ in 0..3 {
            let location = cache.resolve("u_Color", |_| {
                queries += 1;
                Ok::<_, ()>(4)
            });
            assert_eq!(location, Ok(4));
        }

        assert_eq!(queries, 1);
        assert_eq!(cache.get("u_Color"), Some(4));
    }

    #[test]
    fn unknown_name_is_cached() {
        let mut cache = UniformCache::new();

        assert_eq!(
            cache.resolve("u_Missing", |_| Ok::<_, ()>(UNKNOWN_LOCATION)),
            Ok(-1)
        );
        assert_eq!(
            cache.resolve("u_Missing", |_| -> Result<i32, ()> { panic!("queried twice") }),
            Ok(UNKNOWN_LOCATION)
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_query_is_not_cached() {
        let mut cache = UniformCache::new();

        assert_eq!(cache.resolve("u_Model", |_| Err("device lost")), Err("device lost"));
        assert_eq!(cache.get("u_Model"), None);
        assert!(cache.is_empty());

        // The next lookup asks the device again.
        assert_eq!(cache.resolve("u_Model", |_| Ok::<_, &str>(2)), Ok(2));
        assert_eq!(cache.get("u_Model"), Some(2));
    }

    #[test]
    fn names_are_independent() {
        let mut cache = UniformCache::new();

        cache.resolve("u_Model", |_| Ok::<_, ()>(0)).unwrap();
        cache.resolve("u_View", |_| Ok::<_, ()>(1)).unwrap();

        assert_eq!(cache.get("u_Model"), Some(0));
        assert_eq!(cache.get("u_View"), Some(1));
        assert_eq!(cache.get("u_Projection"), None);
    }
}
