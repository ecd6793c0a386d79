//! Splits a single annotated shader file into its stages.
//!
//! A line starting with `#shader vertex` or `#shader fragment` switches the
//! current stage; every following line belongs to that stage until the next
//! marker. Lines before the first marker are ignored.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Unknown shader stage `{0}` on line {1}")]
    UnknownStage(String, usize),
    #[error("Missing {0} stage")]
    MissingStage(&'static str),
    #[error("Cannot read shader file: {0}")]
    Io(#[from] std::io::Error),
}

enum Stage {
    Vertex,
    Fragment,
}

impl ShaderSource {
    pub fn parse(text: &str) -> Result<Self, SourceError> {
        let mut source = ShaderSource::default();
        let mut stage = None;

        for (i, line) in text.lines().enumerate() {
            if let Some(kind) = line.trim_start().strip_prefix("#shader") {
                stage = match kind.trim() {
                    "vertex" => Some(Stage::Vertex),
                    "fragment" => Some(Stage::Fragment),
                    other => return Err(SourceError::UnknownStage(other.to_owned(), i + 1)),
                };
                continue;
            }

            let target = match stage {
                Some(Stage::Vertex) => &mut source.vertex,
                Some(Stage::Fragment) => &mut source.fragment,
                None => continue,
            };

            target.push_str(line);
            target.push('\n');
        }

        if source.vertex.trim().is_empty() {
            return Err(SourceError::MissingStage("vertex"));
        }

        if source.fragment.trim().is_empty() {
            return Err(SourceError::MissingStage("fragment"));
        }

        Ok(source)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let text = std::fs::read_to_string(path)?;

        Self::parse(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC: &str = "\
#shader vertex
#version 330 core
void main() {}
#shader fragment
#version 330 core
out vec4 color;
void main() { color = vec4(1.0); }
";

    #[test]
    fn splits_stages() {
        let src = ShaderSource::parse(BASIC).unwrap();

        assert_eq!(src.vertex, "#version 330 core\nvoid main() {}\n");
        assert!(src.fragment.starts_with("#version 330 core\nout vec4 color;\n"));
        assert!(!src.fragment.contains("#shader"));
    }

    #[test]
    fn repeated_marker_appends() {
        let text = "#shader vertex\na\n#shader fragment\nb\n#shader vertex\nc\n";
        let src = ShaderSource::parse(text).unwrap();

        assert_eq!(src.vertex, "a\nc\n");
        assert_eq!(src.fragment, "b\n");
    }

    #[test]
    fn preamble_is_ignored() {
        let text = format!("// shared header\n\n{BASIC}");

        assert_eq!(ShaderSource::parse(&text).unwrap(), ShaderSource::parse(BASIC).unwrap());
    }

    #[test]
    fn parsing_is_reentrant() {
        let first = ShaderSource::parse(BASIC).unwrap();
        let second = ShaderSource::parse(BASIC).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn unknown_stage() {
        let err = ShaderSource::parse("#shader geometry\nvoid main() {}\n").unwrap_err();

        assert!(matches!(err, SourceError::UnknownStage(ref s, 1) if s == "geometry"));
    }

    #[test]
    fn missing_fragment() {
        let err = ShaderSource::parse("#shader vertex\nvoid main() {}\n").unwrap_err();

        assert!(matches!(err, SourceError::MissingStage("fragment")));
    }
}
