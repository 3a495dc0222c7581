//! Sources of logical input files

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::PathBuf;

use super::ExtractError;

/// One logical input file: a display name and its byte stream
pub struct InputFile<R: BufRead> {
    pub name: String,
    pub reader: R,
}

/// Supplies input files one at a time, in order
pub trait FileInput {
    type Reader: BufRead;

    /// Open the next file, or `None` when all files have been supplied
    fn next_file(&mut self) -> Result<Option<InputFile<Self::Reader>>, ExtractError>;
}

/// Files on disk, opened lazily
#[derive(Debug, Clone, Default)]
pub struct PathInput {
    paths: VecDeque<PathBuf>,
}

impl PathInput {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Files not yet opened
    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl FileInput for PathInput {
    type Reader = BufReader<File>;

    fn next_file(&mut self) -> Result<Option<InputFile<Self::Reader>>, ExtractError> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        let file = File::open(&path).map_err(|e| {
            ExtractError::Io(format!("Failed to open {}: {}", path.display(), e))
        })?;
        Ok(Some(InputFile {
            name: path.display().to_string(),
            reader: BufReader::new(file),
        }))
    }
}

/// Named in-memory documents
#[derive(Debug, Clone, Default)]
pub struct MemoryInput {
    files: VecDeque<(String, Vec<u8>)>,
}

impl MemoryInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.files.push_back((name.into(), content.into()));
        self
    }
}

impl FileInput for MemoryInput {
    type Reader = Cursor<Vec<u8>>;

    fn next_file(&mut self) -> Result<Option<InputFile<Self::Reader>>, ExtractError> {
        Ok(self.files.pop_front().map(|(name, content)| InputFile {
            name,
            reader: Cursor::new(content),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_memory_input_yields_in_order() {
        let mut input = MemoryInput::new()
            .with_file("one.xml", "<a/>")
            .with_file("two.xml", "<b/>");
        let first = input.next_file().unwrap().unwrap();
        assert_eq!(first.name, "one.xml");
        let second = input.next_file().unwrap().unwrap();
        assert_eq!(second.name, "two.xml");
        assert!(input.next_file().unwrap().is_none());
    }

    #[test]
    fn test_path_input_opens_lazily() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("present.xml");
        std::fs::write(&present, "<a/>").unwrap();

        let mut input = PathInput::new([present, dir.path().join("missing.xml")]);
        assert_eq!(input.remaining(), 2);

        let mut file = input.next_file().unwrap().unwrap();
        let mut content = String::new();
        file.reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, "<a/>");

        assert!(matches!(input.next_file(), Err(ExtractError::Io(_))));
    }
}
