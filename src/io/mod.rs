pub mod output;

pub use output::{
    create_writer, JsonWriter, MarkdownWriter, OutputFormat, OutputWriter, TerminalWriter,
};

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Buffered sink for command output: the named file, or stdout.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn output_file_parents_are_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("summary.md");
        {
            let mut out = open_output(Some(&path)).unwrap();
            writeln!(out, "# Report").unwrap();
            out.flush().unwrap();
        }
        assert_eq!(read_file(&path).unwrap(), "# Report\n");
    }
}
