// 📝 Output Sink - Where result lines go
//
// The engine only ever appends whole lines. A run owns exactly one sink and
// flushes it on exit, including the fatal-abort path.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

pub trait OutputSink {
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()>;
}

// ============================================================================
// FILE SINK
// ============================================================================

/// Buffered file sink. The file is truncated when the sink is created.
pub struct FileSink {
    writer: BufWriter<File>,
}

impl FileSink {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;

        Ok(FileSink {
            writer: BufWriter::new(file),
        })
    }
}

impl OutputSink for FileSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", line)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

// ============================================================================
// MEMORY SINK
// ============================================================================

/// Collects lines in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl OutputSink for MemorySink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.lines.push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
