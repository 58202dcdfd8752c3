//! Markdown output format

use anyhow::Result;
use std::io::Write;

use super::FENCE_TAG;

pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn write_header(&mut self, output: &mut dyn Write, title: &str) -> Result<()> {
        writeln!(output, "# {}", title)?;
        writeln!(output)?;
        Ok(())
    }

    /// Writes one section. The closing fence always starts on its own line.
    pub fn write_file(&mut self, output: &mut dyn Write, entry: &str, content: &str) -> Result<()> {
        self.open_section(output, entry)?;
        output.write_all(content.as_bytes())?;
        if !content.ends_with('\n') {
            writeln!(output)?;
        }
        self.close_section(output)
    }

    /// Writes a section whose body is a read-error placeholder.
    pub fn write_read_error(
        &mut self,
        output: &mut dyn Write,
        entry: &str,
        message: &str,
    ) -> Result<()> {
        self.open_section(output, entry)?;
        writeln!(output, "# Error reading file: {}", message)?;
        self.close_section(output)
    }

    fn open_section(&mut self, output: &mut dyn Write, entry: &str) -> Result<()> {
        writeln!(output, "## {}", entry)?;
        writeln!(output)?;
        writeln!(output, "```{}", FENCE_TAG)?;
        Ok(())
    }

    fn close_section(&mut self, output: &mut dyn Write) -> Result<()> {
        writeln!(output, "```")?;
        writeln!(output)?;
        Ok(())
    }
}
