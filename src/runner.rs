use crate::config::ExportConfig;
use crate::core::{ExportEvent, ExportReport};
use crate::format::MarkdownFormatter;
use crate::manifest::{Manifest, suspected_fusion};
use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Writes the title and one section per manifest entry to `output`.
///
/// Missing files are skipped and reported through `notify`; files that exist
/// but cannot be read as UTF-8 still get a section holding an error
/// placeholder. Only a failure to write `output` aborts the export.
pub fn export(
    root: &Path,
    manifest: &Manifest,
    title: &str,
    output: &mut dyn Write,
    mut notify: impl FnMut(ExportEvent),
) -> Result<ExportReport> {
    let mut formatter = MarkdownFormatter;
    let mut report = ExportReport::default();

    notify(ExportEvent::Started {
        entries: manifest.len(),
    });
    formatter.write_header(output, title)?;

    for entry in manifest.iter() {
        let full_path = root.join(entry);

        if !full_path.exists() {
            match suspected_fusion(entry) {
                Some(component) => {
                    tracing::warn!(entry, component, "missing entry looks like two joined paths")
                }
                None => tracing::debug!(entry, path = ?full_path, "skipping missing file"),
            }
            report.not_found.push(entry.to_string());
            notify(ExportEvent::NotFound(entry.to_string()));
            continue;
        }

        match fs::read_to_string(&full_path) {
            Ok(content) => {
                tracing::debug!(entry, bytes = content.len(), "embedding file");
                formatter.write_file(output, entry, &content)?;
                report.written.push(entry.to_string());
                notify(ExportEvent::FileWritten(entry.to_string()));
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(entry, error = %message, "failed to read file");
                formatter.write_read_error(output, entry, &message)?;
                report.read_failures.push(entry.to_string());
                notify(ExportEvent::ReadFailed {
                    entry: entry.to_string(),
                    message,
                });
            }
        }
    }

    Ok(report)
}

/// Exports to the configured output path.
///
/// The document is written to a temporary file beside the output and moved
/// into place only once complete, so a failed write leaves nothing behind.
pub fn export_to_file(
    config: &ExportConfig,
    notify: impl FnMut(ExportEvent),
) -> Result<(ExportReport, PathBuf)> {
    let manifest = config.manifest()?;
    let output_path = config.output_path();
    let output_dir = match output_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut temp = NamedTempFile::new_in(&output_dir)
        .with_context(|| format!("Failed to create output in {:?}", output_dir))?;
    set_output_permissions(&temp, &output_path)
        .with_context(|| format!("Failed to set permissions on {:?}", output_path))?;

    let report = {
        let mut writer = BufWriter::new(&mut temp);
        let report = export(&config.root, &manifest, &config.title, &mut writer, notify)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        writer
            .flush()
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        report
    };

    temp.persist(&output_path)
        .with_context(|| format!("Failed to create output file {:?}", output_path))?;

    Ok((report, output_path))
}

/// Gives the temp file the existing output's mode, or 0644 for a new output.
#[cfg(unix)]
fn set_output_permissions(temp: &NamedTempFile, output_path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = fs::metadata(output_path)
        .map(|m| m.permissions().mode() & 0o7777)
        .unwrap_or(0o644);
    temp.as_file()
        .set_permissions(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_output_permissions(_temp: &NamedTempFile, _output_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// Main entry point in CLI mode.
///
/// Prints a warning for each missing file as it is encountered and a final
/// success line naming the output file.
pub fn run(config: ExportConfig) -> Result<ExportReport> {
    config.validate()?;

    let verbose = config.verbose;
    let (report, output_path) = export_to_file(&config, |event| match event {
        ExportEvent::Started { entries } => {
            if verbose {
                println!("Exporting {} files...", entries)
            }
        }
        ExportEvent::FileWritten(entry) => {
            if verbose {
                println!("Processed: {}", entry)
            }
        }
        ExportEvent::NotFound(entry) => match suspected_fusion(&entry) {
            Some(component) => println!(
                "Warning: File not found: {} (\"{}\" looks like two paths joined together)",
                entry, component
            ),
            None => println!("Warning: File not found: {}", entry),
        },
        ExportEvent::ReadFailed { entry, message } => {
            if verbose {
                println!("Error reading {}: {}", entry, message)
            }
        }
    })?;

    println!(
        "Successfully exported the specified Python files to {}",
        output_path.display()
    );

    Ok(report)
}

/// Reports which manifest entries are missing without writing anything.
pub fn check(config: &ExportConfig) -> Result<Vec<String>> {
    config.validate()?;
    let manifest = config.manifest()?;

    Ok(manifest
        .iter()
        .filter(|entry| !config.root.join(entry).exists())
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn export_string(root: &Path, entries: &[&str]) -> (String, ExportReport, Vec<ExportEvent>) {
        let manifest = Manifest::new(entries.iter().copied()).unwrap();
        let mut output = Vec::new();
        let mut events = Vec::new();
        let report = export(root, &manifest, "Test Export", &mut output, |e| events.push(e)).unwrap();
        (String::from_utf8(output).unwrap(), report, events)
    }

    #[test]
    fn test_scenario_missing_file_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "hello").unwrap();
        fs::write(temp.path().join("b.txt"), "world\n").unwrap();

        let (doc, report, events) = export_string(temp.path(), &["a.txt", "missing.txt", "b.txt"]);

        assert_eq!(
            doc,
            "# Test Export\n\n\
             ## a.txt\n\n```code\nhello\n```\n\n\
             ## b.txt\n\n```code\nworld\n```\n\n"
        );
        assert_eq!(report.not_found, vec!["missing.txt"]);
        assert_eq!(report.sections(), 2);
        assert_eq!(
            events,
            vec![
                ExportEvent::Started { entries: 3 },
                ExportEvent::FileWritten("a.txt".into()),
                ExportEvent::NotFound("missing.txt".into()),
                ExportEvent::FileWritten("b.txt".into()),
            ]
        );
    }

    #[test]
    fn test_order_follows_manifest() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/z.rs"), "z\n").unwrap();
        fs::write(temp.path().join("a.rs"), "a\n").unwrap();

        let (doc, _, _) = export_string(temp.path(), &["src/z.rs", "a.rs", "src/z.rs"]);

        let headings: Vec<&str> = doc.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(headings, vec!["## src/z.rs", "## a.rs", "## src/z.rs"]);
    }

    #[test]
    fn test_invalid_utf8_gets_placeholder() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("bin.dat"), [0xff, 0xfe, 0x00]).unwrap();

        let (doc, report, _) = export_string(temp.path(), &["bin.dat"]);

        let message = fs::read_to_string(temp.path().join("bin.dat"))
            .unwrap_err()
            .to_string();
        assert!(doc.contains(&format!(
            "## bin.dat\n\n```code\n# Error reading file: {}\n```\n\n",
            message
        )));
        assert_eq!(report.read_failures, vec!["bin.dat"]);
        assert!(report.not_found.is_empty());
    }

    #[test]
    fn test_directory_entry_is_read_failure() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("client")).unwrap();

        let (doc, report, _) = export_string(temp.path(), &["client"]);

        assert!(doc.contains("## client\n\n```code\n# Error reading file: "));
        assert_eq!(report.read_failures, vec!["client"]);
    }

    #[test]
    fn test_all_missing_still_writes_title() {
        let temp = TempDir::new().unwrap();
        let (doc, report, _) = export_string(temp.path(), &["x.js", "y.js"]);

        assert_eq!(doc, "# Test Export\n\n");
        assert_eq!(report.skipped(), 2);
    }

    #[test]
    fn test_write_failure_propagates() {
        struct FailingWriter;
        impl Write for FailingWriter {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let temp = TempDir::new().unwrap();
        let manifest = Manifest::new(["a.txt"]).unwrap();
        let result = export(temp.path(), &manifest, "T", &mut FailingWriter, |_| {});
        assert!(result.is_err());
    }

    #[test]
    fn test_dotted_directory_exports_normally() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("conf.d")).unwrap();
        fs::write(temp.path().join("conf.d/site.conf"), "listen 80;\n").unwrap();

        let (doc, report, _) = export_string(temp.path(), &["conf.d/site.conf"]);

        assert!(doc.contains("## conf.d/site.conf\n\n```code\nlisten 80;\n```\n\n"));
        assert_eq!(report.written, vec!["conf.d/site.conf"]);
    }

    #[test]
    fn test_fused_entry_is_not_found() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a\n").unwrap();

        let (doc, report, _) = export_string(
            temp.path(),
            &["client/js/engine/audio.jsclient/js/engine/game.js", "a.txt"],
        );

        assert!(!doc.contains("audio.jsclient"));
        assert_eq!(
            report.not_found,
            vec!["client/js/engine/audio.jsclient/js/engine/game.js"]
        );
        assert_eq!(report.written, vec!["a.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_output_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let config = ExportConfig {
            root: temp.path().to_path_buf(),
            files: Some(vec![]),
            ..Default::default()
        };

        let (_, path) = export_to_file(&config, |_| {}).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);

        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();
        let (_, path) = export_to_file(&config, |_| {}).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn test_check_lists_missing_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();

        let config = ExportConfig {
            root: temp.path().to_path_buf(),
            files: Some(vec!["a.txt".into(), "gone.txt".into()]),
            ..Default::default()
        };

        assert_eq!(check(&config).unwrap(), vec!["gone.txt"]);
        assert!(!config.output_path().exists());
    }
}
