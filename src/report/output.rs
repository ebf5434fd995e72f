//! Directory-backed display surface and artifact bundling

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::render::{DisplaySurface, Figure, TextBlock, TextStyle};
use crate::utils::{print_info, print_success};

/// Name of the text log written next to the figures
pub const TEXT_LOG_NAME: &str = "analysis.md";

/// Writes each figure as `NN_<slug>.svg` and appends text blocks to
/// [`TEXT_LOG_NAME`] inside one output directory
#[derive(Debug)]
pub struct DirectorySurface {
    dir: PathBuf,
    echo_text: bool,
    written: Vec<PathBuf>,
}

impl DirectorySurface {
    /// Create the directory if needed; `echo_text` also prints text blocks.
    ///
    /// The text log and numbered figures of an earlier run are removed, other
    /// files are left alone.
    pub fn create(dir: &Path, echo_text: bool) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        clear_previous_run(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            echo_text,
            written: Vec::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Figure files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn text_log_path(&self) -> PathBuf {
        self.dir.join(TEXT_LOG_NAME)
    }
}

impl DisplaySurface for DirectorySurface {
    fn show_figure(&mut self, figure: Figure) -> Result<()> {
        let path = self
            .dir
            .join(format!("{:02}_{}.svg", self.written.len() + 1, figure.slug()));
        std::fs::write(&path, figure.svg)
            .with_context(|| format!("Failed to write figure: {}", path.display()))?;
        log::debug!("wrote {}x{} figure {}", figure.width, figure.height, path.display());
        self.written.push(path);
        Ok(())
    }

    fn show_text(&mut self, block: TextBlock) -> Result<()> {
        let path = self.text_log_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open text log: {}", path.display()))?;

        let rendered = match block.style {
            TextStyle::Plain => format!("{}\n\n", block.body),
            TextStyle::Info | TextStyle::Success => {
                let quoted: Vec<String> = block.body.lines().map(|l| format!("> {}", l)).collect();
                format!("{}\n\n", quoted.join("\n"))
            }
        };
        file.write_all(rendered.as_bytes())
            .with_context(|| format!("Failed to write text log: {}", path.display()))?;

        if self.echo_text {
            match block.style {
                TextStyle::Success => print_success(&block.body),
                TextStyle::Plain | TextStyle::Info => print_info(&block.body),
            }
        }
        Ok(())
    }
}

/// `NN_<slug>.svg`, as written by [`DirectorySurface::show_figure`]
fn is_numbered_figure(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 7
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'_'
        && name.ends_with(".svg")
}

fn clear_previous_run(dir: &Path) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
            .path();
        if !path.is_file() {
            continue;
        }
        let stale = match path.file_name().and_then(|n| n.to_str()) {
            Some(TEXT_LOG_NAME) => true,
            Some(name) => is_numbered_figure(name),
            None => false,
        };
        if stale {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove old artifact: {}", path.display()))?;
            log::debug!("removed {}", path.display());
        }
    }
    Ok(())
}

/// Package every regular file of `dir` into a zip archive at `zip_path`
pub fn package_artifacts(dir: &Path, zip_path: &Path) -> Result<usize> {
    use std::io::Read;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    entries.sort();

    let zip_file = std::fs::File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in &entries {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .context("Artifact file name is not valid UTF-8")?;
        zip.start_file(filename, options)
            .with_context(|| format!("Failed to add {} to zip", filename))?;
        let mut content = Vec::new();
        std::fs::File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
            .read_to_end(&mut content)?;
        zip.write_all(&content)?;
    }

    zip.finish().context("Failed to finalize zip file")?;

    Ok(entries.len())
}
