//! Writing every output form of a value to files.

use std::io::Write;
use std::path::PathBuf;

use tracing::debug;

use crate::{Backend, Dump, DumpError, latex};

/// Where and how [`write_files`] writes.
#[derive(Clone, Debug, Default)]
pub struct FsOptions {
    directory: Option<PathBuf>,
    stderr: bool,
}

impl FsOptions {
    /// Writes to the system temporary directory, without echoing to stderr.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes into `directory` instead of the temporary directory.
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }

    /// Also prints the console form to stderr before writing the files.
    pub fn with_stderr(mut self, stderr: bool) -> Self {
        self.stderr = stderr;
        self
    }

    /// The directory files end up in.
    pub fn directory(&self) -> PathBuf {
        self.directory.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// The file `backend` writes for the given names:
    /// `<project>_<artifact>_<kind>.<extension>`.
    pub fn path(&self, project: &str, artifact: &str, kind: &str, backend: Backend) -> PathBuf {
        self.directory()
            .join(format!("{project}_{artifact}_{kind}.{}", backend.extension()))
    }
}

/// Renders `value` with every backend and writes one file per backend.
///
/// Diagram output is wrapped into a standalone LaTeX document. Returns the
/// written paths, in [`Backend::ALL`] order.
pub fn write_files<A, T>(
    options: &FsOptions,
    project: &str,
    artifact: &str,
    kind: &str,
    adapter: &A,
    value: &T,
) -> Result<Vec<PathBuf>, DumpError>
where
    A: ?Sized,
    T: Dump<A> + ?Sized,
{
    if options.stderr {
        let console = Backend::Console.render_to_string(adapter, value)?;
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "{artifact} {kind}")?;
        writeln!(stderr, "{console}")?;
    }

    let mut written = Vec::with_capacity(Backend::ALL.len());
    for backend in Backend::ALL {
        let body = backend.render_to_string(adapter, value)?;
        let contents = if backend.is_diagram() {
            latex::document(&body)
        } else {
            body
        };
        let path = options.path(project, artifact, kind, backend);
        std::fs::write(&path, contents)?;
        debug!(path = %path.display(), %backend, "wrote dump");
        written.push(path);
    }
    Ok(written)
}
