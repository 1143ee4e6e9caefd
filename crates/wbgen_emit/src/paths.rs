//! Output file naming.

use std::path::{Path, PathBuf};

const PROJECT_EXTENSIONS: [&str; 4] = ["yaml", "yml", "toml", "json"];

/// Where the two artifacts for a project file are written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// The Verilog file.
    pub verilog: PathBuf,
    /// The C header.
    pub header: PathBuf,
}

impl ArtifactPaths {
    /// Derives artifact paths from the project file path.
    ///
    /// A `.yaml`, `.yml`, `.toml`, or `.json` extension (any case) is
    /// replaced by `.v` / `.h`; any other name gets the extension appended.
    /// `output_dir`, when given, replaces the project file's directory.
    pub fn for_project(project: &Path, output_dir: Option<&Path>) -> Self {
        let file_name = project
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = match project.extension().and_then(|e| e.to_str()) {
            Some(ext)
                if PROJECT_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known)) =>
            {
                file_name[..file_name.len() - ext.len() - 1].to_string()
            }
            _ => file_name,
        };

        let dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => project.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        Self {
            verilog: dir.join(format!("{stem}.v")),
            header: dir.join(format!("{stem}.h")),
        }
    }

    /// Returns the header's file name, used for its inclusion guard.
    pub fn header_name(&self) -> String {
        self.header
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
