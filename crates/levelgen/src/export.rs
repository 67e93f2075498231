//! Wire formats handed to external consumers.
//!
//! - `level_<hash>.txt`: one line per grid row, `'1'` for wall and `'0'` for
//!   room, rows terminated by `\n`.
//! - `level_<hash>.areas.json`: the ordered `Area` list (corners plus the
//!   corridor flag) as a JSON array.
//!
//! Writing is never fatal to generation: `export_level_or_warn` logs and
//! carries on.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::area::Area;
use crate::error::ExportError;
use crate::grid::Grid;
use crate::mapgen::GeneratedLevel;

pub fn level_file_name(seed_hash: u64) -> String {
    format!("level_{seed_hash:016x}.txt")
}

pub fn areas_file_name(seed_hash: u64) -> String {
    format!("level_{seed_hash:016x}.areas.json")
}

/// Paths written by a successful `export_level`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportedFiles {
    pub grid: PathBuf,
    pub areas: PathBuf,
}

fn io_error(path: &Path, source: io::Error) -> ExportError {
    ExportError::Io { path: path.display().to_string(), source }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|err| io_error(path, err))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes).map_err(|err| io_error(path, err))?;
    writer.flush().map_err(|err| io_error(path, err))
}

pub fn write_grid_text(path: &Path, grid: &Grid) -> Result<(), ExportError> {
    write_file(path, grid.to_text().as_bytes())
}

pub fn write_areas_json(path: &Path, areas: &[Area]) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(areas)?;
    write_file(path, json.as_bytes())
}

pub fn read_areas_json(path: &Path) -> Result<Vec<Area>, ExportError> {
    let text = fs::read_to_string(path).map_err(|err| io_error(path, err))?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes the grid text and area list for `level` into `dir`, creating the
/// directory if needed.
pub fn export_level(dir: &Path, level: &GeneratedLevel) -> Result<ExportedFiles, ExportError> {
    fs::create_dir_all(dir).map_err(|err| io_error(dir, err))?;

    let files = ExportedFiles {
        grid: dir.join(level_file_name(level.seed_hash)),
        areas: dir.join(areas_file_name(level.seed_hash)),
    };
    write_grid_text(&files.grid, &level.grid)?;
    write_areas_json(&files.areas, &level.areas())?;

    debug!(grid = %files.grid.display(), areas = %files.areas.display(), "exported level");
    Ok(files)
}

/// Like `export_level`, but a failure is logged and skipped.
pub fn export_level_or_warn(dir: &Path, level: &GeneratedLevel) -> Option<ExportedFiles> {
    match export_level(dir, level) {
        Ok(files) => Some(files),
        Err(err) => {
            warn!(dir = %dir.display(), seed = %level.seed, "skipping level export: {err}");
            None
        }
    }
}
