// ── Window placement persistence ──────────────────────────────────────────────
//
// Reads and writes `%APPDATA%\Lantern\placement.json` so the main window
// reopens where the user left it, snap state included.
// No `unsafe` — pure safe Rust + serde_json.

use std::{fs, io, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::window::Snap;

// ── On-disk types ─────────────────────────────────────────────────────────────

/// Root of the JSON placement file.
#[derive(Serialize, Deserialize)]
pub(crate) struct PlacementFile {
    pub(crate) version: u32,
    /// Screen position of the window's top-left corner when floating.
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) width: i32,
    pub(crate) height: i32,
    /// Snap label (`Snap::as_str`); unknown labels load as unsnapped.
    #[serde(default)] // backward-compat: files written before snapping shipped
    pub(crate) snap: String,
}

impl PlacementFile {
    pub(crate) fn snap_state(&self) -> Snap {
        Snap::from_label(&self.snap)
    }
}

// ── Format version ────────────────────────────────────────────────────────────

const PLACEMENT_VERSION: u32 = 1;

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the placement file: `%APPDATA%\Lantern\placement.json`.
///
/// Returns `None` if the `APPDATA` environment variable is not set.
pub(crate) fn placement_path() -> Option<PathBuf> {
    let appdata = std::env::var_os("APPDATA")?;
    let mut p = PathBuf::from(appdata);
    p.push("Lantern");
    p.push("placement.json");
    Some(p)
}

// ── Save ──────────────────────────────────────────────────────────────────────

/// Write the placement file, creating the `Lantern` directory if needed.
/// Failures surface as `LanternError::Placement`; the caller (the window
/// shell) logs and discards them.
pub(crate) fn save(x: i32, y: i32, width: i32, height: i32, snap: Snap) -> Result<()> {
    let path = placement_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "APPDATA not set"))?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let pf = PlacementFile {
        version: PLACEMENT_VERSION,
        x,
        y,
        width,
        height,
        snap: snap.as_str().to_owned(),
    };

    let file = fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, &pf).map_err(io::Error::other)?;
    Ok(())
}

// ── Load ──────────────────────────────────────────────────────────────────────

/// Read and parse the placement file.
///
/// Returns `None` on any error: file missing, JSON parse failure, or an
/// unrecognised version number.  The app continues with default placement.
pub(crate) fn load() -> Option<PlacementFile> {
    let path = placement_path()?;
    let data = fs::read(&path).ok()?;
    let pf: PlacementFile = serde_json::from_slice(&data).ok()?;
    if pf.version != PLACEMENT_VERSION {
        return None;
    }
    Some(pf)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
