//! Reading and writing saved games on disk.

use life_core::{Error, Result, SavedGame};
use std::path::Path;
use tokio::fs;
use tracing::info;

/// Read a saved game. A missing file is reported as `MalformedState`, the same
/// as an unreadable one, so callers have a single fallback path.
pub async fn load_saved_game(path: &Path) -> Result<SavedGame> {
    let json = match fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::MalformedState(format!(
                "no saved game at {}",
                path.display()
            )));
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let saved = SavedGame::from_json(&json)?;
    info!(
        path = %path.display(),
        turn_counter = saved.turn_counter,
        cells = saved.game_cells.len(),
        "Loaded saved game"
    );
    Ok(saved)
}

/// Write a saved game, replacing any previous file atomically
pub async fn write_saved_game(path: &Path, saved: &SavedGame) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let json = saved.to_json()?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json.as_bytes()).await?;
    fs::rename(&tmp, path).await?;

    info!(
        path = %path.display(),
        turn_counter = saved.turn_counter,
        cells = saved.game_cells.len(),
        "Saved game written"
    );
    Ok(())
}
