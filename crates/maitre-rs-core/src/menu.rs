//! Menu loading helpers.

use crate::error::MaitreCoreError;
use log::debug;
use maitre_rs_protocol::Menu;
use std::path::Path;

/// Load a menu from a JSON file.
pub fn load_menu(path: &Path) -> Result<Menu, MaitreCoreError> {
    debug!("loading menu (path={})", path.display());
    let raw = std::fs::read_to_string(path)?;
    Menu::from_json(&raw).map_err(|err| MaitreCoreError::Parse(err.to_string()))
}
