//! Area-file parsers (§4.A) and the directory-wide bulk loader (§7).

pub mod common;
pub mod mob;
pub mod obj;
pub mod wld;
pub mod zon;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};

use crate::world::database::WorldDb;

/// Loads every `.wld`/`.mob`/`.obj`/`.zon` file under `area_dir`, in
/// filename order within each extension, into `db`. Fails only when zero
/// rooms were loaded across the whole directory (§7) — a malformed
/// individual record is logged and skipped by the per-file parsers.
pub fn load_area_directory(db: &WorldDb, area_dir: &Path) -> anyhow::Result<()> {
    load_extension(area_dir, "wld", |file, text| {
        for room in wld::parse_wld_file(file, text) {
            db.load_room(room);
        }
    })?;
    load_extension(area_dir, "mob", |file, text| {
        for mob in mob::parse_mob_file(file, text) {
            db.load_mobile(mob);
        }
    })?;
    load_extension(area_dir, "obj", |file, text| {
        for obj in obj::parse_obj_file(file, text) {
            db.load_object(obj);
        }
    })?;
    load_extension(area_dir, "zon", |file, text| {
        for zone in zon::parse_zon_file(file, text) {
            db.load_zone(zone);
        }
    })?;

    if db.room_count() == 0 {
        bail!("area directory {} produced zero rooms; refusing to start", area_dir.display());
    }

    log::info!(
        "loaded area directory {}: {} rooms, {} zones",
        area_dir.display(),
        db.room_count(),
        db.all_zones().len()
    );
    Ok(())
}

fn load_extension(
    area_dir: &Path,
    extension: &str,
    mut handle_file: impl FnMut(&Path, &str),
) -> anyhow::Result<()> {
    let mut paths: Vec<_> = fs::read_dir(area_dir)
        .with_context(|| format!("reading area directory {}", area_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();
    paths.sort();

    for path in paths {
        match fs::read_to_string(&path) {
            Ok(text) => handle_file(&path, &text),
            Err(e) => log::warn!("skipping unreadable area file {}: {e}", path.display()),
        }
    }
    Ok(())
}
