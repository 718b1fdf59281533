use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::Local;
use directories::ProjectDirs;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    calendar::Calendar,
    constants::{DATA_DIR_ENV, FILE_NAMES},
    domain::ProjectId,
    project::{ProjectRecord, ProjectStore},
};

/// Project store keeping one JSON record and one raw image file per project.
pub struct JsonProjectStore {
    dir: PathBuf,
}

impl JsonProjectStore {
    pub fn new(data_dir: &Path) -> Result<Self, String> {
        let dir = data_dir.join(FILE_NAMES.projects_dir);
        fs::create_dir_all(&dir).map_err(|e| e.to_string())?;
        Ok(Self { dir })
    }

    fn record_path(&self, id: ProjectId) -> PathBuf {
        self.dir
            .join(format!("{}.{}", id.0, FILE_NAMES.project_extension))
    }

    fn image_path(&self, id: ProjectId) -> PathBuf {
        self.dir.join(format!("{}.{}", id.0, FILE_NAMES.image_extension))
    }

    fn read_record(&self, path: &Path) -> Result<ProjectRecord, String> {
        let record: ProjectRecord = read_json(path)?;
        if record.version != ProjectRecord::VERSION {
            return Err(format!(
                "unsupported project version {} in {}",
                record.version,
                path.display()
            ));
        }
        record
            .validate()
            .map_err(|e| format!("{} in {}", e, path.display()))?;
        Ok(record)
    }
}

impl ProjectStore for JsonProjectStore {
    fn list(&self) -> Result<Vec<ProjectRecord>, String> {
        let entries = fs::read_dir(&self.dir).map_err(|e| e.to_string())?;
        let mut records = Vec::new();

        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let is_record = path
                .extension()
                .is_some_and(|ext| ext == FILE_NAMES.project_extension);
            if !is_record {
                continue;
            }

            match self.read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable project"),
            }
        }

        records.sort_by_key(|record| record.id);
        Ok(records)
    }

    fn load(&self, id: ProjectId) -> Result<Option<ProjectRecord>, String> {
        let path = self.record_path(id);
        if !path.exists() {
            return Ok(None);
        }

        let mut record = self.read_record(&path)?;
        let image_path = self.image_path(id);
        if image_path.exists() {
            record.image = fs::read(&image_path).map_err(|e| e.to_string())?;
        }
        Ok(Some(record))
    }

    /// An empty image leaves any stored image untouched.
    fn save(&mut self, record: &ProjectRecord) -> Result<(), String> {
        write_json_atomic(&self.record_path(record.id), record)?;
        if !record.image.is_empty() {
            atomic_write(&self.image_path(record.id), &record.image, false)?;
        }
        debug!(project = %record.id, "project saved");
        Ok(())
    }

    fn delete(&mut self, id: ProjectId) -> Result<bool, String> {
        let path = self.record_path(id);
        let existed = path.exists();
        delete_file_if_exists(&path)?;
        delete_file_if_exists(&self.image_path(id))?;
        Ok(existed)
    }
}

/// Data directory: explicit override, then `GOALGRID_DATA_DIR`, then the platform default.
pub fn get_data_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        fs::create_dir_all(dir).ok();
        return dir.to_path_buf();
    }

    if let Some(dir) = env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
        let dir = PathBuf::from(dir);
        fs::create_dir_all(&dir).ok();
        return dir;
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "goalgrid", "goalgrid") {
        let data_dir = proj_dirs.data_dir().to_path_buf();
        fs::create_dir_all(&data_dir).ok();
        data_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_calendar_path(data_dir: &Path) -> PathBuf {
    data_dir.join(FILE_NAMES.calendar_events)
}

pub fn load_calendar(path: &Path) -> Result<Calendar, String> {
    if !path.exists() {
        return Ok(Calendar::new());
    }

    let calendar: Calendar = read_json(path)?;
    if calendar.version != Calendar::VERSION {
        return Err(format!(
            "unsupported calendar version {} in {}",
            calendar.version,
            path.display()
        ));
    }
    Ok(calendar)
}

pub fn save_calendar(path: &Path, calendar: &Calendar) -> Result<(), String> {
    write_json_atomic(path, calendar)
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    atomic_write(path, json.as_bytes(), true)
}

pub fn delete_file_if_exists(path: &Path) -> Result<(), String> {
    if path.exists() {
        fs::remove_file(path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn write_text_file(path: &Path, content: &str) -> Result<(), String> {
    atomic_write(path, content.as_bytes(), true)
}

pub fn create_backup(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }

    let backup_dir = path
        .parent()
        .unwrap_or(Path::new("."))
        .join(FILE_NAMES.backups_dir);
    fs::create_dir_all(&backup_dir).map_err(|e| e.to_string())?;

    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let backup_path = backup_dir.join(format!("{}.{}", file_name, timestamp));
    fs::copy(path, &backup_path).map_err(|e| e.to_string())?;

    let prefix = format!("{}.", file_name);
    if let Ok(entries) = fs::read_dir(&backup_dir) {
        let mut backups: Vec<_> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with(&prefix))
            .collect();
        backups.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

        while backups.len() > FILE_NAMES.max_backups {
            let oldest = backups.remove(0);
            let _ = fs::remove_file(oldest.path());
        }
    }

    Ok(())
}

pub fn atomic_write(path: &Path, content: &[u8], backup: bool) -> Result<(), String> {
    if backup && path.exists() {
        create_backup(path)?;
    }

    let tmp_path = path.with_extension("tmp");
    let mut tmp_file = File::create(&tmp_path).map_err(|e| e.to_string())?;
    tmp_file.write_all(content).map_err(|e| e.to_string())?;
    tmp_file.sync_all().map_err(|e| e.to_string())?;
    fs::rename(&tmp_path, path).map_err(|e| e.to_string())?;
    Ok(())
}
