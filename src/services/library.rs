use crate::models::StoredFile;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::Path;

/// List the storage directory, sorted by name
pub async fn list_stored_files(dir: &Path) -> std::io::Result<Vec<StoredFile>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        // Files are transient; one may vanish between listing and stat
        let meta = match entry.metadata().await {
            Ok(meta) => meta,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e),
        };

        files.push(StoredFile {
            name: entry.file_name().to_string_lossy().into_owned(),
            size_bytes: meta.len(),
            size_label: human_size(meta.len()),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        });
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(1023), "1023 B");
        assert_eq!(human_size(1536), "1.5 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[tokio::test]
    async fn test_list_stored_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("b.mp3"), vec![0u8; 2048]).await.unwrap();
        tokio::fs::write(dir.path().join("a.mp3"), b"x").await.unwrap();

        let files = list_stored_files(dir.path()).await.unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.mp3", "b.mp3"]);
        assert_eq!(files[1].size_bytes, 2048);
        assert_eq!(files[1].size_label, "2.0 KB");
        assert!(files[0].modified.is_some());
    }

    #[tokio::test]
    async fn test_list_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_stored_files(&dir.path().join("nope")).await.is_err());
    }
}
