// src/services/object_store.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::common::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMeta {
    pub key: String,
    pub size: u64,
}

/// Resultado de uma listagem de um nível: objetos e sub-prefixos ("pastas").
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub objects: Vec<ObjectMeta>,
    pub prefixes: Vec<String>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<u64, AppError>;
    async fn size_of(&self, key: &str) -> Result<Option<u64>, AppError>;
    async fn delete(&self, key: &str) -> Result<bool, AppError>;
    async fn list(&self, prefix: &str) -> Result<Listing, AppError>;
}

/// Rejeita chaves absolutas, vazias ou com `..`.
pub fn validate_key(key: &str) -> Result<(), AppError> {
    if key.is_empty() || key.starts_with('/') || key.contains('\\') {
        return Err(AppError::InvalidPath);
    }
    if key
        .trim_end_matches('/')
        .split('/')
        .any(|segment| segment.is_empty() || segment == "." || segment == "..")
    {
        return Err(AppError::InvalidPath);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File(u64),
    Other,
}

async fn describe(entry: &tokio::fs::DirEntry) -> std::io::Result<EntryKind> {
    let file_type = entry.file_type().await?;
    if file_type.is_dir() {
        Ok(EntryKind::Dir)
    } else if file_type.is_file() {
        Ok(EntryKind::File(entry.metadata().await?.len()))
    } else {
        Ok(EntryKind::Other)
    }
}

/// Monta a listagem ignorando, com aviso, entradas ilegíveis
/// (ex.: arquivo removido entre o `read_dir` e o `metadata`).
fn build_listing(entries: Vec<(String, std::io::Result<EntryKind>)>) -> Listing {
    let mut listing = Listing::default();
    for (key, kind) in entries {
        match kind {
            Ok(EntryKind::Dir) => listing.prefixes.push(key),
            Ok(EntryKind::File(size)) => listing.objects.push(ObjectMeta { key, size }),
            Ok(EntryKind::Other) => {}
            Err(e) => tracing::warn!("⚠️ Ignorando objeto ilegível '{}': {}", key, e),
        }
    }
    listing.objects.sort_by(|a, b| a.key.cmp(&b.key));
    listing.prefixes.sort();
    listing
}

// Armazenamento em disco local, chave = caminho relativo à raiz
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        validate_key(key)?;
        Ok(self.root.join(Path::new(key.trim_end_matches('/'))))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<u64, AppError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(bytes.len() as u64)
    }

    async fn size_of(&self, key: &str) -> Result<Option<u64>, AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Listing, AppError> {
        let dir = self.path_for(prefix)?;
        let prefix = prefix.trim_end_matches('/');

        let mut dir_entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Listing::default()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        while let Some(entry) = dir_entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push((format!("{prefix}/{name}"), describe(&entry).await));
        }
        Ok(build_listing(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_cannot_escape_the_root() {
        assert!(validate_key("companies/a/logo.png").is_ok());
        assert!(validate_key("companies/a/").is_ok());
        for bad in ["", "/etc/passwd", "companies/../x", "companies//x", "a\\b", "./a"] {
            assert!(matches!(validate_key(bad), Err(AppError::InvalidPath)), "{bad}");
        }
    }

    #[test]
    fn unreadable_entries_are_skipped() {
        let vanished = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let listing = build_listing(vec![
            ("c/b.jpg".into(), Ok(EntryKind::File(7))),
            ("c/lost.jpg".into(), Err(vanished)),
            ("c/a.jpg".into(), Ok(EntryKind::File(3))),
            ("c/sub".into(), Ok(EntryKind::Dir)),
            ("c/fifo".into(), Ok(EntryKind::Other)),
        ]);

        let keys: Vec<_> = listing.objects.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["c/a.jpg", "c/b.jpg"]);
        assert_eq!(listing.prefixes, vec!["c/sub".to_string()]);
    }

    #[tokio::test]
    async fn local_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path());

        assert_eq!(store.put("companies/c1/ariza/a.jpg", b"12345").await.unwrap(), 5);
        store.put("companies/c1/logo.png", b"xy").await.unwrap();

        assert_eq!(store.size_of("companies/c1/ariza/a.jpg").await.unwrap(), Some(5));
        assert_eq!(store.size_of("companies/c1/missing.jpg").await.unwrap(), None);

        let listing = store.list("companies/c1").await.unwrap();
        assert_eq!(listing.objects, vec![ObjectMeta { key: "companies/c1/logo.png".into(), size: 2 }]);
        assert_eq!(listing.prefixes, vec!["companies/c1/ariza".to_string()]);

        assert!(store.delete("companies/c1/logo.png").await.unwrap());
        assert!(!store.delete("companies/c1/logo.png").await.unwrap());
        assert!(store.list("companies/nobody").await.unwrap().objects.is_empty());
    }
}
