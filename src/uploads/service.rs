use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use lazy_static::lazy_static;
use rand::{distributions::Alphanumeric, Rng};
use regex::Regex;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;
pub const MAX_FILES_PER_BATCH: usize = 5;
pub const MAX_ORIGINAL_NAME_LEN: usize = 100;

pub const ALLOWED_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "application/pdf",
];

/// One file pulled out of a multipart request, pre-validation.
pub struct UploadFile {
    pub original_name: String,
    pub content_type: String,
    pub body: Bytes,
}

/// Metadata returned for each stored file.
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFileInfo {
    pub original_name: String,
    pub filename: String,
    pub size: usize,
    #[serde(rename = "type")]
    pub content_type: String,
    pub url: String,
}

/// Filesystem seam so handlers and tests do not depend on a real disk.
#[async_trait]
pub trait FileStore: Send + Sync {
    async fn put(&self, filename: &str, body: Bytes) -> anyhow::Result<()>;
    /// Removes a stored file. Returns `false` when it was already absent.
    async fn remove(&self, filename: &str) -> anyhow::Result<bool>;
}

/// Local-disk store writing into the public upload directory.
pub struct LocalFiles {
    dir: PathBuf,
}

impl LocalFiles {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

#[async_trait]
impl FileStore for LocalFiles {
    async fn put(&self, filename: &str, body: Bytes) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, &body).await?;
        debug!(path = %path.display(), size = body.len(), "file written");
        Ok(())
    }

    async fn remove(&self, filename: &str) -> anyhow::Result<bool> {
        let path = self.dir.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Store that discards everything; used by `AppState::fake()`.
pub struct NullFiles;

#[async_trait]
impl FileStore for NullFiles {
    async fn put(&self, _filename: &str, _body: Bytes) -> anyhow::Result<()> {
        Ok(())
    }

    async fn remove(&self, _filename: &str) -> anyhow::Result<bool> {
        Ok(true)
    }
}

pub fn validate_file(file: &UploadFile) -> Result<(), String> {
    if file.body.len() > MAX_FILE_SIZE {
        return Err(format!(
            "file {} is too large, the limit is 5MB",
            file.original_name
        ));
    }
    if !ALLOWED_TYPES.contains(&file.content_type.as_str()) {
        return Err(format!(
            "file {} has an unsupported format, only JPG, PNG, GIF, WebP and PDF are allowed",
            file.original_name
        ));
    }
    if file.original_name.len() > MAX_ORIGINAL_NAME_LEN {
        return Err(format!(
            "file name {} is too long, 100 characters at most",
            file.original_name
        ));
    }
    Ok(())
}

/// Validates the whole batch before anything touches the disk, so a single
/// bad file fails the request with zero partial writes.
pub fn validate_batch(files: &[UploadFile]) -> Result<(), String> {
    if files.is_empty() {
        return Err("no files selected".into());
    }
    if files.len() > MAX_FILES_PER_BATCH {
        return Err("at most 5 files can be uploaded at once".into());
    }
    for file in files {
        validate_file(file)?;
    }
    Ok(())
}

fn sanitize_name(original: &str) -> String {
    lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r"[^a-zA-Z0-9.-]").unwrap();
    }
    let safe = UNSAFE_RE.replace_all(original, "_");
    safe.chars().take(50).collect()
}

/// Collision-resistant storage name: unix millis, a random token and the
/// sanitized original name.
pub fn generate_unique_filename(original: &str) -> String {
    let now = OffsetDateTime::now_utc();
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    format!("{}-{}-{}", millis, token, sanitize_name(original))
}

/// True when `name` is a bare filename with no traversal potential.
pub fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains("..") && !name.contains('/') && !name.contains('\\')
}

/// Writes every file of an already-validated batch, returning the public
/// metadata for each.
pub async fn save_all(
    store: &dyn FileStore,
    public_path: &str,
    files: Vec<UploadFile>,
) -> anyhow::Result<Vec<UploadedFileInfo>> {
    let mut saved = Vec::with_capacity(files.len());
    for file in files {
        let filename = generate_unique_filename(&file.original_name);
        let size = file.body.len();
        store.put(&filename, file.body).await?;
        saved.push(UploadedFileInfo {
            original_name: file.original_name,
            url: format!("{}/{}", public_path, filename),
            filename,
            size,
            content_type: file.content_type,
        });
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content_type: &str, size: usize) -> UploadFile {
        UploadFile {
            original_name: name.into(),
            content_type: content_type.into(),
            body: Bytes::from(vec![0u8; size]),
        }
    }

    #[test]
    fn oversized_file_is_rejected() {
        let err = validate_file(&file("big.jpg", "image/jpeg", 6 * 1024 * 1024)).unwrap_err();
        assert!(err.contains("too large"));
    }

    #[test]
    fn disallowed_type_is_rejected() {
        let err = validate_file(&file("tool.exe", "application/x-msdownload", 10)).unwrap_err();
        assert!(err.contains("unsupported format"));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = format!("{}.png", "a".repeat(120));
        let err = validate_file(&file(&name, "image/png", 10)).unwrap_err();
        assert!(err.contains("too long"));
    }

    #[test]
    fn batch_fails_when_any_file_is_invalid() {
        let files = vec![
            file("ok.png", "image/png", 10),
            file("bad.exe", "application/x-msdownload", 10),
        ];
        assert!(validate_batch(&files).is_err());
    }

    #[test]
    fn batch_limits_count_and_rejects_empty() {
        assert!(validate_batch(&[]).is_err());
        let files: Vec<_> = (0..6).map(|i| file(&format!("{i}.png"), "image/png", 1)).collect();
        assert!(validate_batch(&files).is_err());
        let files: Vec<_> = (0..5).map(|i| file(&format!("{i}.png"), "image/png", 1)).collect();
        assert!(validate_batch(&files).is_ok());
    }

    #[test]
    fn generated_names_are_sanitized_and_unique() {
        let a = generate_unique_filename("foto rumah (1).jpg");
        let b = generate_unique_filename("foto rumah (1).jpg");
        assert_ne!(a, b);
        assert!(a.ends_with("foto_rumah__1_.jpg"));
        assert!(!a.contains(' '));
        assert!(!a.contains('('));
    }

    #[test]
    fn generated_name_caps_original_part() {
        let long = format!("{}.png", "x".repeat(200));
        let name = generate_unique_filename(&long);
        let original_part = name.splitn(3, '-').nth(2).unwrap();
        assert!(original_part.len() <= 50);
    }

    #[test]
    fn traversal_names_are_unsafe() {
        assert!(!is_safe_filename("../etc/passwd"));
        assert!(!is_safe_filename("a/../../b"));
        assert!(!is_safe_filename("dir/file.png"));
        assert!(!is_safe_filename("dir\\file.png"));
        assert!(!is_safe_filename(""));
        assert!(is_safe_filename("1700000000000-abc123-photo.png"));
    }

    #[tokio::test]
    async fn local_store_writes_and_deletes_idempotently() {
        let dir = std::env::temp_dir().join(format!("voltdesk-store-{}", uuid::Uuid::new_v4()));
        let store = LocalFiles::new(dir.clone());

        store
            .put("sample.txt", Bytes::from_static(b"hello"))
            .await
            .expect("put");
        assert_eq!(std::fs::read(dir.join("sample.txt")).unwrap(), b"hello");

        assert!(store.remove("sample.txt").await.expect("first remove"));
        // already gone, still a success
        assert!(!store.remove("sample.txt").await.expect("second remove"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn save_all_returns_public_urls() {
        let files = vec![file("a.png", "image/png", 4), file("b.pdf", "application/pdf", 8)];
        let saved = save_all(&NullFiles, "/uploads", files).await.expect("save");
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].original_name, "a.png");
        assert_eq!(saved[0].size, 4);
        assert!(saved[0].url.starts_with("/uploads/"));
        assert!(saved[0].url.ends_with("a.png"));
        assert_eq!(saved[1].content_type, "application/pdf");
    }
}
