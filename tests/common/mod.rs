#![allow(dead_code)]

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use pictura::config::DatabaseConfig;
use pictura::db::{self, HistoryStore};
use std::io::Cursor;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const BOUNDARY: &str = "pictura-test-boundary";

/// A SQLite file under the system temp dir, removed on drop.
pub struct TempDb {
    path: PathBuf,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "pictura-{tag}-{}-{}.sqlite",
            std::process::id(),
            nanos
        ));
        Self { path }
    }

    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path.display())
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm"] {
            let mut side = self.path.clone().into_os_string();
            side.push(suffix);
            let _ = std::fs::remove_file(side);
        }
    }
}

pub async fn open_store(tag: &str, pool_size: u32, max_overflow: u32) -> (HistoryStore, TempDb) {
    let temp = TempDb::new(tag);
    let cfg = DatabaseConfig {
        url: temp.url(),
        pool_size,
        max_overflow,
        acquire_timeout_secs: 30,
        init_schema: true,
    };
    let pool = db::connect(&cfg).await.expect("failed to open pool");
    let store = HistoryStore::new(pool);
    store.init_schema().await.expect("failed to init schema");
    (store, temp)
}

/// Wait until every connection checked out of the pool has been returned.
pub async fn wait_for_release(store: &HistoryStore, baseline: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while store.in_use() > baseline {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("pooled connections were not released");
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([200, 40, 90]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("failed to encode test image");
    out.into_inner()
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}
