//! Test helpers: services over the in-memory index and local storage.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use saasbase_core::models::{ResizeSpec, UploadRequest};
use saasbase_processing::{ImageTransform, ImageTransformer, ProcessingError, TransformedImage};
use saasbase_services::{MediaIndex, MediaService, Storage};
use saasbase_db::InMemoryMediaIndex;
use saasbase_storage::LocalStorage;
use tempfile::TempDir;

pub const TEST_BASE_URL: &str = "http://localhost:3000/local-media";

/// Wraps the real transformer and counts invocations.
#[derive(Default)]
pub struct CountingTransformer {
    calls: AtomicUsize,
}

impl CountingTransformer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageTransform for CountingTransformer {
    fn transform(
        &self,
        data: &[u8],
        spec: &ResizeSpec,
    ) -> Result<TransformedImage, ProcessingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ImageTransformer.transform(data, spec)
    }
}

pub struct TestMedia {
    pub service: Arc<MediaService>,
    pub index: Arc<dyn MediaIndex>,
    pub storage: Arc<dyn Storage>,
    pub transformer: Arc<CountingTransformer>,
    pub _temp_dir: TempDir,
}

pub async fn setup_media() -> TestMedia {
    setup_media_with_index(Arc::new(InMemoryMediaIndex::new())).await
}

pub async fn setup_media_with_index(index: Arc<dyn MediaIndex>) -> TestMedia {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path(), TEST_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );
    let transformer = Arc::new(CountingTransformer::default());
    let service = Arc::new(MediaService::new(
        index.clone(),
        storage.clone(),
        transformer.clone(),
        Duration::from_secs(3600),
    ));

    TestMedia {
        service,
        index,
        storage,
        transformer,
        _temp_dir: temp_dir,
    }
}

pub fn upload_request(file_name: &str) -> UploadRequest {
    UploadRequest {
        file_name: file_name.to_string(),
        file_type: "image/png".to_string(),
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([30, 90, 160])));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("Failed to encode fixture");
    out
}
