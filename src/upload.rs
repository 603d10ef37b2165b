use crate::error::AnnotatorError;
use crate::session::AnnotationSession;
use image::imageops::FilterType;
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;

/// Decoded backgrounds are downscaled to fit this side length. It is below the
/// smallest texture limit of the egui backends, and the image is only ever
/// shown scaled into the canvas.
pub const MAX_BACKGROUND_SIDE: u32 = 2048;

static NEXT_BACKGROUND_ID: AtomicU64 = AtomicU64::new(1);

/// A decoded background image. Cheap to clone; pixels are shared.
#[derive(Clone, Debug)]
pub struct Background {
    id: u64,
    pixels: Arc<RgbaImage>,
}

impl Background {
    pub fn new(pixels: RgbaImage) -> Self {
        Self {
            id: NEXT_BACKGROUND_ID.fetch_add(1, Ordering::Relaxed),
            pixels: Arc::new(pixels),
        }
    }

    /// Unique per decoded image, so backends can cache uploads.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl PartialEq for Background {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

pub fn decode_file(path: &Path) -> Result<Background, AnnotatorError> {
    let invalid = |reason: String| AnnotatorError::InvalidUpload {
        path: path.to_path_buf(),
        reason,
    };
    if !path.is_file() {
        return Err(invalid("file not found".to_string()));
    }
    let img = image::open(path).map_err(|e| invalid(e.to_string()))?;
    let rgba = img.to_rgba8();
    let rgba = fit_within(&rgba, MAX_BACKGROUND_SIDE).unwrap_or(rgba);
    Ok(Background::new(rgba))
}

/// Downscaled copy keeping the aspect ratio, or `None` if `img` already fits.
pub fn fit_within(img: &RgbaImage, max_side: u32) -> Option<RgbaImage> {
    let (w, h) = img.dimensions();
    let max_side = max_side.max(1);
    if w <= max_side && h <= max_side {
        return None;
    }
    let scale = max_side as f64 / w.max(h) as f64;
    let nw = ((w as f64 * scale).round() as u32).clamp(1, max_side);
    let nh = ((h as f64 * scale).round() as u32).clamp(1, max_side);
    tracing::debug!(from = ?(w, h), to = ?(nw, nh), "downscaling background");
    Some(image::imageops::resize(img, nw, nh, FilterType::Triangle))
}

/// Decodes selected files off the UI thread. Results are only handed back
/// through [`BackgroundLoader::poll`], which the UI thread calls every frame,
/// so the session is still mutated by a single writer.
#[derive(Default)]
pub struct BackgroundLoader {
    pending: Option<(PathBuf, Receiver<Result<Background, AnnotatorError>>)>,
}

impl BackgroundLoader {
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts decoding `path`. A load already in flight is superseded.
    pub fn start(&mut self, path: PathBuf) {
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        std::thread::spawn(move || {
            let _ = tx.send(decode_file(&worker_path));
        });
        tracing::debug!(path = %path.display(), "background decode started");
        self.pending = Some((path, rx));
    }

    /// Returns the finished result, if any. Never blocks.
    pub fn poll(&mut self) -> Option<Result<Background, AnnotatorError>> {
        let (path, rx) = self.pending.as_ref()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(AnnotatorError::InvalidUpload {
                path: path.clone(),
                reason: "decoder thread exited".to_string(),
            }),
        };
        self.pending = None;
        Some(result)
    }

    /// Hands a finished load to the session. A failed decode leaves the
    /// current background in place. Returns whether the background changed.
    pub fn apply_to(&mut self, session: &mut AnnotationSession) -> bool {
        match self.poll() {
            Some(Ok(background)) => {
                tracing::info!(
                    width = background.width(),
                    height = background.height(),
                    "background loaded"
                );
                session.set_background(background);
                true
            }
            Some(Err(err)) => {
                tracing::warn!(%err, "keeping previous background");
                false
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Palette;
    use std::time::{Duration, Instant};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("polygon-annotate-{}-{name}", std::process::id()))
    }

    fn wait_for(loader: &mut BackgroundLoader) -> Result<Background, AnnotatorError> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = loader.poll() {
                return result;
            }
            assert!(Instant::now() < deadline, "decode timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn missing_file_is_invalid_upload() {
        let path = temp_path("missing.png");
        let err = decode_file(&path).expect_err("missing file");
        assert!(matches!(err, AnnotatorError::InvalidUpload { .. }));
    }

    #[test]
    fn garbage_bytes_are_invalid_upload() {
        let path = temp_path("garbage.png");
        std::fs::write(&path, b"definitely not a png").expect("write garbage");
        let mut loader = BackgroundLoader::default();
        loader.start(path.clone());
        let result = wait_for(&mut loader);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(AnnotatorError::InvalidUpload { .. })));
        assert!(!loader.is_loading());
    }

    #[test]
    fn decodes_png_off_thread() {
        let path = temp_path("ok.png");
        RgbaImage::from_pixel(4, 3, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .expect("write png");
        let mut loader = BackgroundLoader::default();
        loader.start(path.clone());
        assert!(loader.is_loading());
        let bg = wait_for(&mut loader).expect("decoded");
        let _ = std::fs::remove_file(&path);
        assert_eq!((bg.width(), bg.height()), (4, 3));
    }

    #[test]
    fn oversized_images_are_fitted() {
        let wide = RgbaImage::new(9000, 10);
        let fitted = fit_within(&wide, MAX_BACKGROUND_SIDE).expect("downscaled");
        assert_eq!(fitted.width(), MAX_BACKGROUND_SIDE);
        assert!(fitted.height() >= 1);

        let tall = RgbaImage::new(300, 6000);
        let fitted = fit_within(&tall, 1000).expect("downscaled");
        assert_eq!(fitted.dimensions(), (50, 1000));

        assert!(fit_within(&RgbaImage::new(800, 550), MAX_BACKGROUND_SIDE).is_none());
    }

    #[test]
    fn large_upload_decodes_within_texture_limit() {
        let path = temp_path("large.png");
        RgbaImage::from_pixel(MAX_BACKGROUND_SIDE * 2, 8, image::Rgba([9, 9, 9, 255]))
            .save(&path)
            .expect("write png");
        let bg = decode_file(&path).expect("decoded");
        let _ = std::fs::remove_file(&path);
        assert_eq!(bg.width(), MAX_BACKGROUND_SIDE);
        assert_eq!(bg.height(), 4);
    }

    #[test]
    fn failed_upload_keeps_previous_background() {
        let mut session = AnnotationSession::new(Palette::default(), 10.0);
        let previous = Background::new(RgbaImage::new(5, 5));
        let previous_id = previous.id();
        session.set_background(previous);

        let path = temp_path("keep.png");
        std::fs::write(&path, b"\x89PNG but not really").expect("write garbage");
        let mut loader = BackgroundLoader::default();
        loader.start(path.clone());
        let deadline = Instant::now() + Duration::from_secs(10);
        while loader.is_loading() {
            assert!(!loader.apply_to(&mut session));
            assert!(Instant::now() < deadline, "decode timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
        let _ = std::fs::remove_file(&path);
        assert_eq!(session.background().map(Background::id), Some(previous_id));
    }

    #[test]
    fn successful_upload_replaces_background() {
        let mut session = AnnotationSession::new(Palette::default(), 10.0);
        session.set_background(Background::new(RgbaImage::new(5, 5)));

        let path = temp_path("replace.png");
        RgbaImage::new(7, 3).save(&path).expect("write png");
        let mut loader = BackgroundLoader::default();
        loader.start(path.clone());
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut applied = false;
        while !applied {
            applied = loader.apply_to(&mut session);
            assert!(Instant::now() < deadline, "decode timed out");
            std::thread::sleep(Duration::from_millis(5));
        }
        let _ = std::fs::remove_file(&path);
        assert_eq!(session.background().map(Background::width), Some(7));
    }

    #[test]
    fn each_background_gets_a_fresh_id() {
        let a = Background::new(RgbaImage::new(1, 1));
        let b = Background::new(RgbaImage::new(1, 1));
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone(), a);
    }
}
