//! Upload pipeline: resize, background removal, trim.
//!
//! DESIGN
//! ======
//! Each stage is fallible and the stages run strictly in order; the first
//! failure aborts the upload with one [`PipelineError`] and nothing partial is
//! kept. CPU-bound image work runs on `spawn_blocking`. Background removal is
//! a pluggable async collaborator.
//!
//! Results can arrive after the user has moved on. [`UploadTracker`] hands
//! out generation tickets; only the ticket from the most recent `begin` is
//! current, and `cancel` invalidates everything outstanding.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use canvas::store::ImageRef;
use image::DynamicImage;

use crate::error::ErrorCode;
use crate::imaging::{self, ImageError, ResizeLimits};

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;

/// Channel value at or above which [`WhiteKeyRemover`] treats a pixel as backdrop.
pub const DEFAULT_WHITE_KEY_THRESHOLD: u8 = 240;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("resize failed: {0}")]
    Resize(#[source] ImageError),
    #[error("background removal failed: {0}")]
    BackgroundRemoval(String),
    #[error("trim failed: {0}")]
    Trim(#[source] ImageError),
    #[error("image task failed: {0}")]
    Task(String),
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Resize(_) => "E_UPLOAD_RESIZE",
            Self::BackgroundRemoval(_) => "E_UPLOAD_BACKGROUND",
            Self::Trim(_) => "E_UPLOAD_TRIM",
            Self::Task(_) => "E_UPLOAD_TASK",
        }
    }

    fn user_message(&self) -> String {
        "画像の処理に失敗しました。もう一度お試しください。".to_owned()
    }

    fn retryable(&self) -> bool {
        true
    }
}

/// Removes the backdrop from a photo, returning a PNG `data:` URL with alpha.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    async fn remove_background(&self, image: &str) -> Result<String, PipelineError>;
}

/// Keys out near-white backdrops. Good enough for product shots on paper.
#[derive(Debug, Clone, Copy)]
pub struct WhiteKeyRemover {
    pub threshold: u8,
}

impl Default for WhiteKeyRemover {
    fn default() -> Self {
        Self { threshold: DEFAULT_WHITE_KEY_THRESHOLD }
    }
}

impl WhiteKeyRemover {
    fn key_out(image: &str, threshold: u8) -> Result<String, ImageError> {
        let mut rgba = imaging::decode(image)?.to_rgba8();
        for px in rgba.pixels_mut() {
            if px.0[..3].iter().all(|&c| c >= threshold) {
                px.0[3] = 0;
            }
        }
        imaging::encode_png(&DynamicImage::ImageRgba8(rgba))
    }
}

#[async_trait]
impl BackgroundRemover for WhiteKeyRemover {
    async fn remove_background(&self, image: &str) -> Result<String, PipelineError> {
        let image = image.to_owned();
        let threshold = self.threshold;
        tokio::task::spawn_blocking(move || WhiteKeyRemover::key_out(&image, threshold))
            .await
            .map_err(|err| PipelineError::Task(err.to_string()))?
            .map_err(|err| PipelineError::BackgroundRemoval(err.to_string()))
    }
}

/// Both images of a successfully processed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedImages {
    /// Resized photo, kept for display in the catalog.
    pub original: ImageRef,
    /// Background removed and trimmed; drawn on the canvas.
    pub processed: ImageRef,
}

pub struct UploadPipeline {
    limits: ResizeLimits,
    remover: Arc<dyn BackgroundRemover>,
}

impl std::fmt::Debug for UploadPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadPipeline").field("limits", &self.limits).finish_non_exhaustive()
    }
}

impl UploadPipeline {
    #[must_use]
    pub fn new(limits: ResizeLimits, remover: Arc<dyn BackgroundRemover>) -> Self {
        Self { limits, remover }
    }

    /// Run all stages on an uploaded `data:` URL.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure.
    pub async fn process(&self, source: String) -> Result<ProcessedImages, PipelineError> {
        let limits = self.limits;
        let resized = tokio::task::spawn_blocking(move || imaging::resize_to_fit(&source, limits))
            .await
            .map_err(|err| PipelineError::Task(err.to_string()))?
            .map_err(PipelineError::Resize)?;

        let removed = self.remover.remove_background(&resized).await?;

        let trimmed = tokio::task::spawn_blocking(move || imaging::trim_transparent(&removed))
            .await
            .map_err(|err| PipelineError::Task(err.to_string()))?
            .map_err(PipelineError::Trim)?;

        Ok(ProcessedImages { original: ImageRef::new(resized), processed: ImageRef::new(trimmed) })
    }
}

/// Proof that an upload was started; compare against the tracker on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

/// Generation counter shared between the form and in-flight uploads.
#[derive(Debug, Clone, Default)]
pub struct UploadTracker {
    generation: Arc<AtomicU64>,
}

impl UploadTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new upload, superseding any outstanding ticket.
    #[must_use]
    pub fn begin(&self) -> UploadTicket {
        UploadTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Invalidate every outstanding ticket.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_current(&self, ticket: UploadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }
}
