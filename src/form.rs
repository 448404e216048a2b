//! Add-dish form: draft state, validation, and upload bookkeeping.

use canvas::store::{DishId, DishStore, ImageRef, NewDish};

use crate::error::ErrorCode;
use crate::pipeline::{PipelineError, ProcessedImages, UploadTicket, UploadTracker};

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum ValidationError {
    #[error("name is empty")]
    MissingName,
    #[error("images not uploaded")]
    MissingImages,
    #[error("dimensions must exceed {min_cm} cm")]
    SizeTooSmall { min_cm: f64 },
    #[error("upload still processing")]
    StillProcessing,
}

impl ErrorCode for ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingName => "E_MISSING_NAME",
            Self::MissingImages => "E_MISSING_IMAGES",
            Self::SizeTooSmall { .. } => "E_SIZE_TOO_SMALL",
            Self::StillProcessing => "E_STILL_PROCESSING",
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::MissingName => "器の名前を入力してください".to_owned(),
            Self::MissingImages => "画像をアップロードしてください".to_owned(),
            Self::SizeTooSmall { min_cm } => format!("サイズは{min_cm}より大きい値を入力してください"),
            Self::StillProcessing => "画像を処理しています".to_owned(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::StillProcessing)
    }
}

/// Draft of a dish being registered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDishForm {
    pub name: String,
    pub width_cm: f64,
    pub height_cm: f64,
    pub original_image: Option<ImageRef>,
    pub processed_image: Option<ImageRef>,
}

impl NewDishForm {
    /// Check the draft and produce a store-ready record.
    ///
    /// Rules are checked in order: name, images, then both dimensions
    /// strictly greater than `min_dimension_cm`. The name is trimmed.
    ///
    /// # Errors
    ///
    /// Returns the first rule that fails.
    pub fn validate(&self, min_dimension_cm: f64) -> Result<NewDish, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let (Some(original), Some(processed)) = (&self.original_image, &self.processed_image) else {
            return Err(ValidationError::MissingImages);
        };
        let too_small = |v: f64| !v.is_finite() || v <= min_dimension_cm;
        if too_small(self.width_cm) || too_small(self.height_cm) {
            return Err(ValidationError::SizeTooSmall { min_cm: min_dimension_cm });
        }
        Ok(NewDish {
            name: name.to_owned(),
            width_cm: self.width_cm,
            height_cm: self.height_cm,
            original_image: original.clone(),
            processed_image: processed.clone(),
        })
    }
}

/// Add-dish screen state: the draft plus upload progress and the inline error.
#[derive(Debug, Clone, Default)]
pub struct AddDishFlow {
    pub form: NewDishForm,
    processing: bool,
    error: Option<String>,
    tracker: UploadTracker,
}

impl AddDishFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Inline message for the last failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Handle for in-flight work that needs to check staleness itself.
    #[must_use]
    pub fn tracker(&self) -> UploadTracker {
        self.tracker.clone()
    }

    /// A new photo was picked. Clears previous images and the error.
    #[must_use]
    pub fn start_upload(&mut self) -> UploadTicket {
        self.processing = true;
        self.error = None;
        self.form.original_image = None;
        self.form.processed_image = None;
        self.tracker.begin()
    }

    /// Apply a pipeline result. Returns false when the ticket is stale and the
    /// result was dropped.
    pub fn finish_upload(&mut self, ticket: UploadTicket, result: Result<ProcessedImages, PipelineError>) -> bool {
        if !self.tracker.is_current(ticket) {
            tracing::info!(?ticket, "dropping stale upload result");
            return false;
        }
        self.processing = false;
        match result {
            Ok(images) => {
                self.form.original_image = Some(images.original);
                self.form.processed_image = Some(images.processed);
            }
            Err(err) => {
                tracing::warn!(error = %err, code = err.error_code(), "upload failed");
                self.error = Some(err.user_message());
            }
        }
        true
    }

    /// Leave the screen: outstanding uploads become stale and the draft resets.
    pub fn cancel(&mut self) {
        self.tracker.cancel();
        self.processing = false;
        self.error = None;
        self.form = NewDishForm::default();
    }

    /// Validate and register the draft. On success the draft resets.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; the store is left untouched and the
    /// inline error is set.
    pub fn submit(&mut self, store: &mut DishStore, min_dimension_cm: f64) -> Result<DishId, ValidationError> {
        let validated = if self.processing {
            Err(ValidationError::StillProcessing)
        } else {
            self.form.validate(min_dimension_cm)
        };
        match validated {
            Ok(dish) => {
                let id = store.add_dish(dish);
                tracing::info!(%id, "dish registered");
                self.form = NewDishForm::default();
                self.error = None;
                Ok(id)
            }
            Err(err) => {
                tracing::debug!(code = err.error_code(), "dish rejected");
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }
}
