//! Headless preview: seed the catalog, lay the newest few dishes out on a
//! fixed-size container, and log the resulting scene as JSON.
//!
//! Usage: `dishboard [PHOTO [WIDTH_CM HEIGHT_CM]]`. With a photo, it is run
//! through the upload pipeline and registered before layout.

use std::sync::Arc;

use canvas::layout::Container;
use canvas::zorder::ZOrderOp;
use dishboard::app::App;
use dishboard::config::Config;
use dishboard::error::ErrorCode;
use dishboard::imaging::DataUrl;
use dishboard::mode::DeviceClass;
use dishboard::pipeline::{UploadPipeline, WhiteKeyRemover};
use tracing_subscriber::EnvFilter;

const PREVIEW_WIDTH_PX: f64 = 1000.0;
const PREVIEW_HEIGHT_PX: f64 = 500.0;
const PREVIEW_DISHES: usize = 3;
const DEFAULT_UPLOAD_SIZE_CM: f64 = 10.0;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(error = %err, "invalid configuration, using defaults");
            Config::default()
        }
    };
    let mut app = App::new(config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(path) = args.first() {
        register_upload(&mut app, path, &args[1..]).await;
    }

    let ids: Vec<_> = app.engine.store.dishes().iter().rev().take(PREVIEW_DISHES).map(|d| d.id).collect();
    for id in &ids {
        app.engine.store.toggle_selection(id);
    }

    app.viewport().publish(Container::sized(PREVIEW_WIDTH_PX, PREVIEW_HEIGHT_PX));
    let session = match app.enter_canvas(DeviceClass::Desktop) {
        Ok(session) => session,
        Err(err) => {
            tracing::warn!(code = err.error_code(), "nothing to preview");
            return;
        }
    };

    for id in &ids {
        app.engine.add_to_canvas(id);
    }
    if let [first, second, ..] = ids.as_slice() {
        app.engine.rotate(second, 15.0);
        app.engine.adjust_scale(second, 0.5);
        app.engine.reorder(first, ZOrderOp::BringToFront);
    }

    match app.engine.scene() {
        Some(scene) => match serde_json::to_string_pretty(&scene) {
            Ok(json) => tracing::info!(mode = session.mode().as_str(), sprites = scene.sprites.len(), "scene\n{json}"),
            Err(err) => tracing::warn!(error = %err, "scene serialization failed"),
        },
        None => tracing::warn!("container not measured"),
    }

    app.leave_canvas(session);
}

async fn register_upload(app: &mut App, path: &str, size_args: &[String]) {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(%path, error = %err, "could not read photo");
            return;
        }
    };
    let mime = image::guess_format(&bytes).map_or("image/png", |format| format.to_mime_type());
    let source = DataUrl { mime: mime.to_owned(), bytes }.encode();

    let pipeline = UploadPipeline::new(app.config.resize, Arc::new(WhiteKeyRemover::default()));
    app.upload_photo(&pipeline, source).await;
    if let Some(message) = app.add_flow.error() {
        tracing::warn!(%path, %message, "upload rejected");
        return;
    }

    let parse = |i: usize| size_args.get(i).and_then(|s| s.parse::<f64>().ok()).unwrap_or(DEFAULT_UPLOAD_SIZE_CM);
    app.add_flow.form.name = std::path::Path::new(path)
        .file_stem()
        .map_or_else(|| path.to_owned(), |stem| stem.to_string_lossy().into_owned());
    app.add_flow.form.width_cm = parse(0);
    app.add_flow.form.height_cm = parse(1);

    match app.submit_dish() {
        Ok(id) => tracing::info!(%id, %path, "photo registered"),
        Err(err) => tracing::warn!(code = err.error_code(), %err, "photo rejected"),
    }
}
