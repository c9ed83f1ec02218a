use super::super::{App, Msg};
use super::utils::{extract_image_files, first_non_image};
use crate::api;
use gloo_file::File as GlooFile;
use gloo_file::callbacks::read_as_data_url;
use gloo_timers::callback::Interval;
use shared::{Action, ModelStatus, SelectedImage, Step};
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, DragEvent, FileList};
use yew::prelude::*;

const STATUS_POLL_MS: u32 = 1000;

pub fn handle_action(app: &mut App, ctx: &Context<App>, action: Action) -> bool {
    let step = app.state.apply(action);

    if app.state.model.is_loading() {
        if app.status_poll.is_none() {
            start_status_polling(app, ctx);
        }
    } else if app.status_poll.take().is_some() {
        log::info!("Model status settled, stopped polling");
    }

    match step {
        Step::Unchanged => false,
        Step::Render => true,
        Step::Classify(image) => {
            send_classify_request(ctx, image);
            true
        }
    }
}

pub fn handle_files_chosen(app: &mut App, ctx: &Context<App>, files: Vec<GlooFile>) -> bool {
    let Some(file) = files.into_iter().next() else {
        return false;
    };

    let link = ctx.link().clone();
    let name = file.name();
    // Dropping the reader aborts the read, so it lives on the component.
    app.reader = Some(read_as_data_url(&file, move |result| match result {
        Ok(data_url) => link.send_message(Msg::Dispatch(Action::ImageSelected(
            SelectedImage::new(name, data_url),
        ))),
        Err(e) => log::error!("Failed to read {}: {:?}", name, e),
    }));
    false
}

pub fn handle_drop(ctx: &Context<App>, event: DragEvent) -> bool {
    event.prevent_default();

    if let Some(file_list) = event.data_transfer().and_then(|dt| dt.files()) {
        process_file_list(ctx, &file_list);
    }
    ctx.link().send_message(Msg::Dispatch(Action::DragLeave));
    false
}

pub fn handle_paste(ctx: &Context<App>, event: ClipboardEvent) -> bool {
    if let Some(file_list) = event.clipboard_data().and_then(|dt| dt.files()) {
        if file_list.length() > 0 {
            event.prevent_default();
            process_file_list(ctx, &file_list);
        }
    }
    false
}

pub fn process_file_list(ctx: &Context<App>, file_list: &FileList) {
    let images = extract_image_files(file_list);
    if images.is_empty() {
        if let Some(name) = first_non_image(file_list) {
            ctx.link().send_message(Msg::Dispatch(Action::ImageRejected(name)));
        }
        return;
    }
    ctx.link().send_message(Msg::FilesChosen(images));
}

/// Reads the status once at startup. An unreachable server is not a failed
/// load: the state stays `Loading`, which starts the regular poll.
pub fn fetch_model_status(ctx: &Context<App>) {
    let link = ctx.link().clone();
    spawn_local(async move {
        let status = match api::fetch_model_status().await {
            Ok(status) => status,
            Err(e) => {
                gloo_console::error!(format!("Model status request failed: {}", e));
                ModelStatus::Loading
            }
        };
        link.send_message(Msg::Dispatch(Action::ModelStatusChanged(status)));
    });
}

fn start_status_polling(app: &mut App, ctx: &Context<App>) {
    log::info!("Loading AI model, polling status...");
    let link = ctx.link().clone();
    app.status_poll = Some(Interval::new(STATUS_POLL_MS, move || {
        let link = link.clone();
        spawn_local(async move {
            match api::fetch_model_status().await {
                Ok(status) => link.send_message(Msg::Dispatch(Action::ModelStatusChanged(status))),
                Err(e) => gloo_console::error!(format!("Model status request failed: {}", e)),
            }
        });
    }));
}

fn send_classify_request(ctx: &Context<App>, image: SelectedImage) {
    let link = ctx.link().clone();
    let id = image.id;

    spawn_local(async move {
        let action = match api::classify(image.data_url).await {
            Ok(predictions) => {
                log::info!("Received {} predictions for {}", predictions.len(), image.name);
                Action::AnalysisCompleted(id, predictions)
            }
            Err(e) => Action::AnalysisFailed(id, e),
        };
        link.send_message(Msg::Dispatch(action));
    });
}
