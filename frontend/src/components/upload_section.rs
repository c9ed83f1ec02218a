use super::super::{App, Msg};
use super::utils::extract_image_files;
use shared::Action;
use web_sys::{DragEvent, HtmlInputElement};
use yew::prelude::*;

pub fn render_upload_section(app: &App, ctx: &Context<App>) -> Html {
    let link = ctx.link();

    let handle_change = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        let files = input.files();
        let images = files.as_ref().map(extract_image_files).unwrap_or_default();

        input.set_value("");

        if images.is_empty() {
            log::warn!("No valid image files selected.");
            None
        } else {
            Some(Msg::FilesChosen(images))
        }
    });

    let handle_drag_over = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::Dispatch(Action::DragOver)
    });

    let handle_drag_leave = link.callback(|e: DragEvent| {
        e.prevent_default();
        Msg::Dispatch(Action::DragLeave)
    });

    let handle_drop = link.callback(Msg::HandleDrop);

    html! {
        <div
            id="drop-zone"
            class={classes!("upload-area", app.state.dragging.then_some("drag-over"))}
            ondragover={handle_drag_over}
            ondragleave={handle_drag_leave}
            ondrop={handle_drop}
        >
            <input
                type="file"
                id="file-upload"
                class="file-input-overlay"
                accept="image/*"
                capture="environment"
                onchange={handle_change}
            />
            <div class="upload-placeholder">
                <div class="upload-icon">
                    <i class="fa-solid fa-camera"></i>
                </div>
                <p class="upload-title">{"Upload or Capture Photo"}</p>
                <p class="file-types">{"Drag and drop or click to select"}</p>
            </div>
        </div>
    }
}
