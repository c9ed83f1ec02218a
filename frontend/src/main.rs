mod api;
mod components;

use components::footer::render_footer;
use components::handlers;
use components::header::render_header;
use components::model_status::render_model_status;
use components::preview_area::{render_analyze_button, render_preview_area};
use components::upload_section::render_upload_section;
use gloo_events::EventListener;
use gloo_file::File as GlooFile;
use gloo_file::callbacks::FileReader;
use gloo_timers::callback::Interval;
use shared::{Action, UploadState};
use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DragEvent};
use yew::prelude::*;

pub enum Msg {
    Dispatch(Action),
    FilesChosen(Vec<GlooFile>),
    HandleDrop(DragEvent),
    HandlePaste(ClipboardEvent),
}

pub struct App {
    pub state: UploadState,
    reader: Option<FileReader>,
    status_poll: Option<Interval>,
    _paste_listener: Option<EventListener>,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let paste_listener = web_sys::window().map(|window| {
            EventListener::new(&window, "paste", move |event| {
                if let Some(clipboard_event) = event.dyn_ref::<ClipboardEvent>() {
                    link.send_message(Msg::HandlePaste(clipboard_event.clone()));
                }
            })
        });

        handlers::fetch_model_status(ctx);

        Self {
            state: UploadState::new(),
            reader: None,
            status_poll: None,
            _paste_listener: paste_listener,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Dispatch(action) => handlers::handle_action(self, ctx, action),
            Msg::FilesChosen(files) => handlers::handle_files_chosen(self, ctx, files),
            Msg::HandleDrop(event) => handlers::handle_drop(ctx, event),
            Msg::HandlePaste(event) => handlers::handle_paste(ctx, event),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="layout">
                { render_header() }

                <main class="main-content">
                    <div class="upload-card">
                        <div class="card-intro">
                            <h2>{"Skin Lesion Analysis"}</h2>
                            <p class="subtitle">
                                {"Upload or take a photo of the skin patch you want to analyze."}
                            </p>
                            { render_model_status(&self.state.model) }
                        </div>

                        {
                            if self.state.image.is_some() {
                                render_preview_area(self, ctx)
                            } else {
                                render_upload_section(self, ctx)
                            }
                        }

                        <div class="button-container">
                            { render_analyze_button(self, ctx) }
                        </div>

                        <div class="privacy-notice">
                            <i class="fa-solid fa-shield-halved"></i>
                            <p>
                                <span class="privacy-title">{"Privacy Notice:"}</span>
                                {" All analysis happens 100% on your device. Your photos are never sent to a cloud server."}
                            </p>
                        </div>
                    </div>
                </main>

                { render_footer() }
            </div>
        }
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    log::info!("App starting...");
    yew::Renderer::<App>::new().render();
}
