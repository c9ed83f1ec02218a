use super::super::{App, Msg};
use super::results::render_results;
use super::utils::debounce;
use shared::Action;
use yew::prelude::*;

pub fn render_preview_area(app: &App, ctx: &Context<App>) -> Html {
    let Some(image) = &app.state.image else {
        return html! {};
    };

    let link = ctx.link();

    html! {
        <div id="preview-container">
            <div class="preview-frame">
                <img
                    id="actual-image-preview"
                    src={image.data_url.clone()}
                    alt="Skin lesion preview"
                    title={image.name.clone()}
                />
                <button
                    class="remove-btn"
                    title="Remove image"
                    aria-label="Remove image"
                    onclick={link.callback(|_| Msg::Dispatch(Action::Clear))}
                >
                    <i class="fa-solid fa-xmark"></i>
                </button>
            </div>
            { app.state.verdict().map(|verdict| render_results(&verdict)).unwrap_or_default() }
        </div>
    }
}

pub fn render_analyze_button(app: &App, ctx: &Context<App>) -> Html {
    if app.state.image.is_none() {
        return html! {
            <button class="analyze-btn" disabled=true>{"Analyze Image"}</button>
        };
    }

    let link = ctx.link().clone();
    let waiting = app.state.analyzing || app.state.model.is_loading();

    html! {
        <button
            class={classes!("analyze-btn", waiting.then_some("waiting"))}
            onclick={debounce(300, move || link.send_message(Msg::Dispatch(Action::AnalyzeRequested)))}
            disabled={app.state.analyze_disabled()}
        >
            {
                if app.state.analyzing {
                    html! { <><i class="fa-solid fa-spinner fa-spin"></i>{" Analyzing..."}</> }
                } else {
                    html! { {"Analyze Image"} }
                }
            }
        </button>
    }
}
