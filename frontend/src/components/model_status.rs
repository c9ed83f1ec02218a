use shared::ModelStatus;
use yew::prelude::*;

pub fn render_model_status(status: &ModelStatus) -> Html {
    match status {
        ModelStatus::Loading => html! {
            <div class="model-loading">
                <i class="fa-solid fa-spinner fa-spin"></i>
                <span>{"Loading AI Model..."}</span>
            </div>
        },
        ModelStatus::Failed { error } => html! {
            <div class="error-message">
                <i class="fa-solid fa-circle-exclamation"></i>
                <p>{ format!("Error loading model: {}", error) }</p>
            </div>
        },
        ModelStatus::Ready { .. } => html! {},
    }
}
