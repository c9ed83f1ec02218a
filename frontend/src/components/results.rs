use shared::Verdict;
use yew::prelude::*;

pub fn render_results(verdict: &Verdict) -> Html {
    let theme = verdict.theme;

    html! {
        <div class={classes!("results-container", theme.bg, theme.border)}>
            <div class="result-header">
                <div>
                    <h3>{"AI Analysis Result"}</h3>
                    <p class="result-message">{ verdict.message }</p>
                </div>
                <span class={classes!("result-badge", theme.badge)}>{ verdict.badge }</span>
            </div>

            <div class="confidence-meter">
                <div class="meter-labels">
                    <span class="meter-label">{"Confidence Score"}</span>
                    <span class={theme.text}>{ format!("{}%", verdict.score) }</span>
                </div>
                <div class="meter">
                    <div
                        class={classes!("meter-fill", verdict.status.bar_class())}
                        style={format!("width: {}", verdict.bar_width())}
                    ></div>
                </div>
            </div>

            <p class="result-disclaimer">
                {"Disclaimer: This is a prototype simulation. Not for medical diagnosis."}
            </p>
        </div>
    }
}
