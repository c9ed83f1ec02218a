use super::utils::current_year;
use yew::prelude::*;

pub fn render_footer() -> Html {
    html! {
        <footer class="app-footer">
            <p>{ format!("© {} DermaCheck AI. Privacy-first skin analysis.", current_year()) }</p>
            <p class="disclaimer">
                {"Disclaimer: This tool is for educational purposes only and does not provide a medical diagnosis. Always consult a professional for medical concerns."}
            </p>
        </footer>
    }
}
