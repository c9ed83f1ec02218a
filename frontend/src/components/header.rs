use yew::prelude::*;

/// Renders the application header
pub fn render_header() -> Html {
    html! {
        <header class="app-header">
            <div class="brand">
                <i class="fa-solid fa-shield-halved"></i>
                <h1>{"DermaCheck AI"}</h1>
            </div>
            <nav>
                <button class="nav-link">{"About"}</button>
            </nav>
        </header>
    }
}
