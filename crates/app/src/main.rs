use dioxus::prelude::*;

mod auth;
mod routes;
mod storage;
use auth::AuthState;
use routes::Route;

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    if let Err(e) = dioxus::logger::init(dioxus::logger::tracing::Level::INFO) {
        eprintln!("[app] logger already initialised: {e}");
    }
    client::config::load_config();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(AuthState::new);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        Router::<Route> {}
    }
}
