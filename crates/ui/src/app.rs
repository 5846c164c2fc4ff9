use dioxus::prelude::*;
use dioxus_router::Router;

use crate::routes::Route;

const WINDOW_TITLE: &str = "Semantic Similarity Game";

#[component]
pub fn App() -> Element {
    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }
        document::Title { "{WINDOW_TITLE}" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    FatalError { details: format!("{errors:?}") }
                },
                Router::<Route> {}
            }
        }
    }
}

/// Last-resort screen when a view fails to render.
#[component]
fn FatalError(details: String) -> Element {
    rsx! {
        div { class: "fatal", role: "alert",
            h1 { "The game stopped unexpectedly" }
            p { "Restart the application to begin a new game." }
            details {
                summary { "Details" }
                pre { "{details}" }
            }
        }
    }
}
