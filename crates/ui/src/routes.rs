use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{GameView, HowToPlayView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", GameView)] Game {},
        #[route("/how-to-play", HowToPlayView)] HowToPlay {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            header { class: "topbar",
                h1 { "Word Guessing Game" }
                nav {
                    Link { to: Route::Game {}, "Play" }
                    Link { to: Route::HowToPlay {}, "How it works" }
                }
            }
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
