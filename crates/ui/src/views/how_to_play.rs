use dioxus::prelude::*;
use dioxus_router::Link;

use game_core::model::WIN_THRESHOLD;

use crate::context::AppContext;
use crate::routes::Route;

#[component]
pub fn HowToPlayView() -> Element {
    let ctx = use_context::<AppContext>();
    let level_count = ctx.game().levels().len();
    let threshold = (WIN_THRESHOLD * 100.0).round();

    rsx! {
        div { class: "page how-to-play",
            h2 { "How it works" }
            ul {
                li { "You are given a sentence for each level." }
                li { "Enter a guess based on the given sentence." }
                li { "The game measures how similar your guess is to the sentence." }
                li { "Reach {threshold}% similarity to clear the level and bank the points." }
                li { "There are {level_count} levels. Keep trying, and good luck!" }
            }
            Link { class: "btn", to: Route::Game {}, "Back to the game" }
        }
    }
}
