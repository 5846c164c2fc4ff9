use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::ViewError;
use crate::vm::{AttemptVm, Celebration, ClearedLevelVm, GameIntent, start_game};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn GameView() -> Element {
    let ctx = use_context::<AppContext>();
    let game = ctx.game();

    let mut start_error = None;
    let vm = use_signal(|| match start_game(&game) {
        Ok(vm) => Some(vm),
        Err(err) => {
            start_error = Some(err);
            None
        }
    });
    let error = use_signal(|| start_error);
    let pending = use_signal(|| false);
    // Bumped by "Play again"; a scoring task started under an older game drops its result.
    let game_generation = use_signal(|| 0_u64);
    let mut guess_text = use_signal(String::new);

    let dispatch_intent = {
        let game = game.clone();
        use_callback(move |intent: GameIntent| {
            let mut error = error;
            let mut vm = vm;
            let mut pending = pending;
            let mut game_generation = game_generation;

            if intent == GameIntent::PlayAgain {
                match start_game(&game) {
                    Ok(fresh) => {
                        game_generation += 1;
                        vm.set(Some(fresh));
                        pending.set(false);
                        error.set(None);
                    }
                    Err(err) => error.set(Some(err)),
                }
                return;
            }

            // One scoring request at a time.
            if pending() {
                return;
            }
            pending.set(true);

            let game = game.clone();
            let started_in = game_generation();
            spawn(async move {
                // Score a copy so the board stays on screen while the request is in flight.
                let working = vm();
                let Some(mut working) = working else {
                    error.set(Some(ViewError::Unknown));
                    pending.set(false);
                    return;
                };

                let result = match intent {
                    GameIntent::Submit(text) => working.submit(&game, &text).await,
                    GameIntent::Retry | GameIntent::PlayAgain => working.retry(&game).await,
                };

                if game_generation() != started_in {
                    return;
                }
                vm.set(Some(working));
                pending.set(false);
                error.set(result.err());
            });
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<GameTestHandles>() {
                handles.register(dispatch_intent);
            }
        }
    }

    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let text = guess_text();
        guess_text.set(String::new());
        dispatch_intent.call(GameIntent::Submit(text));
    };

    let vm_guard = vm.read();
    let Some(game_vm) = vm_guard.as_ref() else {
        let message = error().unwrap_or(ViewError::Unknown).message();
        return rsx! {
            div { class: "page game-page",
                p { class: "game-error", "{message}" }
            }
        };
    };

    let is_pending = pending();
    let current_error = error();
    let complete = game_vm.is_complete();
    let level_label = game_vm.level_label();
    let progress_label = game_vm.progress_label();
    let reference = game_vm.reference().map(str::to_string);
    let score = game_vm.score();
    let delta = game_vm.score_delta_label();
    let celebration = game_vm.celebration();
    let has_pending_guess = game_vm.pending_guess().is_some();
    let latest = game_vm.latest_attempt();
    let ranked = game_vm.ranked_attempts();
    let cleared = game_vm.cleared_levels();
    drop(vm_guard);

    rsx! {
        div { class: "page game-page",
            if complete {
                CompletionBanner {
                    score,
                    cleared,
                    on_play_again: move |()| dispatch_intent.call(GameIntent::PlayAgain),
                }
            } else {
                header { class: "game-header",
                    h2 { class: "game-level", "{level_label}" }
                    span { class: "game-progress", "{progress_label}" }
                }
                ScoreMetric { score, delta }
                if let Some(reference) = reference {
                    p { class: "game-reference", id: "game-reference", "{reference}" }
                }
                if let Some(celebration) = celebration {
                    CelebrationBanner { celebration }
                }

                h3 { "Submit Your Guess" }
                form { class: "guess-form", onsubmit: on_submit,
                    input {
                        class: "guess-input",
                        id: "guess-input",
                        r#type: "text",
                        placeholder: "Please enter your guess below",
                        autofocus: true,
                        disabled: is_pending,
                        value: "{guess_text}",
                        oninput: move |evt: FormEvent| guess_text.set(evt.value()),
                    }
                    button {
                        class: "btn",
                        id: "guess-submit",
                        r#type: "submit",
                        disabled: is_pending,
                        "Guess"
                    }
                }

                if is_pending {
                    p { class: "game-pending", "Scoring your guess..." }
                }
                if let Some(err) = current_error {
                    div { class: "game-error", role: "alert",
                        p { "{err.message()}" }
                        if err.is_retryable() && has_pending_guess {
                            button {
                                class: "btn btn-secondary",
                                id: "guess-retry",
                                r#type: "button",
                                disabled: is_pending,
                                onclick: move |_| dispatch_intent.call(GameIntent::Retry),
                                "Retry"
                            }
                        }
                    }
                }

                if let Some(latest) = latest {
                    hr {}
                    AttemptCard { attempt: latest, highlight: true }
                    hr {}
                    ul { class: "attempt-list",
                        for (index, attempt) in ranked.into_iter().enumerate() {
                            li { key: "{index}",
                                AttemptCard { attempt, highlight: false }
                            }
                        }
                    }
                }
                p { class: "game-score-footer", "Score: {score}" }
            }
        }
    }
}

#[component]
fn ScoreMetric(score: u32, delta: Option<String>) -> Element {
    rsx! {
        div { class: "metric",
            span { class: "metric__label", "Score" }
            span { class: "metric__value", "{score}" }
            if let Some(delta) = delta {
                span { class: "metric__delta", "{delta}" }
            }
        }
    }
}

#[component]
fn CelebrationBanner(celebration: Celebration) -> Element {
    rsx! {
        div { class: "celebration", role: "status",
            "🎉 Level {celebration.cleared_level} cleared! +{celebration.points} points"
        }
    }
}

#[component]
fn AttemptCard(attempt: AttemptVm, highlight: bool) -> Element {
    let class = if highlight {
        "attempt-card attempt-card--latest"
    } else {
        "attempt-card"
    };
    rsx! {
        div { class: "{class}",
            strong { "{attempt.guess_label}" }
            div { class: "attempt-bar",
                div {
                    class: "attempt-bar__fill",
                    style: "width: {attempt.bar_width}; background-color: {attempt.color};",
                    "{attempt.percent_label}"
                }
            }
        }
    }
}

#[component]
fn CompletionBanner(
    score: u32,
    cleared: Vec<ClearedLevelVm>,
    on_play_again: EventHandler<()>,
) -> Element {
    rsx! {
        div { class: "completion", role: "status",
            h2 { "🎉 Congratulations! You've completed the game." }
            p { class: "completion__score", "🏆 Your final score is: {score}" }
            if !cleared.is_empty() {
                table { class: "completion__levels",
                    thead {
                        tr {
                            th { "Level" }
                            th { "Winning guess" }
                            th { "Points" }
                            th { "Tries" }
                            th { "Cleared at" }
                        }
                    }
                    tbody {
                        for row in cleared {
                            tr { key: "{row.level_label}",
                                td { "{row.level_label}" }
                                td { "{row.guess_label}" }
                                td { "{row.points_label}" }
                                td { "{row.attempts_label}" }
                                td { "{row.completed_at_str}" }
                            }
                        }
                    }
                }
            }
            button {
                class: "btn",
                id: "play-again",
                r#type: "button",
                onclick: move |_| on_play_again.call(()),
                "Play again"
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct GameTestHandles {
    dispatch: Rc<RefCell<Option<Callback<GameIntent>>>>,
}

#[cfg(test)]
impl GameTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<GameIntent>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
    }

    pub(crate) fn dispatch(&self) -> Callback<GameIntent> {
        (*self.dispatch.borrow()).expect("game dispatch registered")
    }
}
