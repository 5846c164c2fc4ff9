use game_core::model::LevelTable;

use super::test_harness::{
    QueuedOracle, ViewKind, setup_view_harness, setup_view_harness_with_levels,
};
use crate::vm::GameIntent;

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_renders_first_level() {
    let mut harness = setup_view_harness(ViewKind::Game, QueuedOracle::idle());
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("Level 1"), "missing level in {html}");
    assert!(html.contains("Happy"), "missing reference in {html}");
    assert!(html.contains("Score: 0"), "missing score in {html}");
    assert!(html.contains("guess-input"), "missing input in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_advances_on_winning_guess() {
    let mut harness = setup_view_harness(ViewKind::Game, QueuedOracle::new([Some(0.97)]));
    harness.rebuild();

    harness
        .dispatch(GameIntent::Submit("Joyful".to_string()))
        .await;
    let html = harness.render();

    assert!(html.contains("Level 2"), "missing next level in {html}");
    assert!(html.contains("Bright sun"), "missing next reference in {html}");
    assert!(html.contains("+97"), "missing score delta in {html}");
    assert!(html.contains("Level 1 cleared"), "missing celebration in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_lists_ranked_attempts() {
    let mut harness = setup_view_harness(
        ViewKind::Game,
        QueuedOracle::new([Some(0.40), Some(0.80)]),
    );
    harness.rebuild();

    harness.dispatch(GameIntent::Submit("sad".to_string())).await;
    harness.dispatch(GameIntent::Submit("glad".to_string())).await;
    let html = harness.render();

    assert!(html.contains("Level 1"), "level changed in {html}");
    let glad = html.find("Glad").expect("glad rendered");
    let sad = html.rfind("Sad").expect("sad rendered");
    assert!(glad < sad, "ranking order wrong in {html}");
    assert!(html.contains("80.00%"), "missing percentage in {html}");
    assert!(html.contains("rgb(255, 204, 0)"), "missing bar colour in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_renders_error_with_retry() {
    let mut harness = setup_view_harness(ViewKind::Game, QueuedOracle::new([None, Some(0.2)]));
    harness.rebuild();

    harness.dispatch(GameIntent::Submit("car".to_string())).await;
    let html = harness.render();
    assert!(html.contains("Please try again"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
    assert!(html.contains("Level 1"), "level changed in {html}");

    harness.dispatch(GameIntent::Retry).await;
    let html = harness.render();
    assert!(!html.contains("Please try again"), "error not cleared in {html}");
    assert!(html.contains("Car"), "missing retried attempt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_shows_single_completion_banner() {
    let levels = LevelTable::from_sentences(["Happy"]).unwrap();
    let mut harness =
        setup_view_harness_with_levels(ViewKind::Game, QueuedOracle::new([Some(0.99)]), levels);
    harness.rebuild();

    harness.dispatch(GameIntent::Submit("glad".to_string())).await;
    let html = harness.render();

    assert!(html.contains("Congratulations"), "missing banner in {html}");
    assert!(html.contains("Your final score is: 99"), "missing final score in {html}");
    assert!(!html.contains("cleared!"), "level celebration also shown in {html}");
    assert!(html.contains("Play again"), "missing restart in {html}");

    harness.dispatch(GameIntent::PlayAgain).await;
    let html = harness.render();
    assert!(html.contains("Level 1"), "new game not started in {html}");
    assert!(html.contains("Score: 0"), "score not reset in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn how_to_play_view_smoke_renders_rules() {
    let mut harness = setup_view_harness(ViewKind::HowToPlay, QueuedOracle::idle());
    harness.rebuild();
    let html = harness.render();

    assert!(html.contains("How it works"), "missing title in {html}");
    assert!(html.contains("95%"), "missing threshold in {html}");
    assert!(html.contains("50 levels"), "missing level count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn game_view_smoke_play_again_discards_in_flight_score() {
    let (oracle, gate) = QueuedOracle::gated([Some(0.97)]);
    let mut harness = setup_view_harness(ViewKind::Game, oracle);
    harness.rebuild();

    harness.dispatch_now(GameIntent::Submit("joyful".to_string()));
    harness.settle().await;
    assert!(harness.render().contains("Scoring your guess"));

    harness.dispatch_now(GameIntent::PlayAgain);
    gate.notify_one();
    harness.settle().await;
    let html = harness.render();

    assert!(html.contains("Level 1"), "fresh game replaced in {html}");
    assert!(html.contains("Happy"), "missing first reference in {html}");
    assert!(html.contains("Score: 0"), "stale score applied in {html}");
    assert!(!html.contains("Bright sun"), "stale level advance in {html}");
    assert!(!html.contains("Scoring your guess"), "still pending in {html}");
}
