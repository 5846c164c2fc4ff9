use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use game_core::model::{LevelTable, Similarity};
use game_core::time::fixed_clock;
use services::{GameService, OracleError, SimilarityOracle};
use tokio::sync::Notify;

use crate::context::{UiApp, build_app_context};
use crate::views::game::GameTestHandles;
use crate::views::{GameView, HowToPlayView};

/// Oracle that answers from a queue; `None` simulates a failed call.
/// A gated oracle holds each reply until the test releases it.
#[derive(Default)]
pub struct QueuedOracle {
    replies: Mutex<VecDeque<Option<f64>>>,
    gate: Option<Arc<Notify>>,
}

impl QueuedOracle {
    pub fn new(replies: impl IntoIterator<Item = Option<f64>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            gate: None,
        })
    }

    pub fn gated(replies: impl IntoIterator<Item = Option<f64>>) -> (Arc<Self>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let oracle = Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            gate: Some(Arc::clone(&gate)),
        });
        (oracle, gate)
    }

    pub fn idle() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl SimilarityOracle for QueuedOracle {
    async fn similarity(
        &self,
        _reference: &str,
        _candidate: &str,
    ) -> Result<Similarity, OracleError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let reply = self.replies.lock().unwrap().pop_front().flatten();
        match reply {
            Some(value) => Ok(Similarity::new(value).unwrap()),
            None => Err(OracleError::Malformed("service unavailable".into())),
        }
    }
}

#[derive(Clone)]
struct TestApp {
    game: Arc<GameService>,
}

impl UiApp for TestApp {
    fn game(&self) -> Arc<GameService> {
        Arc::clone(&self.game)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Game,
    HowToPlay,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    game_handles: Option<GameTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.game_handles.clone() {
        use_context_provider(|| handles);
    }
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Game => rsx! { GameView {} },
        ViewKind::HowToPlay => rsx! { HowToPlayView {} },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub game_handles: Option<GameTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Dispatch an intent through the mounted game view and let it settle.
    pub async fn dispatch(&mut self, intent: crate::vm::GameIntent) {
        self.dispatch_now(intent);
        self.settle().await;
    }

    /// Dispatch an intent without waiting for any spawned work.
    pub fn dispatch_now(&mut self, intent: crate::vm::GameIntent) {
        let handles = self.game_handles.clone().expect("game view mounted");
        self.dom.in_runtime(|| handles.dispatch().call(intent));
    }

    pub async fn settle(&mut self) {
        for _ in 0..4 {
            self.drive_async().await;
        }
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, oracle: Arc<QueuedOracle>) -> ViewHarness {
    setup_view_harness_with_levels(view, oracle, LevelTable::standard())
}

pub fn setup_view_harness_with_levels(
    view: ViewKind,
    oracle: Arc<QueuedOracle>,
    levels: LevelTable,
) -> ViewHarness {
    let game = Arc::new(GameService::new(fixed_clock(), levels, oracle));
    let game_handles = match view {
        ViewKind::Game => Some(GameTestHandles::default()),
        ViewKind::HowToPlay => None,
    };

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app: Arc::new(TestApp { game }),
            view,
            game_handles: game_handles.clone(),
        },
    );

    ViewHarness { dom, game_handles }
}
