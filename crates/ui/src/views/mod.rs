mod game;
mod how_to_play;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use game::GameView;
pub use how_to_play::HowToPlayView;
pub use state::ViewError;
