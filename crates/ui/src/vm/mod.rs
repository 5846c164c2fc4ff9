mod attempt_vm;
mod game_vm;
mod time_fmt;

pub use attempt_vm::{AttemptVm, Rgb, attempt_color, render_attempt, render_attempts, title_case};
pub use game_vm::{Celebration, ClearedLevelVm, GameIntent, GameVm, start_game};
