use std::fmt;

use game_core::model::Attempt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.red, self.green, self.blue)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttemptVm {
    pub guess_label: String,
    pub percent: f64,
    pub percent_label: String,
    pub bar_width: String,
    pub color: Rgb,
}

/// Red-to-green ramp: red stays full up to 50%, then fades while green stays full.
#[must_use]
pub fn attempt_color(percent: f64) -> Rgb {
    let percent = percent.clamp(0.0, 100.0);
    if percent <= 50.0 {
        Rgb {
            red: 255,
            green: ramp_channel(percent),
            blue: 0,
        }
    } else {
        Rgb {
            red: ramp_channel(100.0 - percent),
            green: 255,
            blue: 0,
        }
    }
}

// 5.1 per percentage point, computed as 51/10 so 50% lands exactly on 255.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ramp_channel(percent: f64) -> u8 {
    (percent * 51.0 / 10.0).floor().clamp(0.0, 255.0) as u8
}

/// Upper-case the first letter of every word, lower-case the rest.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

#[must_use]
pub fn render_attempt(attempt: &Attempt) -> AttemptVm {
    let percent = attempt.similarity().percent();
    AttemptVm {
        guess_label: title_case(attempt.guess().as_str()),
        percent,
        percent_label: format!("{percent:.2}%"),
        bar_width: format!("{percent}%"),
        color: attempt_color(percent),
    }
}

#[must_use]
pub fn render_attempts<'a>(attempts: impl IntoIterator<Item = &'a Attempt>) -> Vec<AttemptVm> {
    attempts.into_iter().map(render_attempt).collect()
}
