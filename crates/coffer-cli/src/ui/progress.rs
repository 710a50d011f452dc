//! Spinner for slow steps such as RSA key generation.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use super::context::UiContext;
use super::render::badge;
use super::theme::Badge;

// The last frame is shown once the spinner finishes.
const UNICODE_FRAMES: &[&str] = &[
    "\u{280B}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{283C}", "\u{2834}", "\u{2826}",
    "\u{2827}", "\u{2807}", "\u{280F}", "\u{2713}",
];
const ASCII_FRAMES: &[&str] = &["|", "/", "-", "\\", "+"];

/// Spinner drawn on stderr; inert when the terminal cannot animate.
pub struct Spinner<'a> {
    ctx: &'a UiContext,
    bar: Option<ProgressBar>,
}

impl<'a> Spinner<'a> {
    pub fn start(ctx: &'a UiContext, message: &str) -> Self {
        let bar = ctx.animate.then(|| {
            let bar = ProgressBar::new_spinner();
            let frames = if ctx.unicode {
                UNICODE_FRAMES
            } else {
                ASCII_FRAMES
            };
            bar.set_style(
                ProgressStyle::default_spinner()
                    .tick_strings(frames)
                    .template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_message(message.to_string());
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Self { ctx, bar }
    }

    /// Stop and leave a badge line behind.
    pub fn finish(self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
            eprintln!("{}", badge(self.ctx, Badge::Ok, message));
        }
    }

    pub fn clear(self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
