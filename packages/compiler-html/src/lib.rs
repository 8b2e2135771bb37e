//! Email HTML renderer.
//!
//! Turns a block tree plus global email styles into table-based HTML that
//! survives desktop, web and mobile mail clients, including Outlook's Word
//! engine.

mod compiler;
mod css;
mod media;
mod render;

#[cfg(test)]
mod tests;

pub use compiler::{compile_email, compile_to_html, RenderOptions};
pub use media::{social_icon_url, video_thumbnail};
