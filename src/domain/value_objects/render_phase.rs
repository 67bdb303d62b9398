//! Two-phase rendering for markup that must not differ between a server
//! render and the first client paint.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderPhase {
    /// Environment independent; every first render uses this phase.
    #[default]
    Initial,
    Ready,
}

impl RenderPhase {
    /// The explicit client-side transition after first paint.
    pub fn mount(self) -> Self {
        RenderPhase::Ready
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationSafePlayer {
    src: String,
}

impl HydrationSafePlayer {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into() }
    }

    pub fn render(&self, phase: RenderPhase) -> String {
        let src = escape_attribute(&self.src);
        match phase {
            RenderPhase::Initial => format!(
                r#"<div class="video-player video-player--placeholder" data-src="{}" aria-busy="true"></div>"#,
                src
            ),
            RenderPhase::Ready => format!(
                r#"<video class="video-player" src="{}" controls preload="metadata"></video>"#,
                src
            ),
        }
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
