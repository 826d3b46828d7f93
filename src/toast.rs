//! Transient advisory notifications ("2 item(s) selected", "Page deleted").

use egui::{Align2, Color32, Context, Id};

pub const TOAST_LIFETIME_MS: f64 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    fn color(self) -> Color32 {
        match self {
            ToastKind::Info => Color32::from_rgb(0x3b, 0x82, 0xf6),
            ToastKind::Success => Color32::from_rgb(0x22, 0xc5, 0x5e),
            ToastKind::Error => Color32::from_rgb(0xef, 0x44, 0x44),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created_at: f64,
}

/// Fixed-lifetime toast queue, drawn as a floating stack.
#[derive(Debug, Default)]
pub struct Toasts {
    items: Vec<Toast>,
}

impl Toasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>, kind: ToastKind, now_ms: f64) {
        self.items.push(Toast {
            message: message.into(),
            kind,
            created_at: now_ms,
        });
    }

    /// Drop expired toasts; call once per frame before showing.
    pub fn retain_live(&mut self, now_ms: f64) {
        self.items
            .retain(|t| now_ms - t.created_at < TOAST_LIFETIME_MS);
    }

    pub fn show(&self, ctx: &Context) {
        if self.items.is_empty() {
            return;
        }
        egui::Area::new(Id::new("toasts"))
            .anchor(Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -16.0))
            .interactable(false)
            .show(ctx, |ui| {
                for toast in &self.items {
                    egui::Frame::popup(ui.style())
                        .fill(toast.kind.color())
                        .show(ui, |ui| {
                            ui.colored_label(Color32::WHITE, &toast.message);
                        });
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toasts_expire_after_their_lifetime() {
        let mut toasts = Toasts::new();
        toasts.push("hello", ToastKind::Info, 0.0);
        toasts.retain_live(1000.0);
        assert_eq!(toasts.items.len(), 1);
        toasts.retain_live(3001.0);
        assert!(toasts.items.is_empty());
    }
}
