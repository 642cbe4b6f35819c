//! Page-level status: the inline error/info banner plus the toasts raised by
//! page actions. Toast rendering and dismissal belong to the client; pages
//! only record what was raised.

use serde::Serialize;

pub const TOAST_DURATION_MS: u64 = 4200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub duration_ms: u64,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            duration_ms: TOAST_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PageStatus {
    pub error: Option<String>,
    pub info: Option<String>,
    pub toasts: Vec<Toast>,
}

impl PageStatus {
    /// Clears the banners before a new action; pending toasts are kept.
    pub fn begin(&mut self) {
        self.error = None;
        self.info = None;
    }

    /// Error banner without a toast, used for load failures.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Error banner plus an error toast, used for failed mutations.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.toasts.push(Toast::new(ToastKind::Error, message.clone()));
        self.error = Some(message);
    }

    pub fn toast(&mut self, kind: ToastKind, message: impl Into<String>) {
        self.toasts.push(Toast::new(kind, message));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.toast(ToastKind::Warning, message);
    }

    pub fn succeed(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.toast(ToastKind::Success, message.clone());
        self.info = Some(message);
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_sets_banner_and_toast() {
        let mut status = PageStatus::default();
        status.fail("No se pudo crear la cita");

        assert_eq!(status.error.as_deref(), Some("No se pudo crear la cita"));
        assert_eq!(status.toasts.len(), 1);
        assert_eq!(status.toasts[0].kind, ToastKind::Error);
        assert_eq!(status.toasts[0].duration_ms, 4200);
    }

    #[test]
    fn test_begin_keeps_pending_toasts() {
        let mut status = PageStatus::default();
        status.succeed("Guardado");
        status.begin();

        assert!(status.info.is_none());
        assert_eq!(status.take_toasts().len(), 1);
        assert!(status.toasts.is_empty());
    }
}
