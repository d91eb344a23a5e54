use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone)]
pub(crate) struct Notification {
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) severity: Severity,
}

/// Message boxes waiting to be acknowledged, shown one at a time in order.
#[derive(Default)]
pub(crate) struct NotificationHandler {
    pending: VecDeque<Notification>,
}

impl NotificationHandler {
    pub(crate) fn show_info(&mut self, title: &str, message: &str) {
        self.push(title, message, Severity::Info);
    }

    pub(crate) fn show_warning(&mut self, title: &str, message: &str) {
        self.push(title, message, Severity::Warning);
    }

    fn push(&mut self, title: &str, message: &str, severity: Severity) {
        self.pending.push_back(Notification {
            title: title.to_string(),
            message: message.to_string(),
            severity,
        });
    }

    pub(crate) fn current(&self) -> Option<&Notification> {
        self.pending.front()
    }

    pub(crate) fn acknowledge(&mut self) -> Option<Notification> {
        self.pending.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_shown_in_order() {
        let mut handler = NotificationHandler::default();
        handler.show_warning("Error plotting", "first");
        handler.show_info("Script OK", "second");
        assert_eq!(handler.len(), 2);
        let first = handler.acknowledge().unwrap();
        assert_eq!(first.severity, Severity::Warning);
        assert_eq!(first.message, "first");
        assert_eq!(handler.current().unwrap().title, "Script OK");
        handler.acknowledge();
        assert!(handler.current().is_none());
    }
}
