use super::App;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Completed(completion) => {
                let next = self.workspace.complete(completion);
                // A fresh report starts at the top
                self.report_scroll = 0;
                self.submit(next);
            }
            BackendEvent::Crashed { kind, run } => {
                tracing::error!(job = kind.label(), "backend task crashed");
                let detail = format!("The {} task stopped unexpectedly", kind.label());
                let next = self.workspace.fail(kind, &run, &detail);
                self.submit(next);
            }
        }
    }
}
