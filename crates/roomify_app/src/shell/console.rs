use std::path::Path;
use std::sync::Mutex;

use roomify_core::{CandidateFile, NavbarView, RouteState, UploadView};
use roomify_engine::{Navigator, Notifier};
use roomify_logging::{roomify_error, roomify_info};

const BAR_WIDTH: usize = 20;

/// Builds a candidate file the way a browser would: display name from the
/// path, media type guessed from the extension.
pub fn candidate_from_path(path: &Path) -> CandidateFile {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    CandidateFile::from_path(name, media_type, path)
}

pub fn render_navbar(navbar: &NavbarView) -> String {
    let mut line = format!("{} | ", navbar.brand);
    if let Some(greeting) = &navbar.greeting {
        line.push_str(greeting);
        line.push(' ');
    }
    line.push_str(&format!("[{}]", navbar.auth_button));
    if navbar.show_get_started {
        line.push_str(" Get Started");
    }
    line
}

pub fn render_upload(view: &UploadView) -> String {
    if let Some(status) = &view.status {
        let filled = usize::from(status.progress) * BAR_WIDTH / 100;
        let mark = if status.complete { "✓" } else { "◻" };
        return format!(
            "{mark} {} [{}{}] {:>3}% {}",
            status.file_name,
            "#".repeat(filled),
            ".".repeat(BAR_WIDTH - filled),
            status.progress,
            status.status_text
        );
    }
    match &view.dropzone {
        Some(dropzone) => {
            let hover = if dropzone.dragging { " (drop to upload)" } else { "" };
            format!("{}{} {}", dropzone.prompt, hover, dropzone.help)
        }
        None => String::new(),
    }
}

/// Stands in for the visualizer route: decodes the handed-off payload and
/// reports what it would render.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    visited: Mutex<Vec<String>>,
}

impl ConsoleNavigator {
    pub fn visited(&self) -> usize {
        self.visited.lock().map(|v| v.len()).unwrap_or(0)
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate(&self, path: &str, state: RouteState) {
        match state.payload.decode_bytes() {
            Ok(bytes) => {
                println!(
                    "→ {path}: {} ({}, {} bytes)",
                    state.file_name,
                    state.payload.media_type(),
                    bytes.len()
                );
                roomify_info!("Visualizer received {}", state.file_name);
            }
            Err(err) => roomify_error!("Visualizer could not decode {}: {}", state.file_name, err),
        }
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(path.to_string());
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn alert(&self, message: &str) {
        eprintln!("! {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomify_core::{update, Msg, UploadState};

    #[test]
    fn media_type_comes_from_extension() {
        let file = candidate_from_path(Path::new("/plans/Ground Floor.JPG"));
        assert_eq!(file.name, "Ground Floor.JPG");
        assert_eq!(file.media_type, "image/jpeg");

        let file = candidate_from_path(Path::new("notes.pdf"));
        assert_eq!(file.media_type, "application/pdf");
    }

    #[test]
    fn progress_bar_scales_with_progress() {
        let (state, _) = update(UploadState::default(), Msg::AuthChanged(true));
        let (state, _) = update(
            state,
            Msg::FilesPicked(vec![CandidateFile::from_bytes(
                "plan.png",
                "image/png",
                vec![1_u8],
            )]),
        );
        let line = render_upload(&state.view());
        assert_eq!(
            line,
            "◻ plan.png [....................]   0% Analyzing Floor Plan..."
        );
    }

    #[test]
    fn signed_out_navbar_offers_log_in() {
        let line = render_navbar(&NavbarView::from_auth(false, None));
        assert_eq!(line, "Roomify | [Log In] Get Started");
        let line = render_navbar(&NavbarView::from_auth(true, Some("ada")));
        assert_eq!(line, "Roomify | Hi,ada [Log Out]");
    }
}
