use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use roomify_core::{UploadSettings, UploadView};
use roomify_engine::{toggle_auth, AuthAction, AuthContext, IngestionController, LocalAuth};
use roomify_logging::{roomify_info, roomify_warn};

use super::config::{load_config, SettingsFile};
use super::console::{
    candidate_from_path, render_navbar, render_upload, ConsoleNavigator, ConsoleNotifier,
};
use super::logging::{self, LogTarget};

/// Upload floor-plan images and hand them to the visualizer.
#[derive(Debug, Parser)]
#[command(name = "roomify", version)]
pub struct Args {
    /// Images to upload, one session per file.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Settings file (RON). Defaults to ./roomify.ron when present.
    #[arg(long, env = "ROOMIFY_CONFIG")]
    config: Option<PathBuf>,

    /// Name shown in the navbar greeting.
    #[arg(long, env = "ROOMIFY_USER")]
    user: Option<String>,

    /// Do not sign in; shows the upload gate.
    #[arg(long)]
    signed_out: bool,

    /// Progress tick interval in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Progress added per tick.
    #[arg(long)]
    step: Option<u8>,

    /// Delay between 100% and navigation, in milliseconds.
    #[arg(long)]
    redirect_ms: Option<u64>,

    /// Where log output goes. Defaults to the settings file, then stderr.
    #[arg(long, value_enum)]
    log: Option<LogTarget>,

    /// Log at debug level or finer.
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn overrides(&self) -> SettingsFile {
        SettingsFile {
            tick_interval_ms: self.tick_ms,
            progress_step: self.step,
            redirect_delay_ms: self.redirect_ms,
            log_target: self.log,
            ..SettingsFile::default()
        }
    }
}

pub fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref(), args.overrides())?;
    logging::initialize(&config.log.clone().verbose(args.verbose))?;
    if let Some(source) = &config.source {
        roomify_info!("Loaded settings from {:?}", source);
    }
    roomify_info!("Settings: {:?}", config.upload);
    let settings = config.upload;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(run_sessions(args, settings))
}

async fn run_sessions(args: Args, settings: UploadSettings) -> anyhow::Result<()> {
    let auth = Arc::new(LocalAuth::new(args.user.clone()));
    if !args.signed_out && toggle_auth(auth.as_ref()).await == AuthAction::Failed {
        roomify_warn!("Continuing signed out");
    }
    println!("{}", render_navbar(&auth.navbar()));

    let navigator = Arc::new(ConsoleNavigator::default());
    for path in &args.files {
        // Every file gets a freshly mounted upload page, as after a navigation.
        let mut controller =
            IngestionController::new(settings.clone(), auth.clone(), navigator.clone())?
                .with_notifier(Arc::new(ConsoleNotifier))
                .on_complete(|payload| {
                    roomify_info!("Analysis complete, payload is {} chars", payload.as_str().len());
                });

        controller.drag_over();
        show(&mut controller);
        controller.drop_files(vec![candidate_from_path(path)]);
        show(&mut controller);
        while controller.next_event().await {
            show(&mut controller);
        }
        controller.unmount();
    }

    println!(
        "Handed off {} of {} file(s)",
        navigator.visited(),
        args.files.len()
    );
    Ok(())
}

fn show(controller: &mut IngestionController) {
    if controller.consume_dirty() {
        print_view(&controller.view());
    }
}

fn print_view(view: &UploadView) {
    let line = render_upload(view);
    if !line.is_empty() {
        println!("{line}");
    }
}
