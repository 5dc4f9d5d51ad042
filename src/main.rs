use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn, Instrument};

use profile_editor::app_system::{setup_tracing, ProfileSystem};
use profile_editor::clock::SystemClock;
use profile_editor::config::{EditorConfig, ServiceConfig};
use profile_editor::domain::{UserId, DEFAULT_COOLDOWN_HOURS};
use profile_editor::editor::ProfileEditor;
use profile_editor::store::{InMemoryProfileStore, JsonFileProfileStore, ProfileStore};

/// Renames a user's display name through the full validation, cooldown and
/// persistence path.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// New display name to submit
    #[arg(long)]
    name: String,

    /// Existing user to rename; a new profile is created when omitted
    #[arg(long)]
    user_id: Option<String>,

    /// Directory of JSON profiles; profiles live in memory when omitted
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Hours that must pass between two renames
    #[arg(long, default_value_t = DEFAULT_COOLDOWN_HOURS)]
    cooldown_hours: i64,

    /// Give up on a store call after this many milliseconds
    #[arg(long, default_value_t = 5000)]
    store_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let args = Args::parse();

    let store: Arc<dyn ProfileStore> = match &args.data_dir {
        Some(dir) => Arc::new(
            JsonFileProfileStore::open(dir)
                .await
                .with_context(|| format!("opening profile directory {}", dir.display()))?,
        ),
        None => Arc::new(InMemoryProfileStore::new()),
    };
    let cooldown = chrono::Duration::try_hours(args.cooldown_hours)
        .context("cooldown hours out of range")?;
    let config = ServiceConfig::default()
        .with_cooldown(cooldown)
        .with_store_timeout(Duration::from_millis(args.store_timeout_ms));
    let system = ProfileSystem::new(store, Arc::new(SystemClock), config);

    let client = match &args.user_id {
        Some(id) => system
            .open(&UserId::new(id.as_str()))
            .await
            .with_context(|| format!("opening profile {}", id))?,
        None => system
            .create_profile("New User")
            .await
            .context("creating profile")?,
    };

    let mut editor = ProfileEditor::new(client, EditorConfig::default());
    let span = tracing::info_span!("edit_profile");
    async {
        let profile = editor.load().await?;
        info!(display_name = %profile.display_name(), "Profile loaded");
        if let Some(user_id) = editor.copy_user_id() {
            info!(user_id = %user_id, "User id ready to copy");
        }

        let validation = editor.set_draft(&args.name);
        if let Some(kind) = validation.error_kind() {
            warn!(error = %kind, "Draft rejected");
            return Ok(());
        }
        if !editor.can_submit() {
            info!("Display name unchanged");
            return Ok(());
        }

        match editor.submit().await {
            Ok(profile) => info!(display_name = %profile.display_name(), "Display name saved"),
            Err(e) => error!(error = %e, retryable = e.is_retryable(), "Display name not saved"),
        }

        let status = editor.cooldown_status().await?;
        info!(
            can_change_name = status.can_change_name,
            remaining_hours = status.remaining_hours,
            "Rename cooldown"
        );
        Ok::<_, profile_editor::error::ProfileError>(())
    }
    .instrument(span)
    .await?;

    drop(editor);
    system.shutdown().await?;
    info!("Done");
    Ok(())
}
