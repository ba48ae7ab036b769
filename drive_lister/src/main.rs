//! drive_lister CLI - List files in a Google Drive folder.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use drive_lister::config::{self, DriveConfig};
use drive_lister::{FileMetadata, FolderLister};

/// CLI tool for listing files in a Google Drive folder.
#[derive(Parser)]
#[command(name = "drive_lister")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a service account JSON key file (takes priority over --key).
    #[arg(long, env = "GDRIVE_SERVICE_ACCOUNT_KEY_FILE")]
    key_file: Option<PathBuf>,

    /// Raw service account JSON key.
    #[arg(long, env = config::ENV_SERVICE_ACCOUNT_KEY, hide_env_values = true)]
    key: Option<String>,

    /// Folder ID to list (takes priority over --folder-name).
    #[arg(long, env = config::ENV_TARGET_FOLDER_ID)]
    folder_id: Option<String>,

    /// Name of the folder to list; must match exactly one folder.
    #[arg(long, env = config::ENV_TARGET_FOLDER_NAME)]
    folder_name: Option<String>,

    /// User to impersonate through domain-wide delegation.
    #[arg(long, env = config::ENV_IMPERSONATE_USER)]
    impersonate: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List files in the target folder.
    List {
        /// Only list files with this mime type.
        #[arg(long, short = 'm')]
        mime_type: Option<String>,

        /// Follow continuation tokens instead of stopping after the first page.
        #[arg(long)]
        all: bool,
    },

    /// Show metadata for one file.
    Get {
        /// File ID.
        file_id: String,
    },

    /// Print the id the target folder resolves to.
    ResolveFolder,
}

impl Cli {
    fn drive_config(&self) -> Result<DriveConfig> {
        let key = match (&self.key_file, &self.key) {
            (Some(path), _) => config::read_key_file(path)
                .with_context(|| format!("Failed to load credentials from {:?}", path))?,
            (None, Some(key)) => key.clone(),
            (None, None) => bail!("Provide a service account key with --key-file or --key"),
        };

        let mut drive_config = DriveConfig::new(key);
        drive_config.target_folder_id = self.folder_id.clone();
        drive_config.target_folder_name = self.folder_name.clone();
        drive_config.impersonate_user = self.impersonate.clone();
        Ok(drive_config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let lister = FolderLister::new(&cli.drive_config()?).context("Failed to create client")?;

    match cli.command {
        Commands::List { mime_type, all } => {
            let mime_type = mime_type.as_deref();
            let files = if all {
                lister.list_all_files(mime_type).await
            } else {
                lister.list_files(mime_type).await
            }
            .context("Failed to list files")?;

            print_files(&files);
        }

        Commands::Get { file_id } => {
            let file = lister
                .get_file(&file_id)
                .await
                .with_context(|| format!("Failed to get file: {}", file_id))?;

            println!("ID:       {}", file.id);
            println!("Name:     {}", file.name);
            println!("Type:     {}", file.mime_type.as_deref().unwrap_or("-"));
            println!(
                "Size:     {}",
                file.size
                    .map(drive_lister::models::format_size)
                    .unwrap_or_else(|| "-".to_string())
            );
            if let Some(created) = file.created_time {
                println!("Created:  {}", created.to_rfc3339());
            }
            if let Some(modified) = file.modified_time {
                println!("Modified: {}", modified.to_rfc3339());
            }
            if let Some(parents) = file.parents.filter(|p| !p.is_empty()) {
                println!("Parents:  {}", parents.join(", "));
            }
        }

        Commands::ResolveFolder => {
            let folder_id = lister
                .resolve_folder_id()
                .await
                .context("Failed to resolve target folder")?;
            println!("{}", folder_id);
        }
    }

    Ok(())
}

fn print_files(files: &[FileMetadata]) {
    if files.is_empty() {
        println!("No files found.");
        return;
    }

    println!("{:<44} {:>10} {:<30} {}", "ID", "SIZE", "TYPE", "NAME");
    println!("{}", "-".repeat(100));
    for file in files {
        println!("{}", file);
    }
}
