mod cache;
mod print_schema;
mod validate;

use crate::Cli;
use crate::CommandResult;
use cache::CacheCmd;
use libbeacon::BeaconConfig;
use libbeacon::directives::DirectiveRegistry;
use libbeacon::schema::SchemaBuilder;
use print_schema::PrintSchemaCmd;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use validate::ValidateCmd;
use walkdir::WalkDir;

#[derive(Debug, clap::Parser)]
#[command(name = "beacon")]
pub(crate) enum CommandEnum {
    /// Build or clear the cached schema document.
    #[command(subcommand)]
    Cache(CacheCmd),

    /// Print the schema as it looks after every directive manipulated it.
    PrintSchema(Box<PrintSchemaCmd>),

    /// Check that schema files build without errors.
    Validate(Box<ValidateCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Cache(cmd) => cmd.run(cli).await,
            Self::PrintSchema(cmd) => cmd.run(cli).await,
            Self::Validate(cmd) => cmd.run(cli).await,
        }
    }
}

/// Schema files found at or under a set of paths.
#[derive(Debug, Default)]
pub(crate) struct SchemaFiles {
    pub errors: Vec<walkdir::Error>,
    pub file_paths: Vec<PathBuf>,
    pub num_skipped: usize,
}
impl SchemaFiles {
    /// Walks every path, keeping files whose extension is one of
    /// `file_exts`. With no paths, the config's schema path is used.
    pub(crate) fn find(
        paths: &[PathBuf],
        file_exts: &[String],
        config: &BeaconConfig,
    ) -> Self {
        let file_exts: HashSet<&str> =
            file_exts.iter()
                .map(|ext| ext.trim_start_matches('.'))
                .collect();
        let paths = if paths.is_empty() {
            log::debug!(
                "No paths given, using the configured schema path {:#?}.",
                config.schema.path,
            );
            vec![config.schema.path.clone()]
        } else {
            paths.to_vec()
        };

        let mut found = Self::default();
        for path in &paths {
            // A file named explicitly is loaded whatever its extension.
            if path.is_file() {
                found.file_paths.push(path.clone());
                continue;
            }
            for entry in WalkDir::new(path.as_path()).follow_links(true).sort_by_file_name() {
                match entry {
                    Ok(entry) => {
                        let entry_path = entry.path();
                        let matches_ext = entry_path.extension()
                            .map(|ext| ext.to_string_lossy())
                            .is_some_and(|ext| file_exts.contains(ext.as_ref()));
                        if entry.file_type().is_file() && matches_ext {
                            log::trace!("Found schema file at {entry_path:#?}.");
                            found.file_paths.push(entry_path.to_path_buf());
                        } else if entry.file_type().is_file() {
                            log::trace!("Skipping non-schema file: {entry_path:#?}.");
                            found.num_skipped += 1;
                        }
                    },

                    Err(e) => {
                        log::trace!(
                            "Encountered an error while iterating recursive \
                            filesystem entities at/under {path:#?}."
                        );
                        found.errors.push(e);
                    },
                }
            }
        }
        found
    }
}

/// A [`SchemaBuilder`] with every built-in directive and the given files
/// loaded.
pub(crate) fn schema_builder(
    config: &BeaconConfig,
    file_paths: &[PathBuf],
) -> anyhow::Result<SchemaBuilder> {
    let registry = DirectiveRegistry::with_builtins()?;
    let builder = SchemaBuilder::new(Arc::new(registry))
        .with_config(Arc::new(config.clone()))
        .load_files(file_paths.to_vec())?;
    Ok(builder)
}
