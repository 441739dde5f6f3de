use crate::commands::schema_builder;
use crate::commands::SchemaFiles;
use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use libbeacon::schema::SchemaCache;
use std::path::PathBuf;

#[derive(Debug, clap::Subcommand)]
pub(crate) enum CacheCmd {
    /// Build the schema and write it to the configured cache file.
    Build {
        #[arg(
            help="Schema files, or directories containing schema files. \
                  When omitted, the configured `schema.path` is used.",
        )]
        file_or_dir_paths: Vec<PathBuf>,
    },

    /// Delete the configured cache file.
    Clear,
}

#[inherent::inherent]
impl RunnableCommand for CacheCmd {
    pub async fn run(self, cli: Cli) -> CommandResult {
        let config = match cli.load_config() {
            Ok(config) => config,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        };
        let cache = SchemaCache::new(&config.schema.cache.path);

        match self {
            Self::Build { file_or_dir_paths } => {
                let exts = vec!["graphql".to_string(), "graphqls".to_string()];
                let found = SchemaFiles::find(&file_or_dir_paths, &exts, &config);
                if let Some(e) = found.errors.first() {
                    return CommandResult::stderr(format_args!(
                        "{} Failed to read schema paths: {e}",
                        output_utils::RED_X,
                    ));
                }

                // Always rebuild.
                if let Err(e) = cache.clear() {
                    return CommandResult::stderr(format_args!(
                        "{} {e}",
                        output_utils::RED_X,
                    ));
                }
                let result = schema_builder(&config, &found.file_paths)
                    .and_then(|builder| Ok(builder.build_cached(&cache)?));
                match result {
                    Ok(doc) => CommandResult::stdout(format_args!(
                        "{} Cached schema ({} types) at {}",
                        output_utils::GREEN_CHECK,
                        doc.types().len(),
                        cache.path().display(),
                    )),
                    Err(e) => CommandResult::stderr(format_args!(
                        "{} Schema is invalid:\n  {e:#}",
                        output_utils::RED_X,
                    )),
                }
            },

            Self::Clear => match cache.clear() {
                Ok(true) => CommandResult::stdout(format_args!(
                    "{} Removed {}",
                    output_utils::GREEN_CHECK,
                    cache.path().display(),
                )),
                Ok(false) => CommandResult::stdout(format_args!(
                    "{} Nothing to clear at {}",
                    output_utils::GREEN_CHECK,
                    cache.path().display(),
                )),
                Err(e) => CommandResult::stderr(format_args!(
                    "{} {e}",
                    output_utils::RED_X,
                )),
            },
        }
    }
}
