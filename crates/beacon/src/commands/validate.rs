use crate::commands::schema_builder;
use crate::commands::SchemaFiles;
use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub(crate) struct ValidateCmd {
    #[arg(
        default_value="graphql,graphqls",
        help="The file extensions used to identify schema files.",
        long,
        value_delimiter=',',
    )]
    pub schema_file_exts: Vec<String>,

    #[arg(
        help="Schema files, or directories containing schema files. When \
              omitted, the configured `schema.path` is used.",
    )]
    pub file_or_dir_paths: Vec<PathBuf>,
}

#[inherent::inherent]
impl RunnableCommand for ValidateCmd {
    pub async fn run(self, cli: Cli) -> CommandResult {
        let config = match cli.load_config() {
            Ok(config) => config,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} {e:#}",
                output_utils::RED_X,
            )),
        };

        let found = SchemaFiles::find(
            &self.file_or_dir_paths,
            &self.schema_file_exts,
            &config,
        );
        if !found.errors.is_empty() {
            let errors = found.errors.iter()
                .map(|e| format!("  {e}"))
                .collect::<Vec<_>>()
                .join("\n");
            return CommandResult::stderr(format_args!(
                "{} Failed to read schema paths:\n{errors}",
                output_utils::RED_X,
            ));
        }
        if found.file_paths.is_empty() {
            return CommandResult::stderr(format_args!(
                "{} No schema files found (looking for extensions: {}).",
                output_utils::RED_X,
                self.schema_file_exts.join(", "),
            ));
        }

        let num_files = found.file_paths.len();
        log::info!("Validating {num_files} schema file(s)...");
        let doc = match schema_builder(&config, &found.file_paths)
            .and_then(|builder| Ok(builder.build()?)) {
            Ok(doc) => doc,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} Schema is invalid:\n  {e:#}",
                output_utils::RED_X,
            )),
        };

        let mut summary = vec![format!(
            "{} Schema is valid!",
            output_utils::GREEN_CHECK,
        )];
        summary.push(format!("  Files loaded: {num_files}"));
        if found.num_skipped > 0 {
            summary.push(format!("  Non-schema files skipped: {}", found.num_skipped));
        }
        summary.push(format!("  Types: {}", doc.types().len()));
        summary.push(format!(
            "  Directive definitions: {}",
            doc.directive_definitions().len(),
        ));
        summary.push(format!("  Content hash: {}", doc.content_hash()));
        CommandResult::stdout(format_args!("{}", summary.join("\n")))
    }
}
