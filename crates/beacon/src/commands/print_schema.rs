use crate::commands::schema_builder;
use crate::commands::SchemaFiles;
use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use libbeacon::document::SchemaPrinter;
use std::path::PathBuf;

#[derive(Debug, clap::Args)]
pub(crate) struct PrintSchemaCmd {
    #[arg(
        help="Leave directive definitions and usages out of the output.",
        long,
    )]
    pub without_directives: bool,

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
impl RunnableCommand for PrintSchemaCmd {
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
        if let Some(e) = found.errors.first() {
            return CommandResult::stderr(format_args!(
                "{} Failed to read schema paths: {e}",
                output_utils::RED_X,
            ));
        }

        let doc = match schema_builder(&config, &found.file_paths)
            .and_then(|builder| Ok(builder.build()?)) {
            Ok(doc) => doc,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} Schema is invalid:\n  {e:#}",
                output_utils::RED_X,
            )),
        };

        let printer = if self.without_directives {
            SchemaPrinter::new().without_directives()
        } else {
            SchemaPrinter::new()
        };
        CommandResult::stdout(format_args!("{}", printer.print(&doc)))
    }
}
