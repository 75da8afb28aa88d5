//! The CLI can do a few things. This provides a central point where those things are routed and
//! then done, making it easier to test this crate deterministically.

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

use disease_dashboard_configuration::environment::Environment;
use disease_dashboard_configuration::{
    make_runtime_configuration, parse_configuration, write_parsed_configuration, Configuration,
    ParsedConfiguration,
};
use query_engine_execution::completion::{ChatCompletionClient, CompletionService};
use query_engine_execution::connection::Connector;
use query_engine_execution::introspection::introspect_schema;
use query_engine_execution::natural_language::{translate_and_run, Translated};
use query_engine_execution::postgres::PostgresConnector;
use query_engine_execution::result_set::Row;

/// The various contextual bits and bobs we need to run.
pub struct Context<Env: Environment> {
    pub context_path: PathBuf,
    pub environment: Env,
}

/// The command invoked by the user.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Initialize a configuration in the current (empty) directory.
    Initialize {
        /// Overwrite an existing configuration.
        #[arg(long)]
        force: bool,
    },
    /// Print the tables and columns visible to the language model.
    Introspect {
        /// Schema owner to describe instead of the configured one.
        #[arg(long)]
        owner: Option<String>,
    },
    /// Answer a question in natural language and print the result as JSON.
    Ask {
        question: String,
    },
}

/// Run a command in a given directory.
pub async fn run(command: Command, context: Context<impl Environment>) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match command {
        Command::Initialize { force } => initialize(force, &context).await?,
        Command::Introspect { owner } => {
            let configuration = load_configuration(&context).await?;
            let connector = PostgresConnector::new(&configuration.connection)?;
            introspect(&configuration, &connector, owner, &mut stdout).await?;
        }
        Command::Ask { question } => {
            let configuration = load_configuration(&context).await?;
            let connector = PostgresConnector::new(&configuration.connection)?;
            let completion = ChatCompletionClient::new(&configuration.generation)?;
            ask(&configuration, &connector, &completion, &question, &mut stdout).await?;
        }
    };
    Ok(())
}

/// Initialize an empty directory with an initial configuration and its JSON schema.
///
/// A directory that already holds files is left alone unless `force` is set.
pub async fn initialize(force: bool, context: &Context<impl Environment>) -> anyhow::Result<()> {
    let has_files = match std::fs::read_dir(&context.context_path) {
        Ok(mut entries) => entries.next().is_some(),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
        Err(err) => return Err(err.into()),
    };
    if has_files && !force {
        anyhow::bail!(
            "the directory {} is not empty, pass --force to overwrite",
            context.context_path.display()
        );
    }

    write_parsed_configuration(ParsedConfiguration::initial(), &context.context_path).await?;
    tracing::info!(path = %context.context_path.display(), "initialized configuration");
    Ok(())
}

/// Read the configuration in the context directory and resolve its secrets.
pub async fn load_configuration(
    context: &Context<impl Environment>,
) -> anyhow::Result<Configuration> {
    let parsed_configuration = parse_configuration(&context.context_path).await?;
    Ok(make_runtime_configuration(
        parsed_configuration,
        &context.environment,
    )?)
}

/// Print the schema of `owner`, or of the configured owner, one table per line.
pub async fn introspect(
    configuration: &Configuration,
    connector: &dyn Connector,
    owner: Option<String>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let owner = owner.unwrap_or_else(|| configuration.introspection_owner.clone());
    let connection = connector.acquire().await?;
    let schema = introspect_schema(&owner, connection).await;

    if schema.is_empty() {
        tracing::warn!(%owner, "no tables found");
        return Ok(());
    }
    writeln!(out, "{}", schema.render())?;
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Answer {
    generated_sql: String,
    columns: Vec<String>,
    rows: Vec<Row>,
    error: Option<String>,
}

/// Answer `question` and print the generated statement with its rows.
///
/// Only failing to generate a statement is an error. A statement the database rejects is
/// reported in the printed `error` field.
pub async fn ask(
    configuration: &Configuration,
    connector: &dyn Connector,
    completion: &dyn CompletionService,
    question: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let schema = introspect_schema(
        &configuration.introspection_owner,
        connector.acquire().await?,
    )
    .await;

    let Translated {
        generated_sql,
        result,
    } = translate_and_run(
        question,
        &schema,
        connector,
        completion,
        configuration.generation.policy,
    )
    .await?;

    let answer = match result {
        Ok(result_set) => Answer {
            generated_sql: generated_sql.sql,
            columns: result_set.columns,
            rows: result_set.rows,
            error: None,
        },
        Err(err) => Answer {
            generated_sql: generated_sql.sql,
            columns: vec![],
            rows: vec![],
            error: Some(err.to_string()),
        },
    };

    serde_json::to_writer_pretty(&mut *out, &answer)?;
    writeln!(out)?;
    Ok(())
}
