//! Prepare questions for the language model and check the statements it sends back.

use disease_dashboard_configuration::GeneratedSqlPolicy;
use query_engine_metadata::metadata::SchemaMap;
use query_engine_sql::sql;

use super::error::Error;

/// Keywords a read-only statement may start with.
const READ_ONLY_LEADING_KEYWORDS: [&str; 2] = ["SELECT", "WITH"];

/// Keywords that may not appear anywhere in a read-only statement. `INTO` catches
/// `SELECT ... INTO`, which creates a table.
const MODIFYING_KEYWORDS: [&str; 12] = [
    "INSERT", "UPDATE", "DELETE", "DROP", "ALTER", "CREATE", "TRUNCATE", "GRANT", "REVOKE",
    "MERGE", "COPY", "INTO",
];

/// The instructions sent to the language model, with the schema and the question embedded.
pub fn render_prompt(question: &str, schema: &SchemaMap) -> String {
    format!(
        "You translate questions about a disease records database into SQL for PostgreSQL.\n\
         Use only the tables and columns listed below. Quote identifiers with double quotes exactly as written.\n\
         Answer with a single SQL statement and nothing else.\n\
         \n\
         Schema:\n\
         {}\n\
         \n\
         Question: {}",
        schema.render(),
        question
    )
}

/// Clean up a model response into a single line of SQL.
///
/// Code fences are removed, leading whitespace is dropped, semicolons at the end are removed
/// and every newline or tab becomes a space. Whitespace at the end is kept, so
/// "```sql\nSELECT 1;\n```" becomes "SELECT 1 ".
pub fn normalize_generated_sql(raw: &str) -> String {
    let unfenced = strip_code_fences(raw);
    let statement = unfenced.trim_start();

    let body = statement.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    let trailing_whitespace: String = statement[body.len()..]
        .chars()
        .filter(|c| *c != ';')
        .collect();

    format!("{body}{trailing_whitespace}").replace(['\n', '\r', '\t'], " ")
}

/// Normalize a model response and decide whether it may be run.
///
/// The statement is passed on exactly as normalized. The policy only accepts or rejects.
pub fn prepare_generated_sql(raw: &str, policy: GeneratedSqlPolicy) -> Result<sql::string::SQL, Error> {
    let statement = normalize_generated_sql(raw);

    if statement.trim().is_empty() {
        return Err(Error::EmptyStatement);
    }

    match policy {
        GeneratedSqlPolicy::ReadOnly => check_read_only(&statement)?,
        GeneratedSqlPolicy::Unrestricted => {}
    }

    Ok(sql::string::SQL::raw(statement))
}

/// Remove every "```sql" (any case) and "```" marker.
fn strip_code_fences(raw: &str) -> String {
    const FENCE: &str = "```";

    let mut result = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(position) = rest.find(FENCE) {
        result.push_str(&rest[..position]);
        let after_fence = &rest[position + FENCE.len()..];
        rest = match after_fence.get(..3) {
            Some(language) if language.eq_ignore_ascii_case("sql") => &after_fence[3..],
            _ => after_fence,
        };
    }
    result.push_str(rest);
    result
}

fn check_read_only(statement: &str) -> Result<(), Error> {
    if statement.contains(';') {
        return Err(Error::MultipleStatements);
    }

    let mut words = statement
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(str::to_uppercase);

    let leading = words.next().unwrap_or_default();
    if !READ_ONLY_LEADING_KEYWORDS.contains(&leading.as_str()) {
        return Err(Error::NotReadOnly(leading));
    }

    match words.find(|word| MODIFYING_KEYWORDS.contains(&word.as_str())) {
        Some(keyword) => Err(Error::NotReadOnly(keyword)),
        None => Ok(()),
    }
}
