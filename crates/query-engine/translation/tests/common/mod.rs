use std::fs;
use std::path::PathBuf;

use query_engine_metadata::metadata::DiseaseTable;
use query_engine_sql::sql;
use query_engine_translation::translation::filters::{FilterCriteria, RawFilters};
use query_engine_translation::translation::query::{self, ChartDimension};

/// Translate the filters of a golden file into the filtered query and render it with its
/// parameters.
pub fn test_translation(testname: &str) -> anyhow::Result<String> {
    let criteria = read_criteria(testname)?;
    let statement = query::build_filtered_query(&DiseaseTable::default(), &criteria);
    Ok(render(&statement))
}

/// Translate the filters of a golden file into a chart query and render it with its parameters.
pub fn test_chart_translation(testname: &str, dimension: ChartDimension) -> anyhow::Result<String> {
    let criteria = read_criteria(testname)?;
    let statement = query::build_chart_query(&DiseaseTable::default(), &criteria, dimension);
    Ok(render(&statement))
}

fn read_criteria(testname: &str) -> anyhow::Result<FilterCriteria> {
    let directory = PathBuf::from("tests/goldenfiles").join(testname);
    let request: RawFilters =
        serde_json::from_str(&fs::read_to_string(directory.join("request.json"))?)?;
    Ok(FilterCriteria::from_raw(request))
}

fn render(statement: &sql::string::SQL) -> String {
    let params: Vec<(usize, &sql::string::Param)> = statement
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, p))
        .collect();

    format!("{}\n\n{:?}", statement.sql, params)
}
