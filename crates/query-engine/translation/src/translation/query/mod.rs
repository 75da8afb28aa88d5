//! Build the statements behind the dashboard's table and charts.

pub mod filtering;

use serde::{Deserialize, Serialize};

use query_engine_metadata::metadata::DiseaseTable;
use query_engine_sql::sql;

use crate::translation::filters::FilterCriteria;

/// Alias of the grouping column in a chart query.
pub const LABEL_ALIAS: &str = "label";
/// Alias of the row count in a chart query.
pub const TOTAL_ALIAS: &str = "total";

/// A column the dashboard can chart records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartDimension {
    Region,
    Sex,
    Age,
    Diagnosis,
}

impl ChartDimension {
    fn column(self, table: &DiseaseTable) -> &str {
        match self {
            ChartDimension::Region => &table.columns.region,
            ChartDimension::Sex => &table.columns.sex,
            ChartDimension::Age => &table.columns.age,
            ChartDimension::Diagnosis => &table.columns.diagnosis,
        }
    }
}

/// `SELECT * FROM <table> WHERE true [AND <clause>]... LIMIT <n>`.
///
/// All values, including the limit, are bound as parameters.
pub fn build_filtered_query(table: &DiseaseTable, criteria: &FilterCriteria) -> sql::string::SQL {
    let mut select = sql::helpers::star_select(from_disease_table(table));
    select.where_ = sql::ast::Where(filtering::translate_filters(&table.columns, criteria));
    select.limit = sql::ast::Limit {
        limit: Some(sql::ast::Expression::Value(sql::ast::Value::Int8(
            criteria.limit.get(),
        ))),
    };

    tracing::debug!(
        clauses = criteria.clause_count(),
        limit = criteria.limit.get(),
        "built filtered query"
    );

    sql::convert::select_to_sql(&select)
}

/// Count the filtered records per value of `dimension`, largest groups first.
///
/// The row limit does not apply: every group is counted.
pub fn build_chart_query(
    table: &DiseaseTable,
    criteria: &FilterCriteria,
    dimension: ChartDimension,
) -> sql::string::SQL {
    let grouped_column = dimension.column(table);
    let total = sql::helpers::make_column_alias(TOTAL_ALIAS.to_string());

    let mut select = sql::helpers::simple_select(
        vec![
            (
                sql::helpers::make_column_alias(LABEL_ALIAS.to_string()),
                sql::helpers::column(grouped_column),
            ),
            (
                total.clone(),
                sql::ast::Expression::Count(sql::ast::CountType::Star),
            ),
        ],
        from_disease_table(table),
    );
    select.where_ = sql::ast::Where(filtering::translate_filters(&table.columns, criteria));
    select.group_by = sql::ast::GroupBy {
        elements: vec![sql::helpers::column(grouped_column)],
    };
    select.order_by = sql::ast::OrderBy {
        elements: vec![sql::ast::OrderByElement {
            target: sql::ast::Expression::ColumnReference(
                sql::ast::ColumnReference::AliasedColumn(total),
            ),
            direction: sql::ast::OrderByDirection::Desc,
        }],
    };

    tracing::debug!(?dimension, clauses = criteria.clause_count(), "built chart query");

    sql::convert::select_to_sql(&select)
}

fn from_disease_table(table: &DiseaseTable) -> sql::ast::From {
    sql::helpers::from_table(table.schema_name.as_deref(), &table.table_name)
}
