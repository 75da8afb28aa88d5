//! Translate filter criteria into a boolean expression.

use query_engine_metadata::metadata::DiseaseColumns;
use query_engine_sql::sql;

use crate::translation::filters::{FilterCriteria, SanitizedToken};

/// Conjunction of one clause per present filter, starting from `true`.
///
/// Clause order is fixed (region, sex, minimum age, maximum age, diagnosis) so the same
/// criteria always produce the same placeholders.
pub fn translate_filters(columns: &DiseaseColumns, criteria: &FilterCriteria) -> sql::ast::Expression {
    [
        region_clause(&columns.region, &criteria.regions),
        criteria
            .sex
            .map(|sex| compare(&columns.sex, sql::ast::BinaryOperator::Equals, sex)),
        criteria.min_age.map(|min_age| {
            compare(
                &columns.age,
                sql::ast::BinaryOperator::GreaterThanOrEqualTo,
                min_age,
            )
        }),
        criteria.max_age.map(|max_age| {
            compare(
                &columns.age,
                sql::ast::BinaryOperator::LessThanOrEqualTo,
                max_age,
            )
        }),
        diagnosis_clause(&columns.diagnosis, &criteria.diagnoses),
    ]
    .into_iter()
    .flatten()
    .fold(sql::helpers::true_expr(), sql::helpers::and)
}

/// `UPPER(column) IN (...)`, comparing against upper-cased values.
fn region_clause(column: &str, regions: &[SanitizedToken]) -> Option<sql::ast::Expression> {
    if regions.is_empty() {
        return None;
    }
    Some(sql::ast::Expression::BinaryArrayOperation {
        left: Box::new(sql::helpers::upper(sql::helpers::column(column))),
        operator: sql::ast::BinaryArrayOperator::In,
        right: regions
            .iter()
            .map(|region| {
                sql::ast::Expression::Value(sql::ast::Value::String(
                    region.as_str().to_uppercase(),
                ))
            })
            .collect(),
    })
}

/// Any of the diagnoses, each matched as a case-insensitive substring.
fn diagnosis_clause(column: &str, diagnoses: &[SanitizedToken]) -> Option<sql::ast::Expression> {
    if diagnoses.is_empty() {
        return None;
    }
    Some(sql::helpers::disjunction(diagnoses.iter().map(|diagnosis| {
        sql::ast::Expression::BinaryOperation {
            left: Box::new(sql::helpers::column(column)),
            operator: sql::ast::BinaryOperator::CaseInsensitiveLike,
            right: Box::new(sql::ast::Expression::Value(sql::ast::Value::String(
                format!("%{}%", diagnosis.as_str()),
            ))),
        }
    })))
}

fn compare(column: &str, operator: sql::ast::BinaryOperator, value: i64) -> sql::ast::Expression {
    sql::ast::Expression::BinaryOperation {
        left: Box::new(sql::helpers::column(column)),
        operator,
        right: Box::new(sql::ast::Expression::Value(sql::ast::Value::Int8(value))),
    }
}
