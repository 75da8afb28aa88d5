//! Helpers for building sql::ast types in certain shapes and patterns.

use super::ast::*;

// Empty clauses //

/// An empty `WHERE` clause.
pub fn empty_where() -> Expression {
    true_expr()
}

/// An empty `GROUP BY` clause.
pub fn empty_group_by() -> GroupBy {
    GroupBy { elements: vec![] }
}

/// An empty `ORDER BY` clause.
pub fn empty_order_by() -> OrderBy {
    OrderBy { elements: vec![] }
}

/// An empty `LIMIT` clause.
pub fn empty_limit() -> Limit {
    Limit { limit: None }
}

/// A `true` expression.
pub fn true_expr() -> Expression {
    Expression::Value(Value::Bool(true))
}

/// A `false` expression.
pub fn false_expr() -> Expression {
    Expression::Value(Value::Bool(false))
}

// Combinators //

/// Append `right` to `left` as a conjunction.
pub fn and(left: Expression, right: Expression) -> Expression {
    Expression::And {
        left: Box::new(left),
        right: Box::new(right),
    }
}

/// Combine expressions into a single disjunction. An empty list is `false`.
pub fn disjunction(expressions: impl IntoIterator<Item = Expression>) -> Expression {
    expressions
        .into_iter()
        .reduce(|left, right| Expression::Or {
            left: Box::new(left),
            right: Box::new(right),
        })
        .unwrap_or_else(false_expr)
}

/// Reference a column of the table being queried.
pub fn column(name: &str) -> Expression {
    Expression::ColumnReference(ColumnReference::Column(ColumnName(name.to_string())))
}

/// `UPPER(expression)`
pub fn upper(expression: Expression) -> Expression {
    Expression::FunctionCall {
        function: Function::Upper,
        args: vec![expression],
    }
}

/// Create column aliases using this function so we build everything in one place.
pub fn make_column_alias(name: String) -> ColumnAlias {
    ColumnAlias { name }
}

// SELECTs //

/// Build a simple select with a select list and the rest are empty.
pub fn simple_select(select_list: Vec<(ColumnAlias, Expression)>, from: From) -> Select {
    Select {
        select_list: SelectList::SelectList(select_list),
        from: Some(from),
        where_: Where(empty_where()),
        group_by: empty_group_by(),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// Build a simple select *
pub fn star_select(from: From) -> Select {
    Select {
        select_list: SelectList::SelectStar,
        from: Some(from),
        where_: Where(empty_where()),
        group_by: empty_group_by(),
        order_by: empty_order_by(),
        limit: empty_limit(),
    }
}

/// A `FROM` clause for a database table, optionally qualified by a schema.
pub fn from_table(schema: Option<&str>, table: &str) -> From {
    From::Table {
        reference: TableReference {
            schema: schema.map(|schema| SchemaName(schema.to_string())),
            table: TableName(table.to_string()),
        },
    }
}
