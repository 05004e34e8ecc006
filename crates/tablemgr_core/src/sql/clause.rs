use super::quote_ident;
use rusqlite::types::Value;

/// Qualified reference to one column of one table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    table: String,
    column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn name(&self) -> &str {
        &self.column
    }

    pub fn equals(&self, value: impl Into<Value>) -> Clause {
        self.compare(CompareOp::Eq, value)
    }

    pub fn not_equals(&self, value: impl Into<Value>) -> Clause {
        self.compare(CompareOp::NotEq, value)
    }

    pub fn lt(&self, value: impl Into<Value>) -> Clause {
        self.compare(CompareOp::Lt, value)
    }

    pub fn lte(&self, value: impl Into<Value>) -> Clause {
        self.compare(CompareOp::Lte, value)
    }

    pub fn gt(&self, value: impl Into<Value>) -> Clause {
        self.compare(CompareOp::Gt, value)
    }

    pub fn gte(&self, value: impl Into<Value>) -> Clause {
        self.compare(CompareOp::Gte, value)
    }

    pub fn is_null(&self) -> Clause {
        Clause::IsNull {
            column: self.clone(),
            negated: false,
        }
    }

    pub fn is_not_null(&self) -> Clause {
        Clause::IsNull {
            column: self.clone(),
            negated: true,
        }
    }

    pub fn in_list<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Clause {
        Clause::In {
            column: self.clone(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn like(&self, pattern: impl Into<String>) -> Clause {
        Clause::Like {
            column: self.clone(),
            pattern: pattern.into(),
        }
    }

    fn compare(&self, op: CompareOp, value: impl Into<Value>) -> Clause {
        Clause::Compare {
            column: self.clone(),
            op,
            value: value.into(),
        }
    }

    pub(crate) fn render(&self, out: &mut String) {
        quote_ident(out, &self.table);
        out.push('.');
        quote_ident(out, &self.column);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::Lte => "<=",
            Self::Gt => ">",
            Self::Gte => ">=",
        }
    }
}

/// Boolean predicate tree attached to WHERE clauses.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Compare {
        column: ColumnRef,
        op: CompareOp,
        value: Value,
    },
    IsNull {
        column: ColumnRef,
        negated: bool,
    },
    In {
        column: ColumnRef,
        values: Vec<Value>,
    },
    Like {
        column: ColumnRef,
        pattern: String,
    },
    And(Vec<Clause>),
    Or(Vec<Clause>),
    Not(Box<Clause>),
}

impl Clause {
    pub fn and(self, other: Clause) -> Clause {
        match self {
            Self::And(mut clauses) => {
                clauses.push(other);
                Self::And(clauses)
            }
            clause => Self::And(vec![clause, other]),
        }
    }

    pub fn or(self, other: Clause) -> Clause {
        match self {
            Self::Or(mut clauses) => {
                clauses.push(other);
                Self::Or(clauses)
            }
            clause => Self::Or(vec![clause, other]),
        }
    }

    pub fn not(self) -> Clause {
        Self::Not(Box::new(self))
    }

    /// Renders this clause with `?` placeholders, appending bound values to `params`.
    pub(crate) fn render(&self, out: &mut String, params: &mut Vec<Value>) {
        match self {
            // `= NULL` never matches in SQL; keep the intent instead.
            Self::Compare {
                column,
                op: op @ (CompareOp::Eq | CompareOp::NotEq),
                value: Value::Null,
            } => {
                column.render(out);
                if *op == CompareOp::Eq {
                    out.push_str(" IS NULL");
                } else {
                    out.push_str(" IS NOT NULL");
                }
            }
            Self::Compare { column, op, value } => {
                column.render(out);
                out.push(' ');
                out.push_str(op.as_sql());
                out.push_str(" ?");
                params.push(value.clone());
            }
            Self::IsNull { column, negated } => {
                column.render(out);
                out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Self::In { values, .. } if values.is_empty() => out.push_str("0 = 1"),
            Self::In { column, values } => {
                column.render(out);
                out.push_str(" IN (");
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        out.push_str(", ");
                    }
                    out.push('?');
                    params.push(value.clone());
                }
                out.push(')');
            }
            Self::Like { column, pattern } => {
                column.render(out);
                out.push_str(" LIKE ?");
                params.push(Value::Text(pattern.clone()));
            }
            Self::And(clauses) => render_group(out, params, clauses, " AND ", "1 = 1"),
            Self::Or(clauses) => render_group(out, params, clauses, " OR ", "0 = 1"),
            Self::Not(clause) => {
                out.push_str("NOT (");
                clause.render(out, params);
                out.push(')');
            }
        }
    }
}

fn render_group(
    out: &mut String,
    params: &mut Vec<Value>,
    clauses: &[Clause],
    separator: &str,
    empty: &str,
) {
    if clauses.is_empty() {
        out.push_str(empty);
        return;
    }
    out.push('(');
    for (index, clause) in clauses.iter().enumerate() {
        if index > 0 {
            out.push_str(separator);
        }
        clause.render(out, params);
    }
    out.push(')');
}
