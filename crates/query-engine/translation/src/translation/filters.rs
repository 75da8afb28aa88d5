//! Filter criteria, built from untrusted request input.
//!
//! Input that does not validate is dropped rather than reported: a malformed filter
//! widens the query to "no constraint on that field" instead of failing the request.

use serde::{Deserialize, Serialize};

/// Longest free-text value we keep, in characters.
pub const MAX_TOKEN_LENGTH: usize = 100;

/// Number of rows returned when the request does not ask for a valid amount.
pub const DEFAULT_ROW_LIMIT: i64 = 100;

/// Type that accept both a single value and a list of values. Allows for a simpler format when a
/// single value is the common case.
///
/// `List` is tried first, since a `T` such as [`RawScalar`] may also accept an array.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SingleOrList<T> {
    List(Vec<T>),
    Single(T),
}

impl<T> SingleOrList<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            SingleOrList::Single(value) => vec![value],
            SingleOrList::List(values) => values,
        }
    }
}

/// A scalar as it arrives in a request: forms send text, JSON clients may send numbers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawScalar {
    Integer(i64),
    Text(String),
    Other(serde_json::Value),
}

impl RawScalar {
    /// The value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawScalar::Text(text) => Some(text),
            RawScalar::Integer(_) | RawScalar::Other(_) => None,
        }
    }

    /// The value as an integer, if it is one. Surrounding whitespace is ignored.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            RawScalar::Integer(value) => Some(*value),
            RawScalar::Text(text) => text.trim().parse().ok(),
            RawScalar::Other(_) => None,
        }
    }
}

/// The filter form as submitted by the dashboard.
///
/// Every field accepts any JSON value, so a value of the wrong type never fails to
/// deserialize. It is dropped when building [`FilterCriteria`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawFilters {
    #[serde(default)]
    pub comunidad: Option<SingleOrList<RawScalar>>,
    #[serde(default)]
    pub sexo: Option<RawScalar>,
    #[serde(default)]
    pub edad_min: Option<RawScalar>,
    #[serde(default)]
    pub edad_max: Option<RawScalar>,
    #[serde(default)]
    pub diagnostico: Option<SingleOrList<RawScalar>>,
    #[serde(default, rename = "numPacientes")]
    pub num_pacientes: Option<RawScalar>,
}

impl RawFilters {
    /// Build filters from the `(name, value)` pairs of a form body.
    ///
    /// `comunidad` and `diagnostico` collect every occurrence. The other fields keep the first
    /// one. Unknown names are ignored.
    pub fn from_form_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut regions = vec![];
        let mut diagnoses = vec![];
        let mut filters = RawFilters::default();

        for (name, value) in pairs {
            let value = RawScalar::Text(value);
            match name.as_str() {
                "comunidad" => regions.push(value),
                "diagnostico" => diagnoses.push(value),
                "sexo" => {
                    filters.sexo.get_or_insert(value);
                }
                "edad_min" => {
                    filters.edad_min.get_or_insert(value);
                }
                "edad_max" => {
                    filters.edad_max.get_or_insert(value);
                }
                "numPacientes" => {
                    filters.num_pacientes.get_or_insert(value);
                }
                _ => {}
            }
        }

        filters.comunidad = (!regions.is_empty()).then_some(SingleOrList::List(regions));
        filters.diagnostico = (!diagnoses.is_empty()).then_some(SingleOrList::List(diagnoses));
        filters
    }
}

/// A free-text value that only contains word characters, whitespace and hyphens, and is at most
/// [`MAX_TOKEN_LENGTH`] characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SanitizedToken(String);

impl SanitizedToken {
    /// Sanitize a raw value. Returns `None` when nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let kept: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_' || *c == '-')
            .take(MAX_TOKEN_LENGTH)
            .collect();
        let trimmed = kept.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(SanitizedToken(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Maximum number of rows a query may return. Always positive, and used as given: it is bound
/// as a `bigint`, so every positive `i64` is valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowLimit(i64);

impl RowLimit {
    /// Accept positive values only.
    pub fn new(value: i64) -> Option<Self> {
        (value > 0).then_some(RowLimit(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Default for RowLimit {
    fn default() -> Self {
        RowLimit(DEFAULT_ROW_LIMIT)
    }
}

/// Validated filter criteria. Every present field becomes exactly one clause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub regions: Vec<SanitizedToken>,
    pub sex: Option<i64>,
    pub min_age: Option<i64>,
    pub max_age: Option<i64>,
    pub diagnoses: Vec<SanitizedToken>,
    pub limit: RowLimit,
}

impl FilterCriteria {
    pub fn from_raw(raw: RawFilters) -> Self {
        FilterCriteria {
            regions: sanitize_all(raw.comunidad),
            sex: raw.sexo.as_ref().and_then(RawScalar::as_integer),
            min_age: raw.edad_min.as_ref().and_then(RawScalar::as_integer),
            max_age: raw.edad_max.as_ref().and_then(RawScalar::as_integer),
            diagnoses: sanitize_all(raw.diagnostico),
            limit: raw
                .num_pacientes
                .as_ref()
                .and_then(RawScalar::as_integer)
                .and_then(RowLimit::new)
                .unwrap_or_default(),
        }
    }

    /// Number of filter clauses (excluding the row limit) these criteria produce.
    pub fn clause_count(&self) -> usize {
        usize::from(!self.regions.is_empty())
            + usize::from(self.sex.is_some())
            + usize::from(self.min_age.is_some())
            + usize::from(self.max_age.is_some())
            + usize::from(!self.diagnoses.is_empty())
    }
}

/// Keep the text values that survive sanitization. Anything else is dropped.
fn sanitize_all(values: Option<SingleOrList<RawScalar>>) -> Vec<SanitizedToken> {
    values
        .map(SingleOrList::into_vec)
        .unwrap_or_default()
        .iter()
        .filter_map(RawScalar::as_text)
        .filter_map(SanitizedToken::new)
        .collect()
}
