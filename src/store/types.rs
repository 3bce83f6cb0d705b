//! Result row types for activity-query.
//!
//! Defines the RDF values bound in a solution and the ordered row that
//! carries them.

use crate::error::{ActivityQueryError, Result};
use oxigraph::model::Term;
use std::fmt;

/// IRI of `xsd:string`, the datatype of simple literals.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// IRI of `rdf:langString`, the datatype of language-tagged literals.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// A literal value with its lexical form, datatype and optional language tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    /// Lexical form, unescaped.
    pub lexical: String,

    /// Datatype IRI.
    pub datatype: String,

    /// Language tag for `rdf:langString` literals.
    pub language: Option<String>,
}

impl Literal {
    /// Creates a simple (`xsd:string`) literal.
    pub fn simple(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: XSD_STRING.to_string(),
            language: None,
        }
    }

    /// Creates a typed literal.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// Creates a language-tagged literal.
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: RDF_LANG_STRING.to_string(),
            language: Some(language.into()),
        }
    }
}

/// A single value bound to a query variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Named resource.
    Iri(String),

    /// Blank node, by its local identifier.
    BlankNode(String),

    /// Literal.
    Literal(Literal),
}

impl Value {
    /// Returns the IRI if this value is a named resource.
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Value::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the literal if this value is one.
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Value::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns the short display name of a named resource.
    ///
    /// The local name is whatever follows the last `#`, or failing that the
    /// last `/`, or failing that the last `:`.
    pub fn local_name(&self) -> Option<&str> {
        let iri = self.as_iri()?;
        let split = iri
            .rfind('#')
            .or_else(|| iri.rfind('/'))
            .or_else(|| iri.rfind(':'));
        Some(match split {
            Some(idx) => &iri[idx + 1..],
            None => iri,
        })
    }

    /// Returns a short description of the value's kind for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Iri(_) => "an IRI",
            Value::BlankNode(_) => "a blank node",
            Value::Literal(_) => "a literal",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Iri(iri) => write!(f, "{iri}"),
            Value::BlankNode(id) => write!(f, "_:{id}"),
            Value::Literal(lit) => {
                if let Some(lang) = &lit.language {
                    write!(f, "\"{}\"@{}", lit.lexical, lang)
                } else if lit.datatype == XSD_STRING {
                    write!(f, "\"{}\"", lit.lexical)
                } else {
                    write!(f, "\"{}\"^^<{}>", lit.lexical, lit.datatype)
                }
            }
        }
    }
}

impl From<&Term> for Value {
    #[allow(unreachable_patterns)]
    fn from(term: &Term) -> Self {
        match term {
            Term::NamedNode(node) => Value::Iri(node.as_str().to_string()),
            Term::BlankNode(node) => Value::BlankNode(node.as_str().to_string()),
            Term::Literal(lit) => Value::Literal(Literal {
                lexical: lit.value().to_string(),
                datatype: lit.datatype().as_str().to_string(),
                language: lit.language().map(str::to_string),
            }),
            // Quoted triples only exist with RDF-star enabled
            other => Value::Literal(Literal::simple(other.to_string())),
        }
    }
}

/// One solution of a SELECT query: variables in projection order, each
/// with the value it is bound to. Unbound variables are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    bindings: Vec<(String, Value)>,
}

impl Row {
    /// Creates an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding, builder style.
    pub fn with(mut self, variable: impl Into<String>, value: Value) -> Self {
        self.push(variable, value);
        self
    }

    /// Adds a binding at the end of the row.
    pub fn push(&mut self, variable: impl Into<String>, value: Value) {
        self.bindings.push((variable.into(), value));
    }

    /// Returns the value bound to `variable`, if any.
    pub fn get(&self, variable: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .find(|(name, _)| name == variable)
            .map(|(_, value)| value)
    }

    /// Returns the value bound to `variable`, or a result error if unbound.
    pub fn require(&self, variable: &str) -> Result<&Value> {
        self.get(variable).ok_or_else(|| {
            ActivityQueryError::result(format!("Variable ?{variable} is not bound"))
        })
    }

    /// Returns the IRI bound to `variable`, failing if it is unbound or not an IRI.
    pub fn require_iri(&self, variable: &str) -> Result<&Value> {
        let value = self.require(variable)?;
        match value {
            Value::Iri(_) => Ok(value),
            other => Err(ActivityQueryError::result(format!(
                "Variable ?{variable} is bound to {}, expected an IRI",
                other.kind()
            ))),
        }
    }

    /// Iterates over the bindings in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of bound variables.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if no variable is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}
