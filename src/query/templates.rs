//! Named SPARQL query templates.
//!
//! The three listings are fixed graph patterns over the activity ontology.
//! What varies is the namespace prefix they are written against and the
//! date range of the range listing, both taken from configuration.

use crate::config::{Config, DateRangeConfig, OntologyConfig};
use crate::error::{ActivityQueryError, Result};

/// Namespace of XML Schema datatypes.
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// The fixed listings, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Every activity with its element's start date, end date and content.
    Activities,
    /// Distinct content strings of observation elements.
    ObservationTypes,
    /// Distinct content strings of observation elements inside the date range.
    ObservationsInRange,
}

impl QueryKind {
    /// All listings in run order.
    pub const ALL: [QueryKind; 3] = [
        QueryKind::Activities,
        QueryKind::ObservationTypes,
        QueryKind::ObservationsInRange,
    ];

    /// Short identifier for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Activities => "activities",
            Self::ObservationTypes => "observation-types",
            Self::ObservationsInRange => "observations-in-range",
        }
    }

    /// Section heading printed before the rows.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Activities => "# Listing all activities",
            Self::ObservationTypes => "# Listing all Observation Types",
            Self::ObservationsInRange => "# Listing all Observation within specific date range",
        }
    }
}

/// Renders the listing queries for one ontology namespace and date range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryTemplates {
    ontology: OntologyConfig,
    range: DateRangeConfig,
}

impl QueryTemplates {
    /// Creates templates after validating every value that ends up in query text.
    pub fn new(ontology: OntologyConfig, range: DateRangeConfig) -> Result<Self> {
        ontology.validate()?;
        range.validate()?;
        if ontology.prefix == "xsd" {
            return Err(ActivityQueryError::config(
                "ontology.prefix 'xsd' is reserved for XML Schema datatypes",
            ));
        }
        Ok(Self { ontology, range })
    }

    /// Creates templates from the loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.ontology.clone(), config.range.clone())
    }

    /// Prefix declarations shared by every query.
    pub fn prologue(&self) -> String {
        format!(
            "PREFIX {}: <{}>\nPREFIX xsd: <{}>\n",
            self.ontology.prefix, self.ontology.namespace, XSD_NAMESPACE
        )
    }

    /// Renders the full query text for a listing.
    pub fn render(&self, kind: QueryKind) -> String {
        let body = match kind {
            QueryKind::Activities => self.activities_body(),
            QueryKind::ObservationTypes => self.observation_types_body(),
            QueryKind::ObservationsInRange => self.observations_in_range_body(),
        };
        format!("{}{}", self.prologue(), body)
    }

    fn activities_body(&self) -> String {
        let p = &self.ontology.prefix;
        format!(
            "SELECT ?a ?sd ?ed ?c\n\
             WHERE {{\n\
             \x20   ?a {p}:hasElement ?e .\n\
             \x20   ?a a {p}:Activity .\n\
             \x20   ?e {p}:hasStartDate ?sd .\n\
             \x20   ?e {p}:hasEndDate ?ed .\n\
             \x20   ?e {p}:hasContentString ?c .\n\
             }}"
        )
    }

    fn observation_types_body(&self) -> String {
        let p = &self.ontology.prefix;
        format!(
            "SELECT DISTINCT ?c\n\
             WHERE {{\n\
             \x20   ?o {p}:hasElement ?e .\n\
             \x20   ?o a {p}:Observation .\n\
             \x20   ?e {p}:hasContentString ?c .\n\
             }}"
        )
    }

    fn observations_in_range_body(&self) -> String {
        let p = &self.ontology.prefix;
        let start = &self.range.start;
        let end = &self.range.end;
        format!(
            "SELECT DISTINCT ?c\n\
             WHERE {{\n\
             \x20   ?o {p}:hasElement ?e .\n\
             \x20   ?o a {p}:Observation .\n\
             \x20   ?e {p}:hasStartDate ?sd .\n\
             \x20   ?e {p}:hasEndDate ?ed .\n\
             \x20   ?e {p}:hasContentString ?c .\n\
             \x20   FILTER ((?sd >= \"{start}\"^^xsd:dateTime) && (?sd <= \"{end}\"^^xsd:dateTime) \
             && (?ed >= \"{start}\"^^xsd:dateTime) && (?ed <= \"{end}\"^^xsd:dateTime))\n\
             }}"
        )
    }
}
