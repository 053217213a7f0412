//! Error types for configuring and evaluating a fuzzy system.

use thiserror::Error;

/// Problems detected while declaring universes, terms and rules.
///
/// These are fatal to the configuration being built; nothing retries them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid universe [{lo}, {hi}] with step {step}: {reason}")]
    InvalidUniverse {
        lo: f64,
        hi: f64,
        step: f64,
        reason: &'static str,
    },
    #[error("Invalid membership function: {reason}")]
    InvalidShape { reason: String },
    #[error("Variable {name} already exists")]
    DuplicateVariable { name: String },
    #[error("Label {label} is already declared on variable {variable}")]
    DuplicateLabel { variable: String, label: String },
    #[error("Variable {name} was never declared")]
    UnknownVariable { name: String },
    #[error("Label {label} was never declared on variable {variable}")]
    UnknownLabel { variable: String, label: String },
    #[error("Variable {name} is not an input and cannot appear in a premise")]
    NotAnInput { name: String },
    #[error("Variable {name} is not an output and cannot be a consequence")]
    NotAnOutput { name: String },
    #[error("And/Or expression without operands")]
    EmptyExpression,
    #[error("Consequence must be a single `variable is label` proposition")]
    InvalidConsequence,
    #[error("Rule was added against a different variable registry")]
    ForeignRule,
}

/// Errors surfaced by an evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FuzzyError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),
    #[error("No reading was set for input variable {variable}")]
    MissingInput { variable: String },
    #[error("Reading {value} for variable {variable} is not a finite number")]
    NonFiniteReading { variable: String, value: f64 },
    #[error("No rule fired for output variable {variable}; the aggregated set is empty")]
    NoRuleFired { variable: String },
}

impl FuzzyError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// A reading that lies outside its variable's universe.
///
/// Not an error: membership functions simply degrade to their value outside
/// the sampled range. Collected per evaluation for observability.
#[derive(Debug, Clone, PartialEq)]
pub struct OutOfDomain {
    pub variable: String,
    pub value: f64,
    pub lo: f64,
    pub hi: f64,
}
