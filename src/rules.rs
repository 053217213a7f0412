use crate::dsl::Expr;
use crate::error::ConfigError;
use crate::variable::{RegistryId, VariableKey, VariableKind, Variables};

/// Ordered rule base. Rules are checked against the variable registry when
/// they are added and never change afterwards.
#[derive(Clone, Debug, Default)]
pub struct Rules(pub(crate) Vec<Rule>);

impl Rules {
    pub fn new() -> Self {
        Rules(Vec::new())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Rules(Vec::with_capacity(capacity))
    }

    /// Registers `premise => consequence`.
    ///
    /// Every premise proposition must name a declared input label, and the
    /// consequence must be a single `output is label` proposition.
    pub fn add(&mut self, vars: &Variables, premise: Expr, consequence: Expr) -> Result<(), ConfigError> {
        let rule = Rule::new(vars, premise, consequence)?;

        tracing::debug!(
            index = self.0.len(),
            premises = rule.premise.propositions().len(),
            consequence = %rule.label,
            "registered rule"
        );
        self.0.push(rule);

        Ok(())
    }

    /// Re-checks every rule against `vars`, which must be the registry the
    /// rules were added with (or a clone of it).
    pub fn validate(&self, vars: &Variables) -> Result<(), ConfigError> {
        self.0.iter().try_for_each(|rule| rule.validate(vars))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    registry: RegistryId,
    premise: Expr,
    output: VariableKey,
    label: String,
}

impl Rule {
    fn new(vars: &Variables, premise: Expr, consequence: Expr) -> Result<Self, ConfigError> {
        let Expr::Is(output, label) = consequence else {
            return Err(ConfigError::InvalidConsequence);
        };
        let rule = Self {
            registry: vars.id(),
            premise,
            output,
            label,
        };

        rule.validate(vars)?;

        Ok(rule)
    }

    fn validate(&self, vars: &Variables) -> Result<(), ConfigError> {
        if self.registry != vars.id() {
            return Err(ConfigError::ForeignRule);
        }
        if self.premise.has_empty_node() {
            return Err(ConfigError::EmptyExpression);
        }

        for (key, label) in self.premise.propositions() {
            check_term(vars, key, label, VariableKind::Input)?;
        }

        check_term(vars, self.output, &self.label, VariableKind::Output)
    }

    pub fn premise(&self) -> &Expr {
        &self.premise
    }

    /// Output variable and label this rule activates.
    pub fn consequence(&self) -> (VariableKey, &str) {
        (self.output, self.label.as_str())
    }
}

fn check_term(vars: &Variables, key: VariableKey, label: &str, kind: VariableKind) -> Result<(), ConfigError> {
    let var = vars.by_key(key).ok_or_else(|| ConfigError::UnknownVariable {
        name: format!("{key:?}"),
    })?;

    if var.kind() != kind {
        let name = var.name().to_owned();

        return Err(match kind {
            VariableKind::Input => ConfigError::NotAnInput { name },
            VariableKind::Output => ConfigError::NotAnOutput { name },
        });
    }

    if !var.has_term(label) {
        return Err(ConfigError::UnknownLabel {
            variable: var.name().to_owned(),
            label: label.to_owned(),
        });
    }

    Ok(())
}
