use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::{new_key_type, SlotMap};

use crate::error::ConfigError;
use crate::membership::MembershipFunction;
use crate::terms::Terms;
use crate::universe::Universe;

new_key_type! {
    /// A variable key
    pub struct VariableKey;
}

/// Cheap, copyable handle to a declared variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Variable(pub(crate) VariableKey);

impl Variable {
    pub fn key(self) -> VariableKey {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    /// Appears in rule premises
    Input,
    /// Appears in rule consequences
    Output,
}

#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    kind: VariableKind,
    universe: Universe,
    terms: HashMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    fn new(name: String, kind: VariableKind, universe: Universe) -> Self {
        Self {
            name,
            kind,
            universe,
            terms: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn term(&self, label: &str) -> Option<&MembershipFunction> {
        self.terms.get(label)
    }

    pub fn has_term(&self, label: &str) -> bool {
        self.terms.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Degree to which `value` belongs to `label`.
    ///
    /// Any real value is accepted, including ones outside the universe.
    /// Returns `None` only when the label was never declared.
    pub fn fuzzify(&self, label: &str, value: f64) -> Option<f64> {
        self.terms.get(label).map(|mf| mf.degree(value))
    }
}

static NEXT_REGISTRY: AtomicU64 = AtomicU64::new(0);

/// Identity of a [`Variables`] registry. Clones share it; keys from two
/// independently built registries can coincide, their ids never do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RegistryId(u64);

impl RegistryId {
    fn next() -> Self {
        RegistryId(NEXT_REGISTRY.fetch_add(1, Ordering::Relaxed))
    }
}

/// Registry of every input and output variable of a system.
#[derive(Clone, Debug)]
pub struct Variables {
    id: RegistryId,
    pub(crate) vars: SlotMap<VariableKey, LinguisticVariable>,
    names: HashMap<String, VariableKey>,
}

impl Default for Variables {
    fn default() -> Self {
        Self::new()
    }
}

impl Variables {
    pub fn new() -> Self {
        Self {
            id: RegistryId::next(),
            vars: SlotMap::with_key(),
            names: HashMap::new(),
        }
    }

    pub(crate) fn id(&self) -> RegistryId {
        self.id
    }

    pub fn add_input(&mut self, name: impl Into<String>, universe: Universe, terms: Terms) -> Result<Variable, ConfigError> {
        self.add(name.into(), VariableKind::Input, universe, terms)
    }

    pub fn add_output(
        &mut self,
        name: impl Into<String>,
        universe: Universe,
        terms: Terms,
    ) -> Result<Variable, ConfigError> {
        self.add(name.into(), VariableKind::Output, universe, terms)
    }

    fn add(&mut self, name: String, kind: VariableKind, universe: Universe, terms: Terms) -> Result<Variable, ConfigError> {
        if self.names.contains_key(&name) {
            return Err(ConfigError::DuplicateVariable { name });
        }

        // Check the labels before touching the registry so a failure leaves it unchanged
        let mut var = LinguisticVariable::new(name, kind, universe);

        for (label, membership) in terms.0 {
            if var.terms.contains_key(&label) {
                return Err(ConfigError::DuplicateLabel {
                    variable: var.name,
                    label,
                });
            }

            var.terms.insert(label, membership);
        }

        tracing::debug!(
            variable = %var.name,
            ?kind,
            lo = var.universe.lo(),
            hi = var.universe.hi(),
            samples = var.universe.len(),
            terms = var.terms.len(),
            "declared variable"
        );

        let name = var.name.clone();
        let key = self.vars.insert(var);

        self.names.insert(name, key);

        Ok(Variable(key))
    }

    /// Declares `label` on `var`.
    ///
    /// Declaring the same label twice is rejected; use
    /// [`Variables::replace_term`] to deliberately overwrite a shape.
    pub fn add_term(
        &mut self,
        var: Variable,
        label: impl Into<String>,
        membership: MembershipFunction,
    ) -> Result<(), ConfigError> {
        let label = label.into();
        let entry = self.entry_mut(var)?;

        if entry.terms.contains_key(&label) {
            return Err(ConfigError::DuplicateLabel {
                variable: entry.name.clone(),
                label,
            });
        }

        tracing::debug!(variable = %entry.name, %label, "declared term");
        entry.terms.insert(label, membership);

        Ok(())
    }

    /// Declares `label` on `var`, overwriting any previous shape
    /// (last write wins). Returns the shape that was replaced.
    pub fn replace_term(
        &mut self,
        var: Variable,
        label: impl Into<String>,
        membership: MembershipFunction,
    ) -> Result<Option<MembershipFunction>, ConfigError> {
        let label = label.into();
        let entry = self.entry_mut(var)?;
        let previous = entry.terms.insert(label.clone(), membership);

        if previous.is_some() {
            tracing::debug!(variable = %entry.name, %label, "replaced term");
        }

        Ok(previous)
    }

    pub fn lookup(&self, name: &str) -> Option<Variable> {
        self.names.get(name).copied().map(Variable)
    }

    pub fn get(&self, var: Variable) -> Option<&LinguisticVariable> {
        self.vars.get(var.0)
    }

    pub(crate) fn by_key(&self, key: VariableKey) -> Option<&LinguisticVariable> {
        self.vars.get(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn inputs(&self) -> impl Iterator<Item = (Variable, &LinguisticVariable)> {
        self.of_kind(VariableKind::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = (Variable, &LinguisticVariable)> {
        self.of_kind(VariableKind::Output)
    }

    fn of_kind(&self, kind: VariableKind) -> impl Iterator<Item = (Variable, &LinguisticVariable)> {
        self.vars
            .iter()
            .filter(move |(_, v)| v.kind == kind)
            .map(|(k, v)| (Variable(k), v))
    }

    fn entry_mut(&mut self, var: Variable) -> Result<&mut LinguisticVariable, ConfigError> {
        self.vars.get_mut(var.0).ok_or_else(|| ConfigError::UnknownVariable {
            name: format!("{:?}", var.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trimf(a: f64, b: f64, c: f64) -> MembershipFunction {
        MembershipFunction::triangular(a, b, c).unwrap()
    }

    fn hmb(vars: &mut Variables) -> Variable {
        let terms = Terms::new()
            .with("no", trimf(0., 0., 0.5))
            .with("yes", trimf(0.5, 1., 1.));

        vars.add_input("hmb", Universe::new(0., 1., 1.).unwrap(), terms).unwrap()
    }

    #[test]
    fn test_declare_and_fuzzify() {
        let mut vars = Variables::new();
        let hmb = hmb(&mut vars);
        let var = vars.get(hmb).unwrap();

        assert_eq!(var.name(), "hmb");
        assert_eq!(var.kind(), VariableKind::Input);
        assert_eq!(var.fuzzify("no", 0.), Some(1.));
        assert_eq!(var.fuzzify("yes", 0.), Some(0.));
        assert_eq!(var.fuzzify("maybe", 0.), None);
        assert_eq!(vars.lookup("hmb"), Some(hmb));
        assert_eq!(vars.inputs().count(), 1);
        assert_eq!(vars.outputs().count(), 0);
    }

    #[test]
    fn test_fuzzify_outside_universe() {
        let mut vars = Variables::new();
        let hmb = hmb(&mut vars);
        let var = vars.get(hmb).unwrap();

        assert_eq!(var.fuzzify("yes", 7.), Some(0.));
        assert_eq!(var.fuzzify("no", -3.), Some(0.));
    }

    #[test]
    fn test_duplicate_variable() {
        let mut vars = Variables::new();
        hmb(&mut vars);

        let err = vars
            .add_input("hmb", Universe::new(0., 1., 1.).unwrap(), Terms::new())
            .unwrap_err();

        assert_eq!(err, ConfigError::DuplicateVariable { name: "hmb".into() });
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let mut vars = Variables::new();
        let location = vars
            .add_input("uf_location", Universe::new(0., 2., 1.).unwrap(), Terms::new())
            .unwrap();

        vars.add_term(location, "subserosal", trimf(0., 0., 0.)).unwrap();

        let err = vars.add_term(location, "subserosal", trimf(2., 2., 2.)).unwrap_err();

        assert!(matches!(err, ConfigError::DuplicateLabel { .. }));
        // The first shape is untouched
        assert_eq!(vars.get(location).unwrap().fuzzify("subserosal", 0.), Some(1.));
    }

    #[test]
    fn test_duplicate_label_in_terms() {
        let mut vars = Variables::new();
        let terms = Terms::new().with("a", trimf(0., 0., 1.)).with("a", trimf(0., 1., 1.));
        let err = vars.add_input("x", Universe::new(0., 1., 0.5).unwrap(), terms).unwrap_err();

        assert!(matches!(err, ConfigError::DuplicateLabel { .. }));
        assert!(vars.lookup("x").is_none());
    }

    #[test]
    fn test_replace_term_last_write_wins() {
        let mut vars = Variables::new();
        let location = vars
            .add_input("uf_location", Universe::new(0., 2., 1.).unwrap(), Terms::new())
            .unwrap();

        assert_eq!(vars.replace_term(location, "subserosal", trimf(0., 0., 0.)).unwrap(), None);

        let previous = vars.replace_term(location, "subserosal", trimf(2., 2., 2.)).unwrap();
        let var = vars.get(location).unwrap();

        assert_eq!(previous, Some(trimf(0., 0., 0.)));
        assert_eq!(var.fuzzify("subserosal", 0.), Some(0.));
        assert_eq!(var.fuzzify("subserosal", 2.), Some(1.));
    }
}
