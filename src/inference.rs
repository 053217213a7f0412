use std::collections::HashMap;

use crate::error::{FuzzyError, OutOfDomain};
use crate::inputs::Inputs;
use crate::ops::*;
use crate::outputs::Outputs;
use crate::rules::Rules;
use crate::variable::{Variable, VariableKey, Variables};

/// Mamdani inference: fuzzify, fire every rule, aggregate the implied output
/// sets and defuzzify.
///
/// The default operators are min/max for the premise, clipping for the
/// implication, max for the aggregation and the centroid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MamdaniInference {
    and_op: AndOp,
    or_op: OrOp,
    imp_op: ImplicationOp,
    agg_op: OrOp,
    defuzz_op: DefuzzificationOp,
    clip_to_universe: bool,
}

impl MamdaniInference {
    pub fn new(
        and_op: AndOp,
        or_op: OrOp,
        imp_op: ImplicationOp,
        agg_op: OrOp,
        defuzz_op: DefuzzificationOp,
    ) -> Self {
        Self {
            and_op,
            or_op,
            imp_op,
            agg_op,
            defuzz_op,
            clip_to_universe: false,
        }
    }

    /// Clamp readings outside a variable's universe to the nearest bound
    /// before fuzzification. Off by default: readings are fuzzified as given.
    pub fn with_clip_to_universe(mut self, clip: bool) -> Self {
        self.clip_to_universe = clip;
        self
    }

    pub fn and_op(&self) -> AndOp {
        self.and_op
    }

    pub fn or_op(&self) -> OrOp {
        self.or_op
    }

    pub fn imp_op(&self) -> ImplicationOp {
        self.imp_op
    }

    pub fn agg_op(&self) -> OrOp {
        self.agg_op
    }

    pub fn defuzz_op(&self) -> DefuzzificationOp {
        self.defuzz_op
    }

    /// Evaluates `rules` against `inputs`, leaving the results in `state`.
    pub fn eval(
        &self,
        vars: &Variables,
        rules: &Rules,
        inputs: &Inputs,
        state: &mut InferenceState,
    ) -> Result<(), FuzzyError> {
        rules.validate(vars)?;

        self.eval_validated(vars, rules, inputs, state)
    }

    // Callers guarantee `rules` were validated against `vars`
    pub(crate) fn eval_validated(
        &self,
        vars: &Variables,
        rules: &Rules,
        inputs: &Inputs,
        state: &mut InferenceState,
    ) -> Result<(), FuzzyError> {
        state.clear();

        // Convert input values to crisp facts
        let mut facts = HashMap::with_capacity(inputs.len());

        for (var, input) in vars.inputs() {
            let Some(&value) = inputs.0.get(&var.0) else {
                return Err(FuzzyError::MissingInput {
                    variable: input.name().to_owned(),
                });
            };

            if !value.is_finite() {
                return Err(FuzzyError::NonFiniteReading {
                    variable: input.name().to_owned(),
                    value,
                });
            }

            let universe = input.universe();
            let mut fact = value;

            if !universe.contains(value) {
                tracing::warn!(
                    variable = input.name(),
                    value,
                    lo = universe.lo(),
                    hi = universe.hi(),
                    clipped = self.clip_to_universe,
                    "reading outside universe"
                );
                state.out_of_domain.push(OutOfDomain {
                    variable: input.name().to_owned(),
                    value,
                    lo: universe.lo(),
                    hi: universe.hi(),
                });

                if self.clip_to_universe {
                    fact = universe.clamp(value);
                }
            }

            facts.insert(var.0, fact);
        }

        // Fire every rule, even the ones that end up at zero
        let degree_of = |key: VariableKey, label: &str| {
            facts
                .get(&key)
                .and_then(|fact| vars.by_key(key)?.fuzzify(label, *fact))
                .unwrap_or(0.)
        };

        for (i, rule) in rules.iter().enumerate() {
            let strength = rule.premise().firing_strength(&degree_of, self.and_op, self.or_op);

            tracing::trace!(rule = i, strength, "rule fired");
            state.firing.push(strength);
        }

        // Aggregate the implied consequences per output variable
        for (var, output) in vars.outputs() {
            let samples = output.universe().samples();
            let curve = state.aggregated.entry(var.0).or_default();

            curve.clear();
            curve.resize(samples.len(), 0.);

            for (rule, strength) in rules.iter().zip(&state.firing) {
                let (key, label) = rule.consequence();

                if key != var.0 {
                    continue;
                }

                let Some(membership) = output.term(label) else {
                    continue;
                };

                for (agg, x) in curve.iter_mut().zip(samples) {
                    *agg = self.agg_op.call(*agg, self.imp_op.call(*strength, membership.degree(*x)));
                }
            }
        }

        // Defuzzificate
        for (var, output) in vars.outputs() {
            let curve = state.aggregated.get(&var.0).map(Vec::as_slice).unwrap_or_default();
            let crisp = self
                .defuzz_op
                .call(output.universe().samples(), curve)
                .ok_or_else(|| FuzzyError::NoRuleFired {
                    variable: output.name().to_owned(),
                })?;

            state.outputs.insert(var.0, crisp);
        }

        Ok(())
    }
}

/// Per-evaluation scratch space and results.
///
/// Owned by the caller and reused across evaluations; every evaluation
/// starts by clearing it.
#[derive(Clone, Debug, Default)]
pub struct InferenceState {
    firing: Vec<f64>,
    aggregated: HashMap<VariableKey, Vec<f64>>,
    out_of_domain: Vec<OutOfDomain>,
    outputs: Outputs,
}

impl InferenceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.firing.clear();
        self.out_of_domain.clear();
        self.outputs.clear();

        // Keep the buffers around for the next evaluation
        for curve in self.aggregated.values_mut() {
            curve.fill(0.);
        }
    }

    /// Firing strength of each rule, in rule order.
    pub fn firing_strengths(&self) -> &[f64] {
        &self.firing
    }

    /// Aggregated output set of `var`, sampled over its universe.
    pub fn aggregated(&self, var: Variable) -> Option<&[f64]> {
        self.aggregated.get(&var.0).map(Vec::as_slice)
    }

    /// Strongest firing among the rules concluding `var is label`, or `None`
    /// when no rule has that consequence.
    pub fn label_activation(&self, rules: &Rules, var: Variable, label: &str) -> Option<f64> {
        rules
            .iter()
            .zip(&self.firing)
            .filter(|(rule, _)| rule.consequence() == (var.0, label))
            .map(|(_, strength)| *strength)
            .reduce(f64::max)
    }

    pub fn out_of_domain(&self) -> &[OutOfDomain] {
        &self.out_of_domain
    }

    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub(crate) fn take_outputs(&mut self) -> Outputs {
        std::mem::take(&mut self.outputs)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::membership::MembershipFunction;
    use crate::terms::Terms;
    use crate::universe::Universe;

    fn trimf(a: f64, b: f64, c: f64) -> MembershipFunction {
        MembershipFunction::triangular(a, b, c).unwrap()
    }

    fn trapmf(a: f64, b: f64, c: f64, d: f64) -> MembershipFunction {
        MembershipFunction::trapezoidal(a, b, c, d).unwrap()
    }

    fn hmb_system() -> (Variables, Rules, Variable, Variable) {
        let mut vars = Variables::new();
        let hmb = vars
            .add_input(
                "hmb",
                Universe::new(0., 1., 1.).unwrap(),
                Terms::new().with("no", trimf(0., 0., 0.5)).with("yes", trimf(0.5, 1., 1.)),
            )
            .unwrap();
        let risk = vars
            .add_output(
                "anemia_risk",
                Universe::new(0., 100., 1.).unwrap(),
                Terms::new().with("very_low", trimf(0., 0., 20.)),
            )
            .unwrap();
        let mut rules = Rules::new();

        rules.add(&vars, hmb.is("no"), risk.is("very_low")).unwrap();

        (vars, rules, hmb, risk)
    }

    #[test]
    fn test_single_rule_centroid() {
        let (vars, rules, hmb, risk) = hmb_system();
        let mut state = InferenceState::new();

        MamdaniInference::default()
            .eval(&vars, &rules, &Inputs::new().with(hmb, 0.), &mut state)
            .unwrap();

        assert_eq!(state.firing_strengths(), &[1.]);

        // Fired at full strength: the aggregated set is the unclipped shape
        let very_low = trimf(0., 0., 20.);
        let samples = vars.get(risk).unwrap().universe().samples();

        for (x, mu) in samples.iter().zip(state.aggregated(risk).unwrap()) {
            assert_eq!(*mu, very_low.degree(*x));
        }

        assert_abs_diff_eq!(state.outputs().get(risk).unwrap(), 20. / 3., epsilon = 1e-9);
    }

    #[test]
    fn test_missing_input() {
        let (vars, rules, _, _) = hmb_system();
        let mut state = InferenceState::new();
        let err = MamdaniInference::default()
            .eval(&vars, &rules, &Inputs::new(), &mut state)
            .unwrap_err();

        assert_eq!(err, FuzzyError::MissingInput { variable: "hmb".into() });
    }

    #[test]
    fn test_non_finite_reading() {
        let (vars, rules, hmb, _) = hmb_system();
        let mut state = InferenceState::new();
        let err = MamdaniInference::default()
            .eval(&vars, &rules, &Inputs::new().with(hmb, f64::NAN), &mut state)
            .unwrap_err();

        assert!(matches!(err, FuzzyError::NonFiniteReading { .. }));
    }

    #[test]
    fn test_no_rule_fired() {
        let (vars, rules, hmb, risk) = hmb_system();
        let mut state = InferenceState::new();
        let err = MamdaniInference::default()
            .eval(&vars, &rules, &Inputs::new().with(hmb, 1.), &mut state)
            .unwrap_err();

        assert_eq!(
            err,
            FuzzyError::NoRuleFired {
                variable: "anemia_risk".into()
            }
        );
        // The rule still took part, at zero strength
        assert_eq!(state.firing_strengths(), &[0.]);
        assert!(state.aggregated(risk).unwrap().iter().all(|mu| *mu == 0.));
    }

    #[test]
    fn test_out_of_domain_reading() {
        let (vars, rules, hmb, risk) = hmb_system();
        let mut state = InferenceState::new();
        let inference = MamdaniInference::default();

        // Outside the universe and outside every support
        let err = inference
            .eval(&vars, &rules, &Inputs::new().with(hmb, -2.), &mut state)
            .unwrap_err();

        assert!(matches!(err, FuzzyError::NoRuleFired { .. }));
        assert_eq!(
            state.out_of_domain(),
            &[OutOfDomain {
                variable: "hmb".into(),
                value: -2.,
                lo: 0.,
                hi: 1.,
            }]
        );

        // Clipped to the lower bound it fully matches `no`
        inference
            .with_clip_to_universe(true)
            .eval(&vars, &rules, &Inputs::new().with(hmb, -2.), &mut state)
            .unwrap();

        assert_eq!(state.out_of_domain().len(), 1);
        assert_abs_diff_eq!(state.outputs().get(risk).unwrap(), 20. / 3., epsilon = 1e-9);
    }

    #[test]
    fn test_state_is_cleared_between_evaluations() {
        let (vars, rules, hmb, risk) = hmb_system();
        let mut state = InferenceState::new();
        let inference = MamdaniInference::default();

        inference
            .eval(&vars, &rules, &Inputs::new().with(hmb, 0.), &mut state)
            .unwrap();
        assert!(inference
            .eval(&vars, &rules, &Inputs::new().with(hmb, 1.), &mut state)
            .is_err());

        assert_eq!(state.outputs().get(risk), None);
        assert_eq!(state.firing_strengths(), &[0.]);
    }

    fn shared_label_system() -> (Variables, Rules, Variable, Variable) {
        let mut vars = Variables::new();
        let x = vars
            .add_input(
                "x",
                Universe::new(0., 1., 0.1).unwrap(),
                Terms::new().with("a", trimf(0., 0., 1.)).with("b", trimf(0., 1., 1.)),
            )
            .unwrap();
        let risk = vars
            .add_output(
                "risk",
                Universe::new(0., 100., 1.).unwrap(),
                Terms::new().with("high", trapmf(70., 90., 100., 100.)),
            )
            .unwrap();
        let mut rules = Rules::new();

        rules.add(&vars, x.is("b"), risk.is("high")).unwrap();
        rules.add(&vars, x.is("a"), risk.is("high")).unwrap();

        (vars, rules, x, risk)
    }

    #[test]
    fn test_shared_consequence_takes_pointwise_max() {
        let (vars, rules, x, risk) = shared_label_system();
        let mut state = InferenceState::new();

        MamdaniInference::default()
            .eval(&vars, &rules, &Inputs::new().with(x, 0.3), &mut state)
            .unwrap();

        let [low, strong] = [state.firing_strengths()[0], state.firing_strengths()[1]];

        assert_abs_diff_eq!(low, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(strong, 0.7, epsilon = 1e-12);
        assert_eq!(state.label_activation(&rules, risk, "high"), Some(strong));
        assert_eq!(state.label_activation(&rules, risk, "low"), None);

        let high = trapmf(70., 90., 100., 100.);
        let samples = vars.get(risk).unwrap().universe().samples();

        for (x, mu) in samples.iter().zip(state.aggregated(risk).unwrap()) {
            let expected = f64::max(low.min(high.degree(*x)), strong.min(high.degree(*x)));

            assert_eq!(*mu, expected);
            assert!(*mu <= 1.);
        }
    }

    #[test]
    fn test_shared_consequence_scaled() {
        let (vars, rules, x, risk) = shared_label_system();
        let mut state = InferenceState::new();
        let inference = MamdaniInference::new(
            AndOp::Min,
            OrOp::Max,
            ImplicationOp::Prod,
            OrOp::Max,
            DefuzzificationOp::Centroid,
        );

        inference
            .eval(&vars, &rules, &Inputs::new().with(x, 0.3), &mut state)
            .unwrap();

        let high = trapmf(70., 90., 100., 100.);
        let samples = vars.get(risk).unwrap().universe().samples();
        let strengths = state.firing_strengths();

        for (x, mu) in samples.iter().zip(state.aggregated(risk).unwrap()) {
            let expected = f64::max(strengths[0] * high.degree(*x), strengths[1] * high.degree(*x));

            assert_eq!(*mu, expected);
        }

        // Scaling a single shape does not move its centroid
        let crisp = state.outputs().get(risk).unwrap();

        assert_abs_diff_eq!(crisp, (10. * (70. + 40. / 3.) + 10. * 95.) / 20., epsilon = 1e-9);
    }

    #[test]
    fn test_rules_from_another_registry() {
        let (vars, _, _, _) = hmb_system();
        let (_, foreign_rules, x, _) = shared_label_system();
        let mut state = InferenceState::new();
        let err = MamdaniInference::default()
            .eval(&vars, &foreign_rules, &Inputs::new().with(x, 0.3), &mut state)
            .unwrap_err();

        assert!(err.is_configuration());
    }

    #[test]
    fn test_bank_loan() {
        let mut vars = Variables::new();
        let piecewise = |points: &[(f64, f64)]| MembershipFunction::piecewise(points.iter().copied()).unwrap();

        let score = vars
            .add_input(
                "score",
                Universe::new(150., 200., 0.1).unwrap(),
                Terms::new()
                    .with("high", piecewise(&[(175., 0.), (180., 0.2), (185., 0.7), (190., 1.)]))
                    .with(
                        "low",
                        piecewise(&[(155., 1.), (160., 0.8), (165., 0.5), (170., 0.2), (175., 0.)]),
                    ),
            )
            .unwrap();
        let ratio = vars
            .add_input(
                "ratio",
                Universe::new(0.1, 1., 0.1).unwrap(),
                Terms::new()
                    .with("good", piecewise(&[(0.3, 1.), (0.4, 0.7), (0.41, 0.3), (0.42, 0.)]))
                    .with("bad", piecewise(&[(0.44, 0.), (0.45, 0.3), (0.5, 0.7), (0.7, 1.)])),
            )
            .unwrap();
        let credit = vars
            .add_input(
                "credit",
                Universe::new(0., 10., 0.1).unwrap(),
                Terms::new()
                    .with("good", piecewise(&[(2., 1.), (3., 0.7), (4., 0.3), (5., 0.)]))
                    .with("bad", piecewise(&[(5., 0.), (6., 0.3), (7., 0.7), (8., 1.)])),
            )
            .unwrap();
        let decision = vars
            .add_output(
                "decision",
                Universe::new(0., 10., 0.1).unwrap(),
                Terms::new()
                    .with("approve", piecewise(&[(5., 0.), (6., 0.3), (7., 0.7), (8., 1.)]))
                    .with("reject", piecewise(&[(2., 1.), (3., 0.7), (4., 0.3), (5., 0.)])),
            )
            .unwrap();
        let mut rules = Rules::with_capacity(2);

        rules
            .add(
                &vars,
                score.is("high").and2(ratio.is("good"), credit.is("good")),
                decision.is("approve"),
            )
            .unwrap();
        rules
            .add(
                &vars,
                score.is("low").and(ratio.is("bad")).or(credit.is("bad")),
                decision.is("reject"),
            )
            .unwrap();

        let inputs = Inputs::new().with(score, 190.).with(ratio, 0.39).with(credit, 1.5);
        let mut state = InferenceState::new();

        MamdaniInference::default()
            .eval(&vars, &rules, &inputs, &mut state)
            .unwrap();

        assert_abs_diff_eq!(state.firing_strengths()[0], 0.73, epsilon = 1e-9);
        assert_eq!(state.firing_strengths()[1], 0.);

        assert_abs_diff_eq!(state.outputs().get(decision).unwrap(), 8.010492631084489, epsilon = 1e-6);
    }
}
