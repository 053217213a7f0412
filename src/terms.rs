use crate::membership::MembershipFunction;

/// Labels and shapes to declare on a variable in one go.
#[derive(Clone, Debug, Default)]
pub struct Terms(pub(crate) Vec<(String, MembershipFunction)>);

impl Terms {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, label: impl Into<String>, membership: MembershipFunction) {
        self.0.push((label.into(), membership));
    }

    /// Chaining form of [`Terms::insert`].
    pub fn with(mut self, label: impl Into<String>, membership: MembershipFunction) -> Self {
        self.insert(label, membership);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
