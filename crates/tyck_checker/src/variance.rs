//! Variance of the type parameters of generic classes and interfaces.
//!
//! Explicit `in`/`out` annotations are taken as written. Otherwise each
//! parameter is measured by relating two instantiations that differ only in
//! that parameter, using the marker types as arguments.

use std::sync::Arc;

use tracing::debug;
use tyck_ast::types::ModifierFlags;

use crate::checker::Checker;
use crate::types::{ObjectKey, TypeId, Variance};

impl<'s> Checker<'s> {
    /// One variance per type parameter of the generic `target`, outer
    /// parameters first. Empty while the same target is being measured.
    pub(crate) fn variances_of(&mut self, target: TypeId) -> Arc<[Variance]> {
        if let Some(done) = self.session.caches.variances.get(&target) {
            return Arc::clone(&done);
        }
        let symbol = match self.types().get(target).object_key() {
            Some(ObjectKey::Declared(symbol)) => *symbol,
            _ => return Arc::from(Vec::new()),
        };
        if !self.variance_pending.insert(target) {
            return Arc::from(Vec::new());
        }
        let parameters = self.type_parameters_of(symbol);
        let mut variances = Vec::with_capacity(parameters.len());
        for (i, &parameter) in parameters.iter().enumerate() {
            let variance = match self.annotated_variance(parameter) {
                Some(variance) => variance,
                None => self.measure_variance(target, &parameters, i),
            };
            variances.push(variance);
        }
        self.variance_pending.remove(&target);
        debug!(?target, ?variances, "measured variances");
        let variances: Arc<[Variance]> = variances.into();
        Arc::clone(&self.session.caches.variances.entry(target).or_insert(variances))
    }

    fn annotated_variance(&self, parameter: TypeId) -> Option<Variance> {
        let declaration = self.type_parameter_declaration(parameter)?;
        let modifiers = self.tree(declaration.file).node(declaration.node).modifiers;
        match (modifiers.contains(ModifierFlags::IN), modifiers.contains(ModifierFlags::OUT)) {
            (true, true) => Some(Variance::Invariant),
            (true, false) => Some(Variance::Contravariant),
            (false, true) => Some(Variance::Covariant),
            (false, false) => None,
        }
    }

    fn measure_variance(&mut self, target: TypeId, parameters: &[TypeId], index: usize) -> Variance {
        let with_marker = |marker: TypeId| {
            let mut args = parameters.to_vec();
            args[index] = marker;
            args
        };
        let super_type = self.types().reference(target, with_marker(TypeId::MARKER_SUPER));
        let sub_type = self.types().reference(target, with_marker(TypeId::MARKER_SUB));
        let covariant = self.is_type_assignable_to(sub_type, super_type);
        let contravariant = self.is_type_assignable_to(super_type, sub_type);
        match (covariant, contravariant) {
            (true, true) => {
                let other = self.types().reference(target, with_marker(TypeId::MARKER_OTHER));
                if self.is_type_assignable_to(other, super_type) {
                    Variance::Independent
                } else {
                    Variance::Bivariant
                }
            }
            (true, false) => Variance::Covariant,
            (false, true) => Variance::Contravariant,
            (false, false) => Variance::Invariant,
        }
    }
}

#[cfg(test)]
mod tests {
    use tyck_options::CheckerOptions;

    use crate::session::Session;
    use crate::types::{ObjectKey, TypeId, TypeKey, Variance};

    /// Helper: variances of the interface `name` declared in `source`.
    fn variances(source: &str, name: &str) -> Vec<Variance> {
        let session = Session::from_sources(&[("a.ts", source)], CheckerOptions::strict());
        let file = session.file_id("a.ts").unwrap();
        let mut checker = session.checker();
        let tree = checker.tree(file);
        let offset = tree.text().find(&format!("interface {name}")).unwrap() as u32 + 10;
        let node = tree.node_at_offset(offset).unwrap();
        let declared = checker.get_type_at_location(file, node);
        let target = match &session.types().get(declared).key {
            TypeKey::Object(ObjectKey::Declared(_)) => declared,
            _ => TypeId::ERROR,
        };
        checker.variances_of(target).to_vec()
    }

    #[test]
    fn test_measured_variances() {
        assert_eq!(variances("interface Box<T> { get(): T }", "Box"), vec![Variance::Covariant]);
        assert_eq!(variances("interface Sink<T> { put: (x: T) => void }", "Sink"), vec![Variance::Contravariant]);
        assert_eq!(variances("interface Cell<T> { value: T; set: (x: T) => void }", "Cell"), vec![Variance::Invariant]);
        assert_eq!(variances("interface Tag<T> { name: string }", "Tag"), vec![Variance::Independent]);
    }

    #[test]
    fn test_annotated_variance_wins() {
        assert_eq!(variances("interface Box<in T> { get(): T }", "Box"), vec![Variance::Contravariant]);
        assert_eq!(variances("interface Box<in out T> { get(): T }", "Box"), vec![Variance::Invariant]);
    }
}
