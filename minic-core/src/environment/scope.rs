use std::{cell::RefCell, collections::HashMap};

use crate::utils::prelude::SrcSpan;
use super::prelude::{EnvironmentError, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub location: SrcSpan,
}

/// One level of the lexical scope chain.
///
/// A scope borrows its parent, so a child can never outlive the block or
/// call that created its parent. Bindings sit behind a [`RefCell`] so that
/// every level of the chain can be mutated through shared references.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    bindings: RefCell<HashMap<String, Binding>>,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn global() -> Self {
        Self::default()
    }

    pub fn child(parent: &'a Scope<'a>) -> Self {
        Self {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        }
    }

    pub fn global_scope(&self) -> &Scope<'a> {
        let mut scope = self;

        while let Some(parent) = scope.parent {
            scope = parent;
        }

        scope
    }

    /// Whether `name` is bound in this exact scope.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }

    pub fn declare(
        &self,
        name: &str,
        value: Value,
        location: SrcSpan
    ) -> Result<(), EnvironmentError> {
        let mut bindings = self.bindings.borrow_mut();

        if let Some(existing) = bindings.get(name) {
            return Err(EnvironmentError::Redeclaration {
                name: name.to_string(),
                first: existing.location,
                second: location
            });
        }

        bindings.insert(name.to_string(), Binding { value, location });

        Ok(())
    }

    pub fn assign(
        &self,
        name: &str,
        value: Value,
        location: SrcSpan
    ) -> Result<(), EnvironmentError> {
        let scope = self.find(name).ok_or_else(|| EnvironmentError::UndeclaredName {
            name: name.to_string(),
            location
        })?;

        if let Some(binding) = scope.bindings.borrow_mut().get_mut(name) {
            binding.value = value;
        }

        Ok(())
    }

    pub fn lookup(&self, name: &str, location: SrcSpan) -> Result<Value, EnvironmentError> {
        self.find(name)
            .and_then(|scope| scope.bindings.borrow().get(name).map(|binding| binding.value.clone()))
            .ok_or_else(|| EnvironmentError::UndeclaredName {
                name: name.to_string(),
                location
            })
    }

    fn find(&self, name: &str) -> Option<&Scope<'a>> {
        let mut scope = Some(self);

        while let Some(current) = scope {
            if current.contains(name) {
                return Some(current);
            }

            scope = current.parent;
        }

        None
    }
}
