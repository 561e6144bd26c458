use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::ics26_routing::context::{Module, ModuleId, Router, RouterBuilder};

#[derive(Default)]
pub struct MockRouterBuilder(MockRouter);

impl RouterBuilder for MockRouterBuilder {
    type Router = MockRouter;

    fn add_route(mut self, module_id: ModuleId, module: impl Module + 'static) -> Result<Self, String> {
        match self.0 .0.insert(module_id, Arc::new(module)) {
            None => Ok(self),
            Some(_) => Err("Duplicate module_id".to_owned()),
        }
    }

    fn build(self) -> Self::Router {
        self.0
    }
}

/// Modules are shared between clones of a router; a module can only be borrowed mutably while
/// the router holding it has not been cloned.
#[derive(Clone, Debug, Default)]
pub struct MockRouter(BTreeMap<ModuleId, Arc<dyn Module>>);

impl Router for MockRouter {
    fn get_route_mut(&mut self, module_id: &ModuleId) -> Option<&mut dyn Module> {
        self.0
            .get_mut(module_id)
            .and_then(Arc::get_mut)
            .map(|module| -> &mut dyn Module { module })
    }

    fn has_route(&self, module_id: &ModuleId) -> bool {
        self.0.get(module_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::test_utils::DummyTransferModule;

    #[test]
    fn duplicate_routes_are_rejected() {
        let transfer: ModuleId = "transfer".parse().unwrap();
        let builder = MockRouterBuilder::default()
            .add_route(transfer.clone(), DummyTransferModule)
            .unwrap();
        assert!(builder.add_route(transfer, DummyTransferModule).is_err());
    }

    #[test]
    fn routes_are_borrowed_mutably() {
        let transfer: ModuleId = "transfer".parse().unwrap();
        let mut router = MockRouterBuilder::default()
            .add_route(transfer.clone(), DummyTransferModule)
            .unwrap()
            .build();
        assert!(router.has_route(&transfer));
        assert!(router.get_route_mut(&transfer).is_some());
        assert!(!router.has_route(&"bank".parse().unwrap()));
    }
}
