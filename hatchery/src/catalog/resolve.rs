//! Reference install-order resolver over the catalog.
//!
//! Dependency resolution proper is a collaborator of this crate, not part of
//! it; anything honoring the [`Resolver`](crate::install::Resolver) contract
//! can drive the orchestrator. This walker is the built-in implementation:
//! depth-first over best candidates, dependencies before dependents, the
//! requested distribution last.

use std::collections::HashSet;

use tracing::debug;

use crate::egg::{Distribution, Requirement};
use crate::install::Resolver;

use super::Catalog;

/// Depth-first best-candidate resolver.
pub struct CatalogResolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> CatalogResolver<'a> {
    /// Create a resolver over a loaded catalog.
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    fn visit(
        &self,
        req: &Requirement,
        recurse: bool,
        order: &mut Vec<Distribution>,
        seen: &mut HashSet<String>,
    ) -> Option<()> {
        let dist = self.catalog.best_candidate(req)?.clone();

        // Names already ordered (or currently being ordered, for cycles)
        // are not revisited.
        if !seen.insert(req.name.clone()) {
            return Some(());
        }

        if recurse {
            let spec = self.catalog.spec(&dist)?;
            for dep in &spec.packages {
                self.visit(dep, true, order, seen)?;
            }
        }

        order.push(dist);
        Some(())
    }
}

impl Resolver for CatalogResolver<'_> {
    fn resolve(&self, req: &Requirement, recurse: bool) -> Option<Vec<Distribution>> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        self.visit(req, recurse, &mut order, &mut seen)?;
        debug!("resolved {} to {} distributions", req, order.len());
        Some(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::traits::{IndexClient, IndexResponse};
    use crate::catalog::{CatalogError, CatalogLoader};

    struct OneIndexClient(String);

    impl IndexClient for OneIndexClient {
        fn get(&self, url: &str) -> Result<IndexResponse, CatalogError> {
            if url.ends_with("/index.json") {
                Ok(IndexResponse {
                    status: 200,
                    body: self.0.clone(),
                })
            } else {
                Ok(IndexResponse {
                    status: 404,
                    body: String::new(),
                })
            }
        }
    }

    fn catalog_from(index: &str) -> Catalog {
        let client = OneIndexClient(index.to_string());
        let mut loader = CatalogLoader::new(client, "linux-64");
        loader.add_product("http://r/products/epd").unwrap();
        loader.into_catalog()
    }

    #[test]
    fn test_dependencies_precede_dependents() {
        let catalog = catalog_from(
            r#"{
            "eggs": {
                "app": {"files": {"app-1.0-1.egg": {"depends": ["lib", "tools"]}}},
                "lib": {"files": {"lib-2.0-1.egg": {"depends": ["base"]}}},
                "tools": {"files": {"tools-0.5-1.egg": {"depends": ["base"]}}},
                "base": {"files": {"base-1.1-1.egg": {}}}
            }
        }"#,
        );

        let resolver = CatalogResolver::new(&catalog);
        let order = resolver.resolve(&Requirement::any("app"), true).unwrap();
        let names: Vec<&str> = order.iter().map(|d| d.filename()).collect();

        assert_eq!(
            names,
            vec![
                "base-1.1-1.egg",
                "lib-2.0-1.egg",
                "tools-0.5-1.egg",
                "app-1.0-1.egg",
            ]
        );
    }

    #[test]
    fn test_requested_distribution_is_last() {
        let catalog = catalog_from(
            r#"{
            "eggs": {
                "app": {"files": {"app-1.0-1.egg": {"depends": ["lib"]}}},
                "lib": {"files": {"lib-2.0-1.egg": {}}}
            }
        }"#,
        );

        let resolver = CatalogResolver::new(&catalog);
        let order = resolver.resolve(&Requirement::any("app"), true).unwrap();
        assert_eq!(order.last().unwrap().filename(), "app-1.0-1.egg");
    }

    #[test]
    fn test_no_recurse_returns_only_target() {
        let catalog = catalog_from(
            r#"{
            "eggs": {
                "app": {"files": {"app-1.0-1.egg": {"depends": ["lib"]}}},
                "lib": {"files": {"lib-2.0-1.egg": {}}}
            }
        }"#,
        );

        let resolver = CatalogResolver::new(&catalog);
        let order = resolver.resolve(&Requirement::any("app"), false).unwrap();
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].filename(), "app-1.0-1.egg");
    }

    #[test]
    fn test_missing_candidate_resolves_to_none() {
        let catalog = catalog_from(r#"{"eggs": {}}"#);
        let resolver = CatalogResolver::new(&catalog);
        assert!(resolver.resolve(&Requirement::any("ghost"), true).is_none());
    }

    #[test]
    fn test_missing_dependency_resolves_to_none() {
        let catalog = catalog_from(
            r#"{
            "eggs": {
                "app": {"files": {"app-1.0-1.egg": {"depends": ["ghost"]}}}
            }
        }"#,
        );
        let resolver = CatalogResolver::new(&catalog);
        assert!(resolver.resolve(&Requirement::any("app"), true).is_none());
    }

    #[test]
    fn test_dependency_cycle_terminates() {
        let catalog = catalog_from(
            r#"{
            "eggs": {
                "ping": {"files": {"ping-1.0-1.egg": {"depends": ["pong"]}}},
                "pong": {"files": {"pong-1.0-1.egg": {"depends": ["ping"]}}}
            }
        }"#,
        );

        let resolver = CatalogResolver::new(&catalog);
        let order = resolver.resolve(&Requirement::any("ping"), true).unwrap();
        let names: Vec<&str> = order.iter().map(|d| d.filename()).collect();
        assert_eq!(names, vec!["pong-1.0-1.egg", "ping-1.0-1.egg"]);
    }

    #[test]
    fn test_versioned_requirement_resolves_exact() {
        let catalog = catalog_from(
            r#"{
            "eggs": {
                "acme": {
                    "files": {
                        "acme-1.0.0-1.egg": {},
                        "acme-1.2.0-1.egg": {}
                    }
                }
            }
        }"#,
        );

        let resolver = CatalogResolver::new(&catalog);
        let req: Requirement = "acme 1.0.0".parse().unwrap();
        let order = resolver.resolve(&req, true).unwrap();
        assert_eq!(order[0].filename(), "acme-1.0.0-1.egg");
    }
}
