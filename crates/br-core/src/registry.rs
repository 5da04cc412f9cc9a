//! Dependency registry for schema units.
//!
//! The registry is a static declaration: it validates the unit graph once at
//! construction and answers ordering questions without touching a database.

use crate::error::{CoreError, CoreResult};
use crate::unit::SchemaUnit;
use crate::unit_name::UnitName;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, Reversed};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// Validated, acyclic set of schema units.
#[derive(Debug)]
pub struct UnitRegistry {
    /// Units in declaration order
    units: Vec<SchemaUnit>,

    /// Edges point from dependency to dependent
    graph: DiGraph<UnitName, ()>,

    node_map: HashMap<UnitName, NodeIndex>,

    /// Dependencies first; ties broken by declaration order
    order: Vec<UnitName>,
}

impl UnitRegistry {
    /// Validate `units` and build the registry.
    ///
    /// Fails on a duplicate unit name, a dependency on an undeclared unit, or
    /// a dependency cycle.
    pub fn build(units: Vec<SchemaUnit>) -> CoreResult<Self> {
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::with_capacity(units.len());

        for unit in &units {
            if node_map.contains_key(unit.name()) {
                return Err(CoreError::DuplicateUnit {
                    name: unit.name().to_string(),
                });
            }
            let idx = graph.add_node(unit.name().clone());
            node_map.insert(unit.name().clone(), idx);
        }

        for unit in &units {
            let to = node_map[unit.name()];
            for dep in unit.depends_on() {
                let from = *node_map
                    .get(dep)
                    .ok_or_else(|| CoreError::UnknownDependency {
                        unit: unit.name().to_string(),
                        dependency: dep.to_string(),
                    })?;
                graph.add_edge(from, to, ());
            }
        }

        let mut registry = Self {
            units,
            graph,
            node_map,
            order: Vec::new(),
        };
        registry.order = registry.resolve_order()?;
        log::debug!(
            "Unit registry built: {} units, order [{}]",
            registry.units.len(),
            registry
                .order
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(registry)
    }

    /// Depth-first post-order over declarations, tracking the recursion stack
    /// to detect cycles.
    fn resolve_order(&self) -> CoreResult<Vec<UnitName>> {
        let mut order = Vec::with_capacity(self.units.len());
        let mut done = HashSet::new();
        let mut stack = Vec::new();
        for idx in 0..self.units.len() {
            self.visit(idx, &mut done, &mut stack, &mut order)?;
        }
        Ok(order)
    }

    fn visit(
        &self,
        idx: usize,
        done: &mut HashSet<usize>,
        stack: &mut Vec<usize>,
        order: &mut Vec<UnitName>,
    ) -> CoreResult<()> {
        if done.contains(&idx) {
            return Ok(());
        }
        if let Some(pos) = stack.iter().position(|&s| s == idx) {
            let cycle = stack[pos..]
                .iter()
                .chain(std::iter::once(&idx))
                .map(|&i| self.units[i].name().as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(CoreError::CircularDependency { cycle });
        }

        stack.push(idx);
        for dep in self.units[idx].depends_on() {
            let dep_idx = self.node_map[dep].index();
            self.visit(dep_idx, done, stack, order)?;
        }
        stack.pop();

        done.insert(idx);
        order.push(self.units[idx].name().clone());
        Ok(())
    }

    /// Number of declared units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&SchemaUnit> {
        self.node_map.get(name).map(|idx| &self.units[idx.index()])
    }

    fn require(&self, name: &str) -> CoreResult<&SchemaUnit> {
        self.get(name).ok_or_else(|| CoreError::UnitNotFound {
            name: name.to_string(),
        })
    }

    /// Units in declaration order
    pub fn units(&self) -> impl Iterator<Item = &SchemaUnit> {
        self.units.iter()
    }

    /// Direct dependencies of `name`, in declaration order.
    pub fn dependencies_of(&self, name: &str) -> CoreResult<&[UnitName]> {
        Ok(self.require(name)?.depends_on())
    }

    /// Unit names with every dependency before its dependents.
    pub fn topological_order(&self) -> &[UnitName] {
        &self.order
    }

    /// Units in topological order
    pub fn ordered_units(&self) -> Vec<&SchemaUnit> {
        self.order
            .iter()
            .map(|name| &self.units[self.node_map[name].index()])
            .collect()
    }

    /// Transitive dependencies of `name`, in topological order.
    pub fn ancestors(&self, name: &str) -> CoreResult<Vec<UnitName>> {
        self.require(name)?;
        let start = self.node_map[name];
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut reached = HashSet::new();
        while let Some(idx) = dfs.next(reversed) {
            if idx != start {
                reached.insert(idx);
            }
        }
        Ok(self
            .order
            .iter()
            .filter(|n| reached.contains(&self.node_map[*n]))
            .cloned()
            .collect())
    }

    /// Units that directly depend on `name`, in declaration order.
    pub fn dependents(&self, name: &str) -> CoreResult<Vec<UnitName>> {
        self.require(name)?;
        let mut indices: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(self.node_map[name], Direction::Outgoing)
            .collect();
        indices.sort();
        Ok(indices.into_iter().map(|i| self.graph[i].clone()).collect())
    }

    /// Resolve a selection of unit names to units in topological order.
    ///
    /// An empty selection means every unit. With `with_ancestors`, transitive
    /// dependencies of the selected units are included as well.
    pub fn select<S: AsRef<str>>(
        &self,
        names: &[S],
        with_ancestors: bool,
    ) -> CoreResult<Vec<&SchemaUnit>> {
        if names.is_empty() {
            return Ok(self.ordered_units());
        }

        let mut selected: HashSet<&str> = HashSet::new();
        for name in names {
            let unit = self.require(name.as_ref())?;
            selected.insert(unit.name().as_str());
            if with_ancestors {
                for ancestor in self.ancestors(unit.name())? {
                    let ancestor = self.require(&ancestor)?;
                    selected.insert(ancestor.name().as_str());
                }
            }
        }

        Ok(self
            .ordered_units()
            .into_iter()
            .filter(|u| selected.contains(u.name().as_str()))
            .collect())
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
