//! Multi-phase assembly of submodels into one model.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use ec_expr::Variable;
use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, info, warn};

use crate::equations::{EquationSet, Event};
use crate::error::{ModelError, ModelResult};
use crate::leading_order::LeadingOrderImport;
use crate::model::{AssembledModel, SolverHint};
use crate::registry::VariableRegistry;
use crate::submodel::{NamedExprs, Submodel};

/// Drives an ordered list of submodels through the build phases.
///
/// Fundamental variables are declared in insertion order. Coupled variables
/// are derived in a stable topological order of the submodels' declared
/// inputs and outputs (ties keep insertion order). Equations are then merged
/// and the result checked before an [`AssembledModel`] is returned.
pub struct ModelAssembler {
    name: String,
    submodels: Vec<Box<dyn Submodel>>,
    leading_order: Option<LeadingOrderImport>,
    dae_reason: Option<String>,
}

impl ModelAssembler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            submodels: Vec::new(),
            leading_order: None,
            dae_reason: None,
        }
    }

    pub fn add(&mut self, submodel: impl Submodel + 'static) -> &mut Self {
        self.submodels.push(Box::new(submodel));
        self
    }

    pub fn add_boxed(&mut self, submodel: Box<dyn Submodel>) -> &mut Self {
        self.submodels.push(submodel);
        self
    }

    /// Seed the build with a finished leading-order model.
    pub fn with_leading_order(&mut self, import: LeadingOrderImport) -> &mut Self {
        self.leading_order = Some(import);
        self
    }

    /// Force a DAE solver hint even when no algebraic equation is present.
    pub fn require_dae(&mut self, reason: impl Into<String>) -> &mut Self {
        self.dae_reason = Some(reason.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn submodel_names(&self) -> Vec<&str> {
        self.submodels.iter().map(|s| s.name()).collect()
    }

    /// Order in which the coupled phase will run, by submodel name.
    pub fn coupled_order(&self) -> ModelResult<Vec<&str>> {
        let mut registry = self.seed_registry()?;
        self.declare_fundamental(&mut registry)?;
        let order = self.resolve_order(&registry)?;
        Ok(order.into_iter().map(|i| self.submodels[i].name()).collect())
    }

    pub fn assemble(&self) -> ModelResult<AssembledModel> {
        let span = tracing::info_span!("assemble", model = %self.name);
        let _guard = span.enter();

        let mut registry = self.seed_registry()?;
        let mut equations = EquationSet::default();
        let mut events = Vec::new();
        if let Some(import) = &self.leading_order {
            equations.absorb(import.equations())?;
            events.extend(import.events().iter().cloned());
        }

        self.declare_fundamental(&mut registry)?;
        debug!(variables = registry.len(), "fundamental variables declared");

        let order = self.resolve_order(&registry)?;
        for &i in &order {
            let submodel = self.submodels[i].as_ref();
            let declared = submodel.coupled_variables(&registry.view(submodel.name()))?;
            check_promised_outputs(submodel, &declared)?;
            registry.update(&declared, submodel.name())?;
            debug!(submodel = submodel.name(), count = declared.len(), "coupled variables");
        }

        for (_, expr) in registry.iter() {
            expr.domain()?;
        }

        for submodel in &self.submodels {
            contribute(submodel.as_ref(), &registry, &mut equations, &mut events)?;
        }
        debug!(
            rhs = equations.rhs().len(),
            algebraic = equations.algebraic().len(),
            "equations merged"
        );
        equations.check(&events)?;
        equations.check_solved(registry.iter().map(|(_, expr)| expr))?;

        let solver_hint = if !equations.algebraic().is_empty() {
            SolverHint::Dae
        } else if let Some(reason) = &self.dae_reason {
            debug!(reason = reason.as_str(), "DAE solver required");
            SolverHint::Dae
        } else {
            SolverHint::Ode
        };

        if equations.is_empty() {
            warn!("model has no equations");
        }
        info!(
            variables = registry.len(),
            states = equations.states().len(),
            algebraic = equations.algebraic().len(),
            events = events.len(),
            solver = %solver_hint,
            "model assembled"
        );

        Ok(AssembledModel {
            name: self.name.clone(),
            variables: registry,
            equations,
            events,
            solver_hint,
            submodels: self.submodels.iter().map(|s| s.name().to_string()).collect(),
        })
    }

    fn seed_registry(&self) -> ModelResult<VariableRegistry> {
        let mut registry = VariableRegistry::new();
        if let Some(import) = &self.leading_order {
            registry.update(import.variables(), LeadingOrderImport::OWNER)?;
            debug!(variables = import.variables().len(), "leading-order variables imported");
        }
        Ok(registry)
    }

    fn declare_fundamental(&self, registry: &mut VariableRegistry) -> ModelResult<()> {
        for submodel in &self.submodels {
            let declared = submodel.fundamental_variables()?;
            registry.update(&declared, submodel.name())?;
        }
        Ok(())
    }

    /// Stable topological order of the coupled phase.
    fn resolve_order(&self, registry: &VariableRegistry) -> ModelResult<Vec<usize>> {
        let n = self.submodels.len();
        let mut producers: HashMap<String, usize> = HashMap::new();
        for (i, submodel) in self.submodels.iter().enumerate() {
            for output in submodel.coupled_outputs() {
                if let Some(&first) = producers.get(&output) {
                    if first != i {
                        return Err(ModelError::DuplicateVariable {
                            name: output,
                            first: self.submodels[first].name().to_string(),
                            second: submodel.name().to_string(),
                        });
                    }
                }
                producers.insert(output, i);
            }
        }

        let mut graph = DiGraph::<usize, ()>::with_capacity(n, 0);
        let nodes: Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i)).collect();
        for (i, submodel) in self.submodels.iter().enumerate() {
            for input in submodel.coupled_inputs() {
                if registry.contains(&input) {
                    continue;
                }
                match producers.get(&input) {
                    Some(&p) if p != i => {
                        graph.update_edge(nodes[p], nodes[i], ());
                    }
                    Some(_) => {}
                    None => {
                        return Err(ModelError::UnknownVariable {
                            name: input,
                            requested_by: submodel.name().to_string(),
                        });
                    }
                }
            }
        }

        let mut indegree: Vec<usize> = nodes
            .iter()
            .map(|&node| graph.neighbors_directed(node, Direction::Incoming).count())
            .collect();
        let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
            .filter(|&i| indegree[i] == 0)
            .map(Reverse)
            .collect();
        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(i)) = ready.pop() {
            order.push(i);
            for next in graph.neighbors_directed(nodes[i], Direction::Outgoing) {
                let j = graph[next];
                indegree[j] -= 1;
                if indegree[j] == 0 {
                    ready.push(Reverse(j));
                }
            }
        }

        if order.len() < n {
            let mut members: Vec<usize> = tarjan_scc(&graph)
                .into_iter()
                .find(|scc| scc.len() > 1)
                .unwrap_or_default()
                .into_iter()
                .map(|node| graph[node])
                .collect();
            members.sort_unstable();
            return Err(ModelError::DependencyCycle {
                submodels: members
                    .into_iter()
                    .map(|i| self.submodels[i].name().to_string())
                    .collect(),
            });
        }
        Ok(order)
    }
}

pub(crate) fn check_promised_outputs(submodel: &dyn Submodel, declared: &NamedExprs) -> ModelResult<()> {
    let declared: BTreeSet<&str> = declared.names().collect();
    for output in submodel.coupled_outputs() {
        if !declared.contains(output.as_str()) {
            return Err(ModelError::UnknownVariable {
                name: output,
                requested_by: submodel.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Registry entry `name`, which must be a bare state variable.
fn state_of(registry: &VariableRegistry, name: &str, requester: &str) -> ModelResult<Variable> {
    let expr = registry.lookup(name, requester)?;
    expr.as_variable()
        .cloned()
        .ok_or_else(|| ModelError::NotAState {
            name: name.to_string(),
            requested_by: requester.to_string(),
        })
}

/// Merge the equation phases of one submodel.
pub(crate) fn contribute(
    submodel: &dyn Submodel,
    registry: &VariableRegistry,
    equations: &mut EquationSet,
    events: &mut Vec<Event>,
) -> ModelResult<()> {
    let name = submodel.name();
    let view = registry.view(name);

    for (key, expr) in submodel.set_rhs(&view)? {
        equations.insert_rhs(state_of(registry, &key, name)?, expr)?;
    }
    for (key, expr) in submodel.set_algebraic(&view)? {
        equations.insert_algebraic(state_of(registry, &key, name)?, expr)?;
    }
    for (key, expr) in submodel.set_initial_conditions(&view)? {
        equations.insert_initial_condition(state_of(registry, &key, name)?, expr)?;
    }
    for (key, conditions) in submodel.set_boundary_conditions(&view)? {
        registry.lookup(&key, name)?;
        equations.insert_boundary_conditions(key, conditions)?;
    }
    events.extend(submodel.set_events(&view)?);
    Ok(())
}
