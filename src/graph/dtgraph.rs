//! Directed tagged multigraph input on top of petgraph.
//!
//! A vertex carries one label, an edge carries one tag, both plain strings.
//! Petgraph admits parallel edges between a couple of nodes so we get a genuine multigraph,
//! provided parallel edges carry distinct tags if they must be distinguished.
//! [GraphData] bundles the graph with the ordered list of instance vertices
//! and does the boundary checks once, so the kernels can rely on a well formed input.


use std::collections::HashSet;

use anyhow::anyhow;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::Directed;

/// The source multigraph. Node weight is the vertex label, edge weight is the edge tag.
pub type DtGraph = Graph<String, String, Directed>;


/// A graph together with its instance vertices, in the order feature vectors will be produced.
pub struct GraphData {
    /// the source graph
    graph : DtGraph,
    /// the designated instance vertices
    instances : Vec<NodeIndex>,
} // end of struct GraphData


impl GraphData {

    /// bundles a graph with its instance vertices.
    /// An instance vertex must be a vertex of the graph and cannot appear twice in one list
    /// (the same vertex may of course be an instance again in another [GraphData]).
    pub fn new(graph : DtGraph, instances : Vec<NodeIndex>) -> Result<Self, anyhow::Error> {
        let mut seen = HashSet::<NodeIndex>::with_capacity(instances.len());
        for &inst in &instances {
            if graph.node_weight(inst).is_none() {
                return Err(anyhow!("instance vertex {} is not a vertex of the graph", inst.index()));
            }
            if !seen.insert(inst) {
                return Err(anyhow!("instance vertex {} appears twice in the instance list", inst.index()));
            }
        }
        log::debug!("GraphData : {} vertices, {} edges, {} instances", graph.node_count(), graph.edge_count(), instances.len());
        Ok(GraphData{graph, instances})
    } // end of new

    ///
    pub fn get_graph(&self) -> &DtGraph {
        &self.graph
    }

    /// instance vertices in feature vector order
    pub fn get_instances(&self) -> &[NodeIndex] {
        &self.instances
    }

    ///
    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

} // end of impl GraphData


//========================================================================================


#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // a, b and an edge a -> b
    fn two_vertex_graph() -> (DtGraph, NodeIndex, NodeIndex) {
        let mut graph = DtGraph::new();
        let a = graph.add_node(String::from("a"));
        let b = graph.add_node(String::from("b"));
        graph.add_edge(a, b, String::from("t"));
        (graph, a, b)
    }

    #[test]
    fn graphdata_accepts_distinct_instances() {
        log_init_test();
        //
        let (graph, a, b) = two_vertex_graph();
        let data = GraphData::new(graph, vec![a, b]).unwrap();
        assert_eq!(data.num_instances(), 2);
        assert_eq!(data.get_instances(), &[a, b]);
    }

    #[test]
    fn graphdata_rejects_duplicate_instance() {
        log_init_test();
        //
        let (graph, a, _b) = two_vertex_graph();
        let res = GraphData::new(graph, vec![a, a]);
        assert!(res.is_err());
    }

    #[test]
    fn graphdata_rejects_foreign_vertex() {
        log_init_test();
        //
        let (graph, _a, _b) = two_vertex_graph();
        let foreign = NodeIndex::new(17);
        let res = GraphData::new(graph, vec![foreign]);
        assert!(res.is_err());
    }

} // end of mod tests
