//! The plain root walk counting kernel.
//!
//! Only walks starting at an instance root are counted, recursively along outgoing
//! edges with an explicit budget, without any frequency pruning. The simple companion
//! of the tree walk kernel in [treewalk](crate::kernel::treewalk), useful as a baseline
//! and for inspecting which walk a feature id stands for.


use std::time::SystemTime;
use cpu_time::ProcessTime;

use anyhow::anyhow;

use ndarray::Array2;

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::graph::dtgraph::{DtGraph, GraphData};
use crate::kernel::dict::LabelDict;
use crate::kernel::gram::{compute_kernel_matrix, normalize_feature_vectors};
use crate::kernel::vector::SparseVector;
use crate::kernel::{FeatureVectorKernel, GraphKernel};


/// Counts every walk of at most path_length label steps starting at each instance root.
/// Keeps its dictionaries after a computation so feature ids can be described.
pub struct RootWalkKernel {
    /// number of label steps a walk may take beyond the root label
    path_length : usize,
    ///
    normalize : bool,
    /// duration of the last computation in ms
    comp_time_ms : u128,
    /// original label -> id, rebuilt by each computation
    label_dict : Option<LabelDict>,
    /// walk path string -> feature id, rebuilt by each computation
    path_dict : Option<LabelDict>,
} // end of struct RootWalkKernel


impl RootWalkKernel {

    pub fn new(path_length : usize, normalize : bool) -> Self {
        RootWalkKernel{path_length, normalize, comp_time_ms : 0, label_dict : None, path_dict : None}
    }

    ///
    pub fn get_path_length(&self) -> usize {
        self.path_length
    }

    ///
    pub fn set_normalize(&mut self, normalize : bool) {
        self.normalize = normalize;
    }

    /// a short tag naming the kernel variant and its parameters
    pub fn get_label(&self) -> String {
        format!("RootWalkCount_pl{}", self.path_length)
    }

    /// duration of the last computation in ms
    pub fn get_computation_time(&self) -> u128 {
        self.comp_time_ms
    }

    /// translates feature ids back to the walks they count, root label first, as
    /// "label->tag->label...". Must be called after a feature vector computation.
    pub fn get_feature_descriptions(&self, indices : &[usize]) -> Result<Vec<String>, anyhow::Error> {
        let (label_dict, path_dict) = match (&self.label_dict, &self.path_dict) {
            (Some(label_dict), Some(path_dict)) => (label_dict, path_dict),
            _ => {
                return Err(anyhow!("compute_feature_vectors must run before feature descriptions are asked for"));
            }
        };
        let mut descriptions = Vec::with_capacity(indices.len());
        for &idx in indices {
            let path = path_dict.get_label(idx).ok_or_else(|| anyhow!("feature id {} was never assigned", idx))?;
            descriptions.push(describe_path(label_dict, path)?);
        }
        Ok(descriptions)
    } // end of get_feature_descriptions

} // end of impl RootWalkKernel


impl FeatureVectorKernel for RootWalkKernel {

    fn compute_feature_vectors(&mut self, data : &GraphData) -> Result<Vec<SparseVector>, anyhow::Error> {
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        //
        let graph = data.get_graph();
        // compress every label of the graph up front, walks then concatenate "_<id>" tokens
        let mut label_dict = LabelDict::new();
        for n in graph.node_indices() {
            label_dict.get_or_insert(&graph[n]);
        }
        for e in graph.edge_indices() {
            label_dict.get_or_insert(&graph[e]);
        }
        //
        let mut path_dict = LabelDict::new();
        let mut fvs : Vec<SparseVector> = (0..data.num_instances()).map(|_| SparseVector::new()).collect();
        for (i, &root) in data.get_instances().iter().enumerate() {
            count_vertex_walks(graph, root, "", self.path_length, &label_dict, &mut path_dict, &mut fvs[i]);
        }
        // all vectors declare the final dictionary size
        if !fvs.is_empty() {
            let last_index = path_dict.len() - 1;
            for fv in fvs.iter_mut() {
                fv.set_last_index(last_index);
            }
        }
        log::debug!("root walk kernel : {} walks in dictionary", path_dict.len());
        //
        self.label_dict = Some(label_dict);
        self.path_dict = Some(path_dict);
        //
        if self.normalize {
            normalize_feature_vectors(&mut fvs);
        }
        //
        self.comp_time_ms = sys_start.elapsed().unwrap().as_millis();
        log::info!(" root walk kernel sys time(ms) {:?} cpu time(ms) {:?}", self.comp_time_ms, cpu_start.elapsed().as_millis());
        //
        Ok(fvs)
    } // end of compute_feature_vectors

} // end of impl FeatureVectorKernel


impl GraphKernel for RootWalkKernel {

    fn compute(&mut self, data : &GraphData) -> Result<Array2<f64>, anyhow::Error> {
        let fvs = self.compute_feature_vectors(data)?;
        let sys_start = SystemTime::now();
        let gram = compute_kernel_matrix(&fvs);
        self.comp_time_ms += sys_start.elapsed().unwrap().as_millis();
        Ok(gram)
    } // end of compute

} // end of impl GraphKernel


//========================================================================================


// appends the vertex label to the walk prefix, counts it, and if budget is left walks on
// through every outgoing edge. Termination on cyclic graphs comes from the budget alone.
fn count_vertex_walks(graph : &DtGraph, vertex : NodeIndex, prefix : &str, budget : usize,
        label_dict : &LabelDict, path_dict : &mut LabelDict, fv : &mut SparseVector) {
    let lab_id = label_dict.get_id(&graph[vertex]).expect("vertex label missing from the dictionary");
    let path = format!("{}_{}", prefix, lab_id);
    let id = path_dict.get_or_insert(&path);
    fv.set_value(id, fv.get_value(id) + 1.);
    if budget > 0 {
        for edge in graph.edges(vertex) {
            count_edge_walks(graph, edge.id(), &path, budget - 1, label_dict, path_dict, fv);
        }
    }
} // end of count_vertex_walks


// same for an edge tag, then walks on to the target vertex
fn count_edge_walks(graph : &DtGraph, edge : EdgeIndex, prefix : &str, budget : usize,
        label_dict : &LabelDict, path_dict : &mut LabelDict, fv : &mut SparseVector) {
    let tag_id = label_dict.get_id(&graph[edge]).expect("edge tag missing from the dictionary");
    let path = format!("{}_{}", prefix, tag_id);
    let id = path_dict.get_or_insert(&path);
    fv.set_value(id, fv.get_value(id) + 1.);
    if budget > 0 {
        let (_source, target) = graph.edge_endpoints(edge).expect("edge without endpoints");
        count_vertex_walks(graph, target, &path, budget - 1, label_dict, path_dict, fv);
    }
} // end of count_edge_walks


// expands a compressed "_<id>_<id>..." walk string back to the original labels
fn describe_path(label_dict : &LabelDict, path : &str) -> Result<String, anyhow::Error> {
    let mut labels = Vec::new();
    for token in path.split('_').filter(|t| !t.is_empty()) {
        let id : usize = token.parse().map_err(|_| anyhow!("malformed walk string : {}", path))?;
        let label = label_dict.get_label(id).ok_or_else(|| anyhow!("label id {} not in dictionary", id))?;
        labels.push(label);
    }
    Ok(labels.join("->"))
} // end of describe_path


//========================================================================================


#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    // a -e1-> b -e2-> c
    fn chain_graph() -> (DtGraph, Vec<NodeIndex>) {
        let mut graph = DtGraph::new();
        let a = graph.add_node(String::from("a"));
        let b = graph.add_node(String::from("b"));
        let c = graph.add_node(String::from("c"));
        graph.add_edge(a, b, String::from("e1"));
        graph.add_edge(b, c, String::from("e2"));
        (graph, vec![a, b, c])
    }

    #[test]
    fn counts_only_walks_from_the_root() {
        log_init_test();
        //
        let (graph, nodes) = chain_graph();
        let data = GraphData::new(graph, vec![nodes[0]]).unwrap();
        let mut kernel = RootWalkKernel::new(4, false);
        let fvs = kernel.compute_feature_vectors(&data).unwrap();
        // walks from a : a, a e1, a e1 b, a e1 b e2, a e1 b e2 c
        assert_eq!(fvs[0].nb_nonzero(), 5);
        assert_eq!(fvs[0].sum(), 5.);
    }

    #[test]
    fn zero_path_length_counts_the_root_label() {
        log_init_test();
        //
        let (graph, nodes) = chain_graph();
        let data = GraphData::new(graph, vec![nodes[1]]).unwrap();
        let mut kernel = RootWalkKernel::new(0, false);
        let fvs = kernel.compute_feature_vectors(&data).unwrap();
        assert_eq!(fvs[0].nb_nonzero(), 1);
        assert_eq!(fvs[0].sum(), 1.);
    }

    #[test]
    fn feature_descriptions_name_the_walks() {
        log_init_test();
        //
        let (graph, nodes) = chain_graph();
        let data = GraphData::new(graph, vec![nodes[0]]).unwrap();
        let mut kernel = RootWalkKernel::new(4, false);
        let fvs = kernel.compute_feature_vectors(&data).unwrap();
        let indices = fvs[0].get_indices();
        let descriptions = kernel.get_feature_descriptions(&indices).unwrap();
        assert!(descriptions.contains(&String::from("a")));
        assert!(descriptions.contains(&String::from("a->e1")));
        assert!(descriptions.contains(&String::from("a->e1->b->e2->c")));
    }

    #[test]
    fn feature_descriptions_need_a_computation_first() {
        log_init_test();
        //
        let kernel = RootWalkKernel::new(2, false);
        assert!(kernel.get_feature_descriptions(&[0]).is_err());
    }

    #[test]
    fn gram_matrix_is_symmetric() {
        log_init_test();
        //
        let (graph, nodes) = chain_graph();
        let data = GraphData::new(graph, vec![nodes[0], nodes[1]]).unwrap();
        let mut kernel = RootWalkKernel::new(3, false);
        let gram = kernel.compute(&data).unwrap();
        assert_eq!(gram[[0, 1]], gram[[1, 0]]);
        assert!(gram[[0, 0]] > 0.);
    }

    #[test]
    fn normalized_vectors_have_unit_norm() {
        log_init_test();
        //
        let (graph, nodes) = chain_graph();
        let data = GraphData::new(graph, vec![nodes[0]]).unwrap();
        let mut kernel = RootWalkKernel::new(2, true);
        let fvs = kernel.compute_feature_vectors(&data).unwrap();
        assert!((fvs[0].l2_norm() - 1.).abs() < 1.0e-12);
    }

} // end of mod tests
