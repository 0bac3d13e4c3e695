//! The approximate tree walk counting kernel with frequency based pruning.
//!
//! For every instance vertex a depth bounded neighbourhood is extracted along outgoing
//! edges into one shared working graph, then path label strings are grown iteratively,
//! one hop per iteration, alternating vertex and edge steps. A label or path whose
//! distinct-instance frequency does not exceed min_freq is censored to the empty string
//! when grown into new paths, which deliberately conflates the specializations of rare
//! sub paths and keeps the feature dictionary small. Counting the paths held by the
//! depth windowed neighbourhood of each instance gives one sparse feature vector per
//! instance.
//!
//! The algorithm follows :
//!
//! - A fast approximation of the Weisfeiler-Lehman graph kernel for RDF data.
//!     de Vries. ECML-PKDD 2013.


use std::collections::{HashMap, HashSet};

use std::time::SystemTime;
use cpu_time::ProcessTime;

use ndarray::Array2;

use petgraph::graph::{NodeIndex, EdgeIndex};
use petgraph::visit::EdgeRef;

use crate::graph::dtgraph::GraphData;
use crate::kernel::dict::LabelDict;
use crate::kernel::gram::{compute_kernel_matrix, normalize_feature_vectors};
use crate::kernel::params::KernelParams;
use crate::kernel::vector::SparseVector;
use crate::kernel::workgraph::{EdgeId, FreqMap, VertexId, WorkGraph};
use crate::kernel::{FeatureVectorKernel, GraphKernel};


/// The approximate frequency-pruned tree walk kernel.
/// All transient state lives for one computation call, so a kernel can be reused
/// across different [GraphData] without cross talk.
pub struct TreeWalkApproxKernel {
    params : KernelParams,
    /// duration of the last computation in ms
    comp_time_ms : u128,
} // end of struct TreeWalkApproxKernel


impl TreeWalkApproxKernel {

    pub fn new(path_length : usize, depth : usize, min_freq : i64, normalize : bool) -> Self {
        TreeWalkApproxKernel{params : KernelParams::new(path_length, depth, min_freq, normalize), comp_time_ms : 0}
    }

    ///
    pub fn from_params(params : KernelParams) -> Self {
        TreeWalkApproxKernel{params, comp_time_ms : 0}
    }

    ///
    pub fn get_params(&self) -> &KernelParams {
        &self.params
    }

    ///
    pub fn set_normalize(&mut self, normalize : bool) {
        self.params.set_normalize(normalize);
    }

    /// a short tag naming the kernel variant and its parameters
    pub fn get_label(&self) -> String {
        format!("TreeWalkApprox_pl{}_d{}_mf{}", self.params.get_path_length(), self.params.get_depth(), self.params.get_min_freq())
    }

    /// duration of the last computation in ms
    pub fn get_computation_time(&self) -> u128 {
        self.comp_time_ms
    }

} // end of impl TreeWalkApproxKernel


impl FeatureVectorKernel for TreeWalkApproxKernel {

    fn compute_feature_vectors(&mut self, data : &GraphData) -> Result<Vec<SparseVector>, anyhow::Error> {
        self.params.check()?;
        //
        let cpu_start = ProcessTime::now();
        let sys_start = SystemTime::now();
        //
        let nb_instances = data.num_instances();
        if nb_instances == 0 {
            log::debug!("tree walk kernel called with an empty instance list");
            return Ok(Vec::new());
        }
        let mut state = KernelState::extract(data, self.params.get_depth());
        log::debug!("working graph : {} vertices, {} edges, {} labels", state.work.num_vertices(), state.work.num_edges(), state.label_dict.len());
        //
        let mut fvs : Vec<SparseVector> = (0..nb_instances).map(|_| SparseVector::new()).collect();
        // depth 0 : every vertex/edge holds its base label as only path
        state.register_paths();
        state.compute_fvs(&mut fvs, 0);
        // loop to create longer and longer paths
        for j in 0..self.params.get_path_length() {
            // frequencies must be taken on the pre-growth state, growth reads them
            state.compute_label_freqs();
            state.compute_path_freqs(j);
            state.grow_paths(j, self.params.get_min_freq());
            state.promote_paths();
            state.register_paths();
            state.compute_fvs(&mut fvs, j + 1);
        }
        log::debug!("path dictionary size after growth : {}", state.path_dict.len());
        //
        if self.params.do_normalize() {
            normalize_feature_vectors(&mut fvs);
        }
        //
        self.comp_time_ms = sys_start.elapsed().unwrap().as_millis();
        log::info!(" tree walk kernel sys time(ms) {:?} cpu time(ms) {:?}", self.comp_time_ms, cpu_start.elapsed().as_millis());
        //
        Ok(fvs)
    } // end of compute_feature_vectors

} // end of impl FeatureVectorKernel


impl GraphKernel for TreeWalkApproxKernel {

    fn compute(&mut self, data : &GraphData) -> Result<Array2<f64>, anyhow::Error> {
        let fvs = self.compute_feature_vectors(data)?;
        let sys_start = SystemTime::now();
        let gram = compute_kernel_matrix(&fvs);
        self.comp_time_ms += sys_start.elapsed().unwrap().as_millis();
        Ok(gram)
    } // end of compute

} // end of impl GraphKernel


//========================================================================================


/// the state of one computation call : working graph, per instance index entries,
/// dictionaries and frequency maps. Built by extraction, dropped with the call.
struct KernelState {
    work : WorkGraph,
    /// for each instance, every reachable working vertex with the depth budget left when reached.
    /// A vertex reached twice appears twice.
    vertex_index : Vec<Vec<(VertexId, usize)>>,
    /// same for edges
    edge_index : Vec<Vec<(EdgeId, usize)>>,
    /// original label -> id, used to compress base labels to "_<id>"
    label_dict : LabelDict,
    /// path string -> feature id
    path_dict : LabelDict,
    /// distinct-instance frequency of base labels
    label_freq : FreqMap,
    /// distinct-instance frequency of path strings, windowed
    path_freq : FreqMap,
} // end of struct KernelState


impl KernelState {

    /// builds the shared working graph by a depth bounded frontier expansion from every
    /// instance root. A vertex or edge already mapped by this or an earlier instance is
    /// reused, only its max_depth is raised, so overlapping neighbourhoods share state
    /// while each instance keeps its own (id, depth budget) sequences.
    /// Cycles terminate because expansion runs exactly depth rounds.
    fn extract(data : &GraphData, depth : usize) -> KernelState {
        let graph = data.get_graph();
        let nb_instances = data.num_instances();
        //
        let mut work = WorkGraph::new();
        let mut label_dict = LabelDict::new();
        let mut vertex_index : Vec<Vec<(VertexId, usize)>> = Vec::with_capacity(nb_instances);
        let mut edge_index : Vec<Vec<(EdgeId, usize)>> = Vec::with_capacity(nb_instances);
        // source graph item -> working graph arena index
        let mut v_old_new = HashMap::<NodeIndex, VertexId, ahash::RandomState>::default();
        let mut e_old_new = HashMap::<EdgeIndex, EdgeId, ahash::RandomState>::default();
        //
        for &old_root in data.get_instances() {
            let mut vertex_entries : Vec<(VertexId, usize)> = Vec::new();
            let mut edge_entries : Vec<(EdgeId, usize)> = Vec::new();
            // the start vertex, reused if an earlier instance already mapped it
            let root = match v_old_new.get(&old_root) {
                Some(&vid) => vid,
                None => {
                    let vid = work.add_vertex(compressed_label(&mut label_dict, &graph[old_root]));
                    v_old_new.insert(old_root, vid);
                    vid
                }
            };
            vertex_entries.push((root, depth));
            work.vertex_mut(root).state.update_max_depth(depth);
            //
            let mut front : Vec<NodeIndex> = vec![old_root];
            for j in (0..depth).rev() {
                let mut new_front : Vec<NodeIndex> = Vec::new();
                for &old_v in &front {
                    for edge in graph.edges(old_v) {
                        let old_target = edge.target();
                        let target = match v_old_new.get(&old_target) {
                            Some(&vid) => vid,
                            None => {
                                let vid = work.add_vertex(compressed_label(&mut label_dict, &graph[old_target]));
                                v_old_new.insert(old_target, vid);
                                vid
                            }
                        };
                        vertex_entries.push((target, j));
                        work.vertex_mut(target).state.update_max_depth(j);
                        //
                        let wedge = match e_old_new.get(&edge.id()) {
                            Some(&eid) => eid,
                            None => {
                                let source = *v_old_new.get(&old_v).expect("frontier vertex missing from the working graph");
                                let eid = work.add_edge(source, target, compressed_label(&mut label_dict, edge.weight()));
                                e_old_new.insert(edge.id(), eid);
                                eid
                            }
                        };
                        edge_entries.push((wedge, j));
                        work.edge_mut(wedge).state.update_max_depth(j);
                        // the target joins the next front if another round follows
                        if j > 0 {
                            new_front.push(old_target);
                        }
                    }
                }
                front = new_front;
            }
            vertex_index.push(vertex_entries);
            edge_index.push(edge_entries);
        }
        //
        KernelState{work, vertex_index, edge_index, label_dict,
            path_dict : LabelDict::new(), label_freq : FreqMap::default(), path_freq : FreqMap::default()}
    } // end of extract

    /// distinct-instance frequency of every base label over the full index entries.
    /// One label counts at most once per instance however often it occurs there.
    fn compute_label_freqs(&mut self) {
        let KernelState{work, vertex_index, edge_index, label_freq, ..} = self;
        label_freq.clear();
        for i in 0..vertex_index.len() {
            let mut seen = HashSet::<&str, ahash::RandomState>::default();
            for &(vid, _depth) in &vertex_index[i] {
                let lab = work.vertex(vid).state.get_label();
                if seen.insert(lab) {
                    *label_freq.entry(lab.to_string()).or_insert(0) += 1;
                }
            }
            for &(eid, _depth) in &edge_index[i] {
                let lab = work.edge(eid).state.get_label();
                if seen.insert(lab) {
                    *label_freq.entry(lab.to_string()).or_insert(0) += 1;
                }
            }
        }
    } // end of compute_label_freqs

    /// distinct-instance frequency of every current path string, over windowed entries.
    /// The windows are looser by one step than the growth gating so paths about to expire
    /// still have a frequency when growth consumes them in the same pass.
    fn compute_path_freqs(&mut self, current_it : usize) {
        let KernelState{work, vertex_index, edge_index, path_freq, ..} = self;
        path_freq.clear();
        let it = current_it as i64;
        for i in 0..vertex_index.len() {
            let mut seen = HashSet::<&str, ahash::RandomState>::default();
            for &(vid, depth) in &vertex_index[i] {
                if depth as i64 * 2 >= it - 2 {
                    for path in work.vertex(vid).state.get_paths() {
                        if seen.insert(path.as_str()) {
                            *path_freq.entry(path.clone()).or_insert(0) += 1;
                        }
                    }
                }
            }
            for &(eid, depth) in &edge_index[i] {
                if depth as i64 * 2 >= it - 1 {
                    for path in work.edge(eid).state.get_paths() {
                        if seen.insert(path.as_str()) {
                            *path_freq.entry(path.clone()).or_insert(0) += 1;
                        }
                    }
                }
            }
        }
    } // end of compute_path_freqs

    /// stages the grown paths of iteration j from the frequencies of the pre-growth state
    fn grow_paths(&mut self, j : usize, min_freq : i64) {
        let KernelState{work, label_freq, path_freq, ..} = self;
        work.grow_paths(j, label_freq, path_freq, min_freq);
    }

    /// promotes every staging set once the whole iteration has staged
    fn promote_paths(&mut self) {
        self.work.promote_paths();
    }

    /// assigns a feature id to every current path not yet in the dictionary
    fn register_paths(&mut self) {
        let KernelState{work, path_dict, ..} = self;
        for v in work.get_vertices() {
            for path in v.state.get_paths() {
                path_dict.get_or_insert(path);
            }
        }
        for e in work.get_edges() {
            for path in e.state.get_paths() {
                path_dict.get_or_insert(path);
            }
        }
    } // end of register_paths

    /// accumulates the current paths of every windowed index entry into the instance
    /// feature vectors and raises every watermark to the dictionary size.
    /// A vertex or edge indexed twice by one instance is counted twice, once per entry.
    fn compute_fvs(&self, fvs : &mut [SparseVector], current_it : usize) {
        let last_index = self.path_dict.len().checked_sub(1).expect("path dictionary cannot be empty once an instance was extracted");
        for i in 0..self.vertex_index.len() {
            fvs[i].set_last_index(last_index);
            for &(vid, depth) in &self.vertex_index[i] {
                if depth * 2 >= current_it {
                    for path in self.work.vertex(vid).state.get_paths() {
                        let id = self.path_dict.get_id(path).expect("current path missing from the dictionary");
                        fvs[i].set_value(id, fvs[i].get_value(id) + 1.);
                    }
                }
            }
            for &(eid, depth) in &self.edge_index[i] {
                if depth * 2 + 1 >= current_it {
                    for path in self.work.edge(eid).state.get_paths() {
                        let id = self.path_dict.get_id(path).expect("current path missing from the dictionary");
                        fvs[i].set_value(id, fvs[i].get_value(id) + 1.);
                    }
                }
            }
        }
    } // end of compute_fvs

} // end of impl KernelState


// base labels are stored compressed as "_<id>" so path strings stay unambiguous
// concatenations whatever the original label text contains
fn compressed_label(label_dict : &mut LabelDict, label : &str) -> String {
    format!("_{}", label_dict.get_or_insert(label))
} // end of compressed_label


//========================================================================================


// end of mod tests
