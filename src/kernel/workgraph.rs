//! The depth bounded working graph built by neighbourhood extraction.
//!
//! Vertices and edges live in two arenas addressed by integer index, so a vertex or edge
//! reachable from several instance roots is stored exactly once and referenced by index
//! from every instance that reaches it. Each record carries the path label state the
//! growth iterations operate on : a base label, the current set of path strings, a staging
//! set for the paths being built this iteration, and the maximum depth budget any instance
//! has left when reaching it.


use std::collections::HashMap;

use indexmap::IndexSet;


pub(crate) type VertexId = usize;
pub(crate) type EdgeId = usize;

/// distinct-instance frequency of a label or path string
pub(crate) type FreqMap = HashMap<String, i64, ahash::RandomState>;


/// Path label state attached to every working vertex and edge.
#[derive(Debug, Clone)]
pub(crate) struct PathState {
    /// base label, the compressed "_<id>" form of the original label
    label : String,
    /// current path strings. Distinct valued, insertion ordered.
    paths : IndexSet<String>,
    /// paths staged during the running growth iteration
    new_paths : IndexSet<String>,
    /// largest depth budget any instance has left at this vertex/edge.
    /// Only raised, never lowered.
    max_depth : usize,
} // end of struct PathState


impl PathState {

    pub(crate) fn new(label : String) -> Self {
        let mut paths = IndexSet::new();
        paths.insert(label.clone());
        PathState{label, paths, new_paths : IndexSet::new(), max_depth : 0}
    } // end of new

    ///
    pub(crate) fn get_label(&self) -> &str {
        &self.label
    }

    ///
    pub(crate) fn get_paths(&self) -> &IndexSet<String> {
        &self.paths
    }

    ///
    pub(crate) fn get_max_depth(&self) -> usize {
        self.max_depth
    }

    ///
    pub(crate) fn update_max_depth(&mut self, depth : usize) {
        self.max_depth = self.max_depth.max(depth);
    }

    /// stages one grown path per neighbour path : own label followed by the neighbour path,
    /// each part censored to the empty string when its distinct-instance frequency does not
    /// exceed min_freq. Duplicates collapse in the staging set.
    pub(crate) fn stage_paths(&mut self, neighbour_paths : &IndexSet<String>, label_freq : &FreqMap, path_freq : &FreqMap, min_freq : i64) {
        let own = if *label_freq.get(&self.label).unwrap_or(&0) > min_freq {
            self.label.as_str()
        } else {
            ""
        };
        for path in neighbour_paths {
            let grown = if *path_freq.get(path).unwrap_or(&0) > min_freq {
                path.as_str()
            } else {
                ""
            };
            let mut new_path = String::with_capacity(own.len() + grown.len());
            new_path.push_str(own);
            new_path.push_str(grown);
            self.new_paths.insert(new_path);
        }
    } // end of stage_paths

    /// the staging set becomes the current set (replacing, not merging).
    /// A vertex/edge that staged nothing ends up with no current paths, which is what
    /// stops expired paths from being propagated again.
    pub(crate) fn promote_paths(&mut self) {
        self.paths = std::mem::take(&mut self.new_paths);
    } // end of promote_paths

} // end of impl PathState


//========================================================================================


pub(crate) struct WorkVertex {
    pub(crate) state : PathState,
    /// outgoing edges, arena indices
    pub(crate) out_edges : Vec<EdgeId>,
} // end of struct WorkVertex


pub(crate) struct WorkEdge {
    pub(crate) state : PathState,
    /// growth only ever walks forward, so the source side lives in the
    /// out_edges list of the source vertex
    pub(crate) target : VertexId,
} // end of struct WorkEdge


/// arena of working vertices and edges.
pub(crate) struct WorkGraph {
    vertices : Vec<WorkVertex>,
    edges : Vec<WorkEdge>,
} // end of struct WorkGraph


impl WorkGraph {

    pub(crate) fn new() -> Self {
        WorkGraph{vertices : Vec::new(), edges : Vec::new()}
    }

    pub(crate) fn add_vertex(&mut self, label : String) -> VertexId {
        self.vertices.push(WorkVertex{state : PathState::new(label), out_edges : Vec::new()});
        self.vertices.len() - 1
    } // end of add_vertex

    pub(crate) fn add_edge(&mut self, source : VertexId, target : VertexId, label : String) -> EdgeId {
        self.edges.push(WorkEdge{state : PathState::new(label), target});
        let eid = self.edges.len() - 1;
        self.vertices[source].out_edges.push(eid);
        eid
    } // end of add_edge

    pub(crate) fn vertex(&self, id : VertexId) -> &WorkVertex {
        &self.vertices[id]
    }

    pub(crate) fn vertex_mut(&mut self, id : VertexId) -> &mut WorkVertex {
        &mut self.vertices[id]
    }

    pub(crate) fn edge(&self, id : EdgeId) -> &WorkEdge {
        &self.edges[id]
    }

    pub(crate) fn edge_mut(&mut self, id : EdgeId) -> &mut WorkEdge {
        &mut self.edges[id]
    }

    pub(crate) fn get_vertices(&self) -> &[WorkVertex] {
        &self.vertices
    }

    pub(crate) fn get_edges(&self) -> &[WorkEdge] {
        &self.edges
    }

    pub(crate) fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub(crate) fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// one growth round at iteration j. Staging only : every vertex whose depth window
    /// admits paths of length j+1 extends its own label with the current paths of its
    /// outgoing edges, every edge in window extends its tag with the current paths of its
    /// target vertex. Current sets are left untouched until [promote_paths](Self::promote_paths).
    pub(crate) fn grow_paths(&mut self, j : usize, label_freq : &FreqMap, path_freq : &FreqMap, min_freq : i64) {
        let WorkGraph{vertices, edges} = self;
        for v in vertices.iter_mut() {
            if v.state.get_max_depth() * 2 >= j + 1 {
                let WorkVertex{state, out_edges} = v;
                for &eid in out_edges.iter() {
                    state.stage_paths(edges[eid].state.get_paths(), label_freq, path_freq, min_freq);
                }
            }
        }
        for e in edges.iter_mut() {
            if e.state.get_max_depth() * 2 >= j {
                e.state.stage_paths(vertices[e.target].state.get_paths(), label_freq, path_freq, min_freq);
            }
        }
    } // end of grow_paths

    /// promotion pass once all staging of the iteration is done, for every vertex and edge,
    /// in window or not.
    pub(crate) fn promote_paths(&mut self) {
        for v in self.vertices.iter_mut() {
            v.state.promote_paths();
        }
        for e in self.edges.iter_mut() {
            e.state.promote_paths();
        }
    } // end of promote_paths

} // end of impl WorkGraph


//========================================================================================


#[cfg(test)]
mod tests {

    use super::*;

    fn log_init_test() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn freq_of(pairs : &[(&str, i64)]) -> FreqMap {
        let mut freq = FreqMap::default();
        for (lab, count) in pairs {
            freq.insert(lab.to_string(), *count);
        }
        freq
    }

    #[test]
    fn max_depth_only_raises() {
        log_init_test();
        //
        let mut state = PathState::new(String::from("_0"));
        state.update_max_depth(2);
        state.update_max_depth(1);
        assert_eq!(state.get_max_depth(), 2);
    }

    #[test]
    fn staging_censors_infrequent_parts() {
        log_init_test();
        //
        let mut state = PathState::new(String::from("_0"));
        let mut neighbour = IndexSet::new();
        neighbour.insert(String::from("_1"));
        neighbour.insert(String::from("_2"));
        let label_freq = freq_of(&[("_0", 1)]);
        let path_freq = freq_of(&[("_1", 3), ("_2", 1)]);
        // own label frequency 1 does not exceed min_freq 1 : censored.
        // path _1 survives, path _2 is censored.
        state.stage_paths(&neighbour, &label_freq, &path_freq, 1);
        state.promote_paths();
        let paths : Vec<&str> = state.get_paths().iter().map(|s| s.as_str()).collect();
        assert_eq!(paths, vec!["_1", ""]);
    }

    #[test]
    fn staging_collapses_duplicates() {
        log_init_test();
        //
        let mut state = PathState::new(String::from("_0"));
        let mut neighbour = IndexSet::new();
        neighbour.insert(String::from("_1"));
        neighbour.insert(String::from("_2"));
        // everything censored : both grown paths collapse to the single empty string
        let label_freq = freq_of(&[("_0", 1)]);
        let path_freq = freq_of(&[("_1", 1), ("_2", 1)]);
        state.stage_paths(&neighbour, &label_freq, &path_freq, 5);
        state.promote_paths();
        assert_eq!(state.get_paths().len(), 1);
        assert!(state.get_paths().contains(""));
    }

    #[test]
    fn promotion_replaces_and_clears() {
        log_init_test();
        //
        let mut state = PathState::new(String::from("_0"));
        // nothing staged : current paths must become empty, not stay at the base label
        state.promote_paths();
        assert!(state.get_paths().is_empty());
    }

    #[test]
    fn growth_reads_pre_iteration_state() {
        log_init_test();
        //
        // v0 -e0-> v1, all parts frequent enough to survive
        let mut work = WorkGraph::new();
        let v0 = work.add_vertex(String::from("_0"));
        let v1 = work.add_vertex(String::from("_1"));
        let e0 = work.add_edge(v0, v1, String::from("_2"));
        work.vertex_mut(v0).state.update_max_depth(1);
        work.vertex_mut(v1).state.update_max_depth(0);
        work.edge_mut(e0).state.update_max_depth(0);
        let freq = freq_of(&[("_0", 1), ("_1", 1), ("_2", 1)]);
        work.grow_paths(0, &freq, &freq, -1);
        // staging must not be visible before promotion
        assert!(work.vertex(v0).state.get_paths().contains("_0"));
        work.promote_paths();
        // v0 grew its label with the edge tag, the edge grew its tag with the old
        // target label, v1 (max_depth 0) was out of window and lost its paths
        assert!(work.vertex(v0).state.get_paths().contains("_0_2"));
        assert!(work.edge(e0).state.get_paths().contains("_2_1"));
        assert!(work.vertex(v1).state.get_paths().is_empty());
    }

} // end of mod tests
