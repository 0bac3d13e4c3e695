//! The input data model : a directed multigraph with one label per vertex and one tag per edge,
//! together with the designated instance vertices for which feature vectors are computed.

/// Defines the labeled multigraph input and its validation.
pub mod dtgraph;
