//! lib target
//!
//! Tree walk kernels over labeled directed multigraphs.
//! See the [kernel] module for the algorithms and the [graph] module for the input data model.


use env_logger::Builder;

#[macro_use]
extern crate lazy_static;

lazy_static! {
    static ref LOG: u64 = {
        let res = init_log();
        res
    };
}

// install a logger facility
fn init_log() -> u64 {
    Builder::from_default_env().init();
    println!("\n ************** initializing logger *****************\n");
    return 1;
}

pub mod graph;

pub mod kernel;

pub mod prelude;
