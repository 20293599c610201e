/// Stock manycore helpers.
pub mod manycore;
