/*!
Types and routines shared by the NFA and DFA layers.
*/

pub mod alphabet;
pub mod id;
pub mod search;

pub(crate) mod prefilter;
pub(crate) mod sparse_set;
