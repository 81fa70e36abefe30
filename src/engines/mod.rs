pub mod mutation;
pub mod traversal;

pub use mutation::{
    mutate, mutate_detailed, mutation_add, mutation_delete, mutation_mutate, MutationReport,
};
pub use traversal::{act, act_many, act_traced};
