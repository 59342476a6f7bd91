pub mod fault_barrier;
