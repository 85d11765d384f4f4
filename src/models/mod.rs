pub mod feasibility;
