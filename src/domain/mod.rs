// Domain layer - Traffic records and dashboard view state
pub mod dashboard;
pub mod traffic;
