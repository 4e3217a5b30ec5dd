// Application layer - Use cases and the store seam
pub mod normalize;
pub mod page_service;
pub mod traffic_loader;
pub mod traffic_repository;
