pub mod dashboard;
pub mod narrative;
pub mod panels;
pub mod plot;
