pub mod insight;
pub mod plan;
pub mod reasoning;
