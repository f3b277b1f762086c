#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod input;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod stats;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::LoadError;
pub use input::{parse_people, read_people};
pub use ir::{Gender, Person};
pub use layout::{FamilyLayout, NodePosition, calculate_positions, compute_layout};
pub use stats::FamilyStats;
pub use theme::Theme;
