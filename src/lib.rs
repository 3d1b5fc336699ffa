#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, SolverKind, load_config};
pub use error::{InputError, LayoutError};
pub use ir::{FamilyTree, Gender, Person, PersonId, Relationship, RelationshipKind, UnknownFields};
pub use layout::{Layout, Point, Position, Segment, SegmentKind, compute_layout};
pub use layout_dump::{LayoutDump, layout_to_json, write_layout_dump};
pub use render::render_svg;
pub use theme::Theme;
