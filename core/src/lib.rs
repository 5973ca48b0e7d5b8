pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod graph;
pub mod index;
pub mod parse;
pub mod view;

pub use clock::VectorClock;
pub use config::Config;
pub use error::{Error, ParseError, StateError};
pub use event::{Event, EventId};
pub use graph::{EdgeKind, GraphStats, SpaceTimeGraph};
pub use index::EventIndex;
pub use parse::parse_lines;
pub use view::{EdgeView, GraphView, NodeView};
