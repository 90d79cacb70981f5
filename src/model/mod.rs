//! # Descendance Graph Model
//!
//! Plain DTOs shared by every stage: builder ↔ classifier ↔ layout ↔ export.
//!
//! Design rule: this module is pure data with no I/O and no logging.

pub mod record;
pub mod node;
pub mod edge;
pub mod position;

pub use record::KcRecord;
pub use node::{KcNode, NodeKind};
pub use edge::Edge;
pub use position::{Position, PositionMap};
