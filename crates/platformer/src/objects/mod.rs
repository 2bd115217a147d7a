//! Interactive level objects
//!
//! Objects pair shapes in the spatial index with listeners on a mailbox.
//! Handlers only flip shared flags; index changes they imply are applied by
//! each object's `sync` after the frame's physics update.

mod door;
mod key;
mod lock;

pub use door::{Door, OpenDirection};
pub use key::Key;
pub use lock::Lock;
