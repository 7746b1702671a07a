mod history;
mod new;
mod restore;
mod save;
mod send;
mod session;

pub use history::*;
pub use new::*;
pub use restore::*;
pub use save::*;
pub use send::*;
pub use session::*;
