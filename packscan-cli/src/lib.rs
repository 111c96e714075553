pub mod command;
pub mod session;
pub mod state;

pub use command::Input;
pub use session::{Flow, Session};
pub use state::build_session;
