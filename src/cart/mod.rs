//! Cart state: the only entity whose canonical copy lives on the client.

mod error;
mod state;

pub use error::*;
pub use state::*;
