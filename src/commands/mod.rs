// ABOUTME: Command module aggregator for the edgeflip CLI.
// ABOUTME: Re-exports promote, resolve, and status command handlers.

mod promote;
mod resolve;
mod status;

pub use promote::promote;
pub use resolve::resolve;
pub use status::status;
