// Board core: listing search, tab views and confirmed local mutations.
// Everything here is synchronous over an in-memory snapshot except the
// collaborator confirmation awaited by the mutation layer.

pub mod filter;
pub mod highlights;
pub mod mutation;
pub mod transitions;
pub mod validation;
pub mod views;

#[cfg(test)]
pub mod test_fixtures;

pub use mutation::LocalCollection;
pub use views::{TabQuery, TabbedView};
