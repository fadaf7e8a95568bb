//! Request dispatch and error translation.
//!
//! ```text
//! router -> ActionDispatcher -> binder -> deadline scope -> invoker -> translator -> response
//! ```

pub mod binder;
pub mod deadline;
pub mod dispatcher;
pub mod invoker;
pub mod translator;

pub use binder::{bind, Bound, RawInput};
pub use deadline::{acquire, DeadlineScope, ScopeRelease};
pub use dispatcher::ActionDispatcher;
pub use invoker::{invoke, Outcome};
pub use translator::{reject, status_for, translate, Resolved, STATUS_TABLE};
