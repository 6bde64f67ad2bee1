pub mod executor;
pub mod fulltext;
pub mod navigator;
pub mod resolver;

pub use executor::{Executor, ExecutorError, SyncExecutor};
pub use fulltext::{FullTextError, FullTextSearcher, NoFullTextSearch};
pub use navigator::{InMemoryTree, NavigationError, NodeId, TreeNavigator};
pub use resolver::{NamePathResolver, NamespaceResolver, ResolveError};
