//! Store collaborator seams.
//!
//! The harness never talks to a driver directly. A [`SessionSource`] hands
//! out short-lived [`StoreSession`]s; each fixture execution or snapshot
//! capture opens one and drops it before returning, on success or failure.

use crate::dialect::Dialect;
use crate::errors::Result;
use crate::model::{TableSpec, Value};

/// Column names plus rows of a query, in result order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// A live connection to the store.
pub trait StoreSession {
    /// Execute a statement for effect, returning the affected row count.
    ///
    /// # Errors
    ///
    /// - `Persistence` - the driver rejected the statement
    fn execute(&mut self, sql: &str) -> Result<usize>;

    /// Execute a query and collect its rows.
    ///
    /// # Errors
    ///
    /// - `Persistence` - the driver rejected the query
    fn query(&mut self, sql: &str) -> Result<QueryResult>;

    /// Read every row of a table ordered by primary key ascending.
    ///
    /// # Errors
    ///
    /// - `Persistence` - the driver rejected the read
    fn read_table(&mut self, table: &TableSpec) -> Result<QueryResult>;
}

/// Factory for scoped sessions against one store.
pub trait SessionSource {
    type Session: StoreSession;

    /// Open a new session.
    ///
    /// # Errors
    ///
    /// - `Persistence` - the store could not be reached
    fn open(&self) -> Result<Self::Session>;

    /// Dialect statements for this store must be rendered in.
    fn dialect(&self) -> &dyn Dialect;
}
