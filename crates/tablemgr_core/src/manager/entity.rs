use crate::conn::FromRecord;
use crate::sql::{Value, Values};

/// A record type a manager can address by primary key.
pub trait Manageable {
    /// Whether the entity already has a database identity.
    fn exists(&self) -> bool;

    /// Primary-key values in the table's declared primary-key order.
    ///
    /// The length must equal the table's primary-key arity.
    fn keys(&self) -> Vec<Value>;
}

/// A record type a manager can insert and refresh from `RETURNING` rows.
pub trait Insertable: Manageable + FromRecord {
    /// Column values to insert. Omit database-assigned columns that are unset.
    fn values(&self) -> Values;
}
