use super::Record;
use crate::error::{ManagerError, ManagerResult};

/// Decodes an entity from one result row.
pub trait FromRecord: Sized {
    fn from_record(record: &Record) -> ManagerResult<Self>;
}

/// Receiver of a dispatched statement's rows.
///
/// Implementations decode every row before writing anything, so a failed
/// decode leaves the destination untouched.
pub trait Destination {
    fn decode(&mut self, records: Vec<Record>) -> ManagerResult<()>;
}

/// Replaced with every returned row.
impl<T: FromRecord> Destination for Vec<T> {
    fn decode(&mut self, records: Vec<Record>) -> ManagerResult<()> {
        let decoded = records
            .iter()
            .map(T::from_record)
            .collect::<ManagerResult<Vec<_>>>()?;
        *self = decoded;
        Ok(())
    }
}

/// First returned row, or `None` when the result is empty.
impl<T: FromRecord> Destination for Option<T> {
    fn decode(&mut self, records: Vec<Record>) -> ManagerResult<()> {
        *self = records.first().map(T::from_record).transpose()?;
        Ok(())
    }
}

/// Positional: row `i` overwrites element `i`; lengths must match.
impl<T: FromRecord> Destination for [T] {
    fn decode(&mut self, records: Vec<Record>) -> ManagerResult<()> {
        if records.len() != self.len() {
            return Err(ManagerError::RowCountMismatch {
                expected: self.len(),
                actual: records.len(),
            });
        }
        let decoded = records
            .iter()
            .map(T::from_record)
            .collect::<ManagerResult<Vec<_>>>()?;
        for (slot, value) in self.iter_mut().zip(decoded) {
            *slot = value;
        }
        Ok(())
    }
}
