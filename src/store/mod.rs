// Keygate: Store Module
//
// Typed records on top of the gateway. Each record is a JSON document kept
// as one secret under "<kind>:<name>" in a service.

mod records;

pub use records::{record_key, RecordStore};
