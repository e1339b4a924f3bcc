// Keygate: Process Module
//
// Caller identity for consent prompts and audit lines.

mod caller;

pub use caller::{caller_process_name, process_name, CallerInfo, UNKNOWN_PROCESS};
