// Report assembly: presence/topic gate, optional consistency check, PDF download.

pub mod consistency;
pub mod document;
pub mod gate;
pub mod handlers;
pub mod prompts;
