pub mod playbook;
pub mod prospect;
pub mod signal;
