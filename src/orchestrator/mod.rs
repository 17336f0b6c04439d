/// Generation state machine with preview, apply and revert
pub mod generator;
/// Operation records and identifiers
pub mod operation;
/// Preview artifacts and the preview host interface
pub mod preview;
