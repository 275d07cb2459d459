//! Save-file library for Privateer and Righteous Fire: the IFF-style
//! container codec, a named-field accessor over the decoded tree, the
//! symbolic id tables, and the achievement rule engine.

pub mod achievements;
pub mod error;
pub mod fields;
pub mod form;
pub mod fuzzy;
pub mod header;
pub mod reader;
pub mod savedata;
pub mod tables;
pub mod writer;

pub use error::{DecodeError, EncodeError, FieldError, FieldErrorCode, RuleError};
pub use fields::FieldValue;
pub use form::{Form, Record};
pub use savedata::{GameVariant, PaddedString, PlotInfo, Savedata};
